use pretty_assertions::assert_eq;
use tests::*;
use tether::driver::{operation::UpdateByKey, Operation};

fn tasks_and_users() -> Builder {
    let mut builder = Db::builder();
    builder
        .define(ModelDef::new("User").attribute("username", Type::String))
        .define(ModelDef::new("Task").attribute("title", Type::String))
        .belongs_to("Task", "User", BelongsToOptions::default());
    builder
}

async fn get_set_and_clear(s: impl Setup) {
    let db = s.setup(tasks_and_users()).await;

    let user = db.create("User", [("username", "foo")], None).await.unwrap();
    let mut task = db.create("Task", [("title", "task")], None).await.unwrap();

    // Nothing associated yet
    assert_eq!(task.get("UserId"), &Value::Null);
    assert!(task.related(&db, "User", None).await.unwrap().is_none());

    task.set_related(&db, "User", Some(&user), None).await.unwrap();
    assert_eq!(task.get("UserId"), user.get("id"));

    let associated = task.related(&db, "User", None).await.unwrap().unwrap();
    assert_eq!(associated.get("id"), user.get("id"));
    assert_eq!(associated.get("username"), &Value::from("foo"));

    task.set_related(&db, "User", None, None).await.unwrap();
    assert_eq!(task.get("UserId"), &Value::Null);
    assert!(task.related(&db, "User", None).await.unwrap().is_none());

    // The change reached the store, not just the in-memory row
    let task_id = task.get("id").clone();
    let reloaded = db
        .find(db.model("Task").unwrap(), task_id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.get("UserId"), &Value::Null);
}

async fn setter_writes_only_the_foreign_key(s: impl Setup) {
    let (db, ops_log) = s.setup_logged(tasks_and_users()).await;

    let user = db.create("User", [("username", "foo")], None).await.unwrap();
    let mut task = db.create("Task", [("title", "task")], None).await.unwrap();

    // A local change the setter must not persist
    task.set("title", "changed");
    task.set_related(&db, "User", Some(&user), None).await.unwrap();

    let last = ops_log.lock().unwrap().last().cloned().unwrap();
    let Operation::UpdateByKey(UpdateByKey { assignments, .. }) = &last.operation else {
        panic!("expected an update, got {:?}", last.operation);
    };
    assert_eq!(
        *assignments,
        Record::from([("UserId", user.get("id").clone())])
    );

    let reloaded = db
        .find(task.model(), task.get("id").clone(), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.get("title"), &Value::from("task"));
    assert_eq!(reloaded.get("UserId"), user.get("id"));
}

async fn getter_params_extend_the_key_condition(s: impl Setup) {
    let db = s.setup(tasks_and_users()).await;

    let foo = db.create("User", [("username", "foo")], None).await.unwrap();
    let bar = db.create("User", [("username", "bar")], None).await.unwrap();
    let mut task = db.create("Task", [("title", "task")], None).await.unwrap();
    task.set_related(&db, "User", Some(&foo), None).await.unwrap();

    // Params without a filter bind the key only
    let found = task
        .related(&db, "User", Some(FindParams::new()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.get("id"), foo.get("id"));

    let matching = FindParams::new().filter(Filter::eq("username", "foo"));
    assert!(task.related(&db, "User", Some(matching)).await.unwrap().is_some());

    let other = FindParams::new().filter(Filter::eq("username", "bar"));
    assert!(task.related(&db, "User", Some(other)).await.unwrap().is_none());

    // A caller condition on the key column replaces the computed one
    let overridden = FindParams::new().filter(Filter::eq("id", bar.get("id").clone()));
    let found = task
        .related(&db, "User", Some(overridden))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.get("username"), &Value::from("bar"));
}

async fn getter_on_dangling_key_returns_none(s: impl Setup) {
    let db = s.setup(tasks_and_users()).await;

    let values = Record::from([("title", Value::from("task")), ("UserId", Value::from(42))]);
    let task = db.create("Task", values, None).await.unwrap();

    assert!(task.related(&db, "User", None).await.unwrap().is_none());
}

async fn declared_primary_keys(s: impl Setup) {
    let mut builder = Db::builder();
    builder
        .define(
            ModelDef::new("UserXYZ")
                .attribute("user_id", Attribute::new(Type::Integer).primary_key())
                .attribute("username", Type::String),
        )
        .define(
            ModelDef::new("TaskXYZ")
                .attribute("task_id", Attribute::new(Type::Integer).primary_key())
                .attribute("title", Type::String),
        )
        .belongs_to(
            "TaskXYZ",
            "UserXYZ",
            BelongsToOptions::default().foreign_key("user_id"),
        );

    let db = s.setup(builder).await;

    let task_model = db.model("TaskXYZ").unwrap();
    assert_eq!(
        task_model.attributes.keys().collect::<Vec<_>>(),
        ["task_id", "title", "user_id"]
    );

    let values = Record::from([("user_id", Value::from(1)), ("username", Value::from("foo"))]);
    let user = db.create("UserXYZ", values, None).await.unwrap();

    let values = Record::from([("task_id", Value::from(1)), ("title", Value::from("task"))]);
    let mut task = db.create("TaskXYZ", values, None).await.unwrap();

    task.set_related(&db, "UserXYZ", Some(&user), None).await.unwrap();
    assert_eq!(task.get("user_id"), &Value::from(1));

    let associated = task.related(&db, "UserXYZ", None).await.unwrap().unwrap();
    assert_eq!(associated.get("username"), &Value::from("foo"));

    task.set_related(&db, "UserXYZ", None, None).await.unwrap();
    assert!(task.related(&db, "UserXYZ", None).await.unwrap().is_none());
}

async fn self_association_round_trip(s: impl Setup) {
    let mut builder = Db::builder();
    builder
        .define(ModelDef::new("Person").attribute("name", Type::String))
        .belongs_to(
            "Person",
            "Person",
            BelongsToOptions::default()
                .alias("Mother")
                .foreign_key("MotherId"),
        );

    let db = s.setup(builder).await;

    let mother = db.create("Person", [("name", "Ada")], None).await.unwrap();
    let mut child = db.create("Person", [("name", "Byron")], None).await.unwrap();

    // Addressed by alias or by association accessor
    child.set_related(&db, "Mother", Some(&mother), None).await.unwrap();
    let found = child.related(&db, "MotherPeople", None).await.unwrap().unwrap();

    assert_eq!(found.get("name"), &Value::from("Ada"));
    assert!(mother.related(&db, "Mother", None).await.unwrap().is_none());
}

async fn setter_rejects_rows_of_another_model(s: impl Setup) {
    let db = s.setup(tasks_and_users()).await;

    let other = db.create("Task", [("title", "other")], None).await.unwrap();
    let mut task = db.create("Task", [("title", "task")], None).await.unwrap();

    let err = task
        .set_related(&db, "User", Some(&other), None)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "association `User` of Task expects a User row, got Task"
    );
    assert_eq!(task.get("UserId"), &Value::Null);
}

async fn setter_may_clear_a_required_key(s: impl Setup) {
    let mut builder = Db::builder();
    builder
        .define(ModelDef::new("User").attribute("username", Type::String))
        .define(
            ModelDef::new("Task")
                .attribute("title", Type::String)
                .attribute("UserId", Attribute::new(Type::Integer).not_null()),
        )
        .belongs_to("Task", "User", BelongsToOptions::default());

    let db = s.setup(builder).await;

    let user = db.create("User", [("username", "foo")], None).await.unwrap();
    let values = Record::from([("title", Value::from("task")), ("UserId", user.get("id").clone())]);
    let mut task = db.create("Task", values, None).await.unwrap();

    // The declared attribute is kept, including its NOT NULL
    assert!(!db.model("Task").unwrap().attribute("UserId").unwrap().nullable);

    // A regular save refuses NULL
    task.set("UserId", Value::Null);
    let err = task.save(&db, SaveOptions::new()).await.unwrap_err();
    assert!(err.is_constraint_violation());

    // The setter allows it for the foreign key
    task.set_related(&db, "User", None, None).await.unwrap();
    assert!(task.related(&db, "User", None).await.unwrap().is_none());

    // Unless the caller says otherwise
    let strict = SaveOptions::new().allow_null(Vec::<String>::new());
    let err = task
        .set_related(&db, "User", None, Some(strict))
        .await
        .unwrap_err();
    assert!(err.is_constraint_violation());
}

async fn setter_on_composite_key_source(s: impl Setup) {
    let mut builder = Db::builder();
    builder
        .define(ModelDef::new("User").attribute("username", Type::String))
        .define(
            ModelDef::new("Membership")
                .attribute("group", Attribute::new(Type::Integer).primary_key())
                .attribute("slot", Attribute::new(Type::Integer).primary_key()),
        )
        .belongs_to("Membership", "User", BelongsToOptions::default());

    let db = s.setup(builder).await;

    let user = db.create("User", [("username", "foo")], None).await.unwrap();
    for slot in [1, 2] {
        db.create("Membership", [("group", 1), ("slot", slot)], None)
            .await
            .unwrap();
    }

    let find = Filter::eq("group", 1).and("slot", 1);
    let mut membership = db
        .find(db.model("Membership").unwrap(), find.clone(), None)
        .await
        .unwrap()
        .unwrap();

    membership
        .set_related(&db, "User", Some(&user), None)
        .await
        .unwrap();
    let associated = membership.related(&db, "User", None).await.unwrap().unwrap();
    assert_eq!(associated.get("id"), user.get("id"));

    // Only the row matching both key columns was written
    let memberships = db
        .find_all(membership.model(), Filter::new(), None)
        .await
        .unwrap();
    let user_ids: Vec<_> = memberships.iter().map(|row| row.get("UserId").clone()).collect();
    assert_eq!(user_ids, [user.get("id").clone(), Value::Null]);

    membership.set_related(&db, "User", None, None).await.unwrap();
    let reloaded = db
        .find(membership.model(), find.clone(), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.get("UserId"), &Value::Null);

    membership.destroy(&db, None).await.unwrap();
    assert!(db
        .find(membership.model(), find, None)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        db.find_all(membership.model(), Filter::new(), None)
            .await
            .unwrap()
            .len(),
        1
    );
}

tests!(
    get_set_and_clear,
    setter_writes_only_the_foreign_key,
    getter_params_extend_the_key_condition,
    getter_on_dangling_key_returns_none,
    declared_primary_keys,
    self_association_round_trip,
    setter_rejects_rows_of_another_model,
    setter_may_clear_a_required_key,
    setter_on_composite_key_source,
);
