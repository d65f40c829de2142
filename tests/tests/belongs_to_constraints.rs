use pretty_assertions::assert_eq;
use tests::*;

/// A user with one task pointing at it.
async fn user_with_task(s: impl Setup, options: BelongsToOptions) -> (Db, Row, Row) {
    let mut builder = Db::builder();
    builder
        .define(ModelDef::new("User").attribute("username", Type::String))
        .define(ModelDef::new("Task").attribute("title", Type::String))
        .belongs_to("Task", "User", options);

    let db = s.setup(builder).await;

    let user = db.create("User", [("username", "foo")], None).await.unwrap();
    let mut task = db.create("Task", [("title", "task")], None).await.unwrap();
    task.set_related(&db, "User", Some(&user), None).await.unwrap();

    (db, user, task)
}

async fn foreign_keys(db: &Db) -> Vec<Value> {
    let tasks = db
        .find_all(db.model("Task").unwrap(), Filter::new(), None)
        .await
        .unwrap();

    tasks.iter().map(|task| task.get("UserId").clone()).collect()
}

async fn constraints_are_off_by_default(s: impl Setup) {
    let (db, user, _) = user_with_task(s, BelongsToOptions::default()).await;

    assert!(db.model("Task").unwrap().attribute("UserId").unwrap().references.is_none());

    user.destroy(&db, None).await.unwrap();

    // The task keeps its now dangling key
    assert_eq!(foreign_keys(&db).await, [user.get("id").clone()]);
}

async fn cascade_on_delete(s: impl Setup) {
    let options = BelongsToOptions::default().on_delete(ReferentialAction::Cascade);
    let (db, user, _) = user_with_task(s, options).await;

    user.destroy(&db, None).await.unwrap();

    assert!(foreign_keys(&db).await.is_empty());
}

async fn set_null_on_delete(s: impl Setup) {
    let options = BelongsToOptions::default().on_delete(ReferentialAction::SetNull);
    let (db, user, task) = user_with_task(s, options).await;

    user.destroy(&db, None).await.unwrap();

    assert_eq!(foreign_keys(&db).await, [Value::Null]);

    let reloaded = db
        .find(task.model(), task.get("id").clone(), None)
        .await
        .unwrap()
        .unwrap();
    assert!(reloaded.related(&db, "User", None).await.unwrap().is_none());
}

async fn restrict_on_delete(s: impl Setup) {
    let options = BelongsToOptions::default().on_delete(ReferentialAction::Restrict);
    let (db, user, _) = user_with_task(s, options).await;

    let err = user.destroy(&db, None).await.unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(
        err.to_string(),
        "constraint violation: Tasks.UserId references Users (ON DELETE RESTRICT)"
    );

    // Nothing was removed
    assert_eq!(foreign_keys(&db).await, [user.get("id").clone()]);
    let users = db
        .find_all(user.model(), Filter::new(), None)
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
}

async fn enabled_constraints_default_to_no_action(s: impl Setup) {
    let options = BelongsToOptions::default().foreign_key_constraint(true);
    let (db, user, _) = user_with_task(s, options).await;

    let err = user.destroy(&db, None).await.unwrap_err();
    assert!(err.is_constraint_violation());

    // Dangling keys are refused as well
    let values = Record::from([("title", Value::from("task")), ("UserId", Value::from(42))]);
    let err = db.create("Task", values, None).await.unwrap_err();
    assert!(err.is_constraint_violation());
}

async fn cascade_on_update(s: impl Setup) {
    let options = BelongsToOptions::default().on_update(ReferentialAction::Cascade);
    let (db, mut user, task) = user_with_task(s, options).await;

    user.set("id", 999);
    user.save(&db, SaveOptions::new()).await.unwrap();

    assert_eq!(foreign_keys(&db).await, [Value::from(999)]);

    let reloaded = db
        .find(task.model(), task.get("id").clone(), None)
        .await
        .unwrap()
        .unwrap();
    let associated = reloaded.related(&db, "User", None).await.unwrap().unwrap();
    assert_eq!(associated.get("username"), &Value::from("foo"));
}

async fn restrict_on_update(s: impl Setup) {
    let options = BelongsToOptions::default().on_update(ReferentialAction::Restrict);
    let (db, mut user, _) = user_with_task(s, options).await;

    user.set("id", 999);
    let err = user.save(&db, SaveOptions::new()).await.unwrap_err();
    assert!(err.is_constraint_violation());

    // The user keeps its key
    let stored = db
        .find(user.model(), Value::from(1), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.get("username"), &Value::from("foo"));
    assert_eq!(foreign_keys(&db).await, [Value::from(1)]);
}

tests!(
    constraints_are_off_by_default,
    cascade_on_delete,
    set_null_on_delete,
    restrict_on_delete,
    enabled_constraints_default_to_no_action,
    cascade_on_update,
    restrict_on_update,
);
