use pretty_assertions::assert_eq;
use tests::*;

async fn string_primary_key_gives_string_column(s: impl Setup) {
    let mut builder = Db::builder();
    builder
        .define(
            ModelDef::new("GroupPKBT")
                .attribute("name", Attribute::new(Type::String).primary_key()),
        )
        .define(ModelDef::new("UserPKBT").attribute("username", Type::String))
        .belongs_to("UserPKBT", "GroupPKBT", BelongsToOptions::default());

    let db = s.setup(builder).await;

    let user_model = db.model("UserPKBT").unwrap();
    assert_eq!(user_model.attribute("GroupPKBTId").unwrap().ty, Type::String);

    let group = db.create("GroupPKBT", [("name", "bar")], None).await.unwrap();
    let mut user = db.create("UserPKBT", [("username", "foo")], None).await.unwrap();

    user.set_related(&db, "GroupPKBT", Some(&group), None)
        .await
        .unwrap();
    assert_eq!(user.get("GroupPKBTId"), &Value::from("bar"));

    let associated = user.related(&db, "GroupPKBT", None).await.unwrap().unwrap();
    assert_eq!(associated.get("name"), &Value::from("bar"));
}

async fn key_type_overrides_inferred_type(s: impl Setup) {
    for ty in [Type::Integer, Type::BigInt, Type::String] {
        let mut builder = Db::builder();
        builder
            .define(ModelDef::new("UserXYZ").attribute("username", Type::String))
            .define(ModelDef::new("TaskXYZ").attribute("title", Type::String))
            .belongs_to(
                "TaskXYZ",
                "UserXYZ",
                BelongsToOptions::default().foreign_key("userId").key_type(ty),
            );

        let db = s.setup(builder).await;
        let task_model = db.model("TaskXYZ").unwrap();

        assert_eq!(task_model.attribute("userId").unwrap().ty, ty);
    }
}

async fn composite_target_key_defaults_to_integer(s: impl Setup) {
    let mut builder = Db::builder();
    builder
        .define(
            ModelDef::new("Membership")
                .attribute("org", Attribute::new(Type::String).primary_key())
                .attribute("member", Attribute::new(Type::String).primary_key()),
        )
        .define(ModelDef::new("Badge").attribute("label", Type::String))
        .belongs_to(
            "Badge",
            "Membership",
            BelongsToOptions::default().foreign_key_constraint(true),
        );

    let db = s.setup(builder).await;
    let badge = db.model("Badge").unwrap();
    let column = badge.attribute("MembershipId").unwrap();

    assert_eq!(column.ty, Type::Integer);
    // No single column to reference
    assert!(!column.is_foreign_key());
}

async fn underscored_source_uses_snake_case_column(s: impl Setup) {
    let mut builder = Db::builder();
    builder
        .define(ModelDef::new("User").attribute("username", Type::String))
        .define(
            ModelDef::new("Task")
                .attribute("title", Type::String)
                .options(ModelOptions::default().underscored(true)),
        )
        .belongs_to("Task", "User", BelongsToOptions::default());

    let db = s.setup(builder).await;
    let task_model = db.model("Task").unwrap();

    assert_eq!(
        task_model.attributes.keys().collect::<Vec<_>>(),
        ["id", "title", "user_id"]
    );

    let user = db.create("User", [("username", "foo")], None).await.unwrap();
    let mut task = db.create("Task", [("title", "task")], None).await.unwrap();
    task.set_related(&db, "User", Some(&user), None).await.unwrap();

    assert_eq!(task.get("user_id"), user.get("id"));
}

async fn constrained_column_references_target_key(s: impl Setup) {
    let mut builder = Db::builder();
    builder
        .define(ModelDef::new("User").attribute("username", Type::String))
        .define(ModelDef::new("Task").attribute("title", Type::String))
        .belongs_to(
            "Task",
            "User",
            BelongsToOptions::default()
                .on_delete(ReferentialAction::Cascade)
                .on_update(ReferentialAction::SetNull),
        );

    let db = s.setup(builder).await;
    let column = db.model("Task").unwrap().attribute("UserId").unwrap();
    assert!(column.is_foreign_key());
    let reference = column.references.as_ref().unwrap();

    assert_eq!(reference.table, "Users");
    assert_eq!(reference.key, "id");
    assert_eq!(reference.on_delete(), ReferentialAction::Cascade);
    assert_eq!(reference.on_update(), ReferentialAction::SetNull);
    assert!(column.nullable);
}

tests!(
    string_primary_key_gives_string_column,
    key_type_overrides_inferred_type,
    composite_target_key_defaults_to_integer,
    underscored_source_uses_snake_case_column,
    constrained_column_references_target_key,
);
