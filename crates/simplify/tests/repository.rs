//! Repository reads and writes over an in-memory executor.

mod common;

use common::{Event, MockExecutor};
use simplify::{
    Dialect, Entity, EntityRegistry, FromRow, NamingConvention, OrmError, OrmResult, Repository,
    Row, TableMeta, Value,
};

#[derive(Debug, Clone, PartialEq)]
struct User {
    user_id: i64,
    username: String,
    email: Option<String>,
}

impl Entity for User {
    const PROPERTIES: &'static [&'static str] = &["user_id", "username", "email"];

    fn column_values(&self) -> Vec<Value> {
        vec![
            self.user_id.into(),
            self.username.clone().into(),
            self.email.clone().into(),
        ]
    }

    fn table_meta() -> TableMeta {
        TableMeta::new("User")
            .naming(NamingConvention::Pascal)
            .column("email", "EmailAddress")
    }
}

impl FromRow for User {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(Self {
            user_id: row.try_get("UserId")?,
            username: row.try_get("Username")?,
            email: row.try_get("EmailAddress")?,
        })
    }
}

fn user(id: i64, name: &str) -> User {
    User {
        user_id: id,
        username: name.to_string(),
        email: None,
    }
}

fn user_row(id: i64, name: &str) -> Row {
    Row::new()
        .with("UserId", id)
        .with("Username", name)
        .with("EmailAddress", Value::Null)
}

fn registry() -> EntityRegistry {
    let mut registry = EntityRegistry::new();
    registry.register::<User>().unwrap();
    registry
}

#[tokio::test]
async fn test_metadata_lookups() {
    let registry = registry();
    let db = MockExecutor::new();
    let users = Repository::<User, _, _>::new(&db, &registry, Dialect::SqlServer);

    assert_eq!(users.table_name().unwrap(), "User");
    assert_eq!(users.column_name("email").as_deref(), Some("EmailAddress"));
    assert_eq!(users.column_name("user_id").as_deref(), Some("UserId"));
    assert_eq!(users.column_name("nope"), None);
    assert_eq!(
        users.select().unwrap().build_query(),
        "SELECT [User].* FROM [User] ;"
    );
}

#[tokio::test]
async fn test_first_or_default_by_column_equals() {
    let registry = registry();
    let db = MockExecutor::new().with_rows(vec![user_row(1, "ann"), user_row(2, "bob")]);
    let users = Repository::<User, _, _>::new(&db, &registry, Dialect::Postgres);

    let found = users
        .first_or_default_by_column_equals("Username", "ann")
        .await
        .unwrap();
    assert_eq!(found, Some(user(1, "ann")));
    assert_eq!(
        db.queries(),
        vec![r#"SELECT "User".* FROM "User" WHERE "User"."Username" = @Username0 ;"#]
    );

    let empty = MockExecutor::new();
    let users = Repository::<User, _, _>::new(&empty, &registry, Dialect::Postgres);
    let missing = users
        .first_or_default_by_column_equals("Username", "zed")
        .await
        .unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn test_query_by_column_equals_and_in() {
    let registry = registry();
    let db = MockExecutor::new().with_rows(vec![user_row(1, "ann"), user_row(2, "bob")]);
    let users = Repository::<User, _, _>::new(&db, &registry, Dialect::MySql);

    let all = users.query_by_column_equals("UserId", 1).await.unwrap();
    assert_eq!(all.len(), 2);

    users.query_by_column_in("UserId", [1, 2]).await.unwrap();

    assert_eq!(
        db.queries(),
        vec![
            "SELECT `User`.* FROM `User` WHERE `User`.`UserId` = @UserId0 ;",
            "SELECT `User`.* FROM `User` WHERE `User`.`UserId` IN (@UserId00,@UserId01) ;",
        ]
    );
}

#[tokio::test]
async fn test_insert_runs_in_transaction() {
    let registry = registry();
    let db = MockExecutor::new();
    let users = Repository::<User, _, _>::new(&db, &registry, Dialect::SqlServer);

    let affected = users.insert(&user(1, "ann")).await.unwrap();
    assert_eq!(affected, 1);

    let events = db.events();
    assert_eq!(events.first(), Some(&Event::Begin));
    assert_eq!(events.last(), Some(&Event::Commit));
    match &events[1] {
        Event::Execute { sql, params } => {
            assert_eq!(
                sql,
                "INSERT INTO [User] ([UserId], [Username], [EmailAddress]) VALUES (@UserId, @Username, @EmailAddress);"
            );
            assert_eq!(params.get("Username"), Some(&Value::from("ann")));
            assert_eq!(params.get("EmailAddress"), Some(&Value::Null));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_insert_many() {
    let registry = registry();
    let db = MockExecutor::new();
    let users = Repository::<User, _, _>::new(&db, &registry, Dialect::Generic);

    assert_eq!(users.insert_many(&[]).await.unwrap(), 0);
    assert!(db.events().is_empty());

    users
        .insert_many(&[user(1, "ann"), user(2, "bob")])
        .await
        .unwrap();
    assert_eq!(
        db.statements(),
        vec![
            "INSERT INTO User (UserId, Username, EmailAddress) VALUES (@UserId, @Username, @EmailAddress), (@UserId1, @Username1, @EmailAddress1);"
        ]
    );
}

#[tokio::test]
async fn test_update_where_column_equals() {
    let registry = registry();
    let db = MockExecutor::new();
    let users = Repository::<User, _, _>::new(&db, &registry, Dialect::Postgres);

    users
        .update_where_column_equals(&user(7, "ann"), "UserId", 7)
        .await
        .unwrap();

    match &db.events()[1] {
        Event::Execute { sql, params } => {
            assert_eq!(
                sql,
                r#"UPDATE "User" SET "UserId" = @UserId, "Username" = @Username, "EmailAddress" = @EmailAddress WHERE "User"."UserId" = @UserId0 ;"#
            );
            assert_eq!(params.get("UserId"), Some(&Value::Int(7)));
            assert_eq!(params.get("UserId0"), Some(&Value::Int(7)));
            assert_eq!(params.len(), 4);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_executor_errors_propagate_unchanged() {
    let registry = registry();
    let db = MockExecutor::new().fail_on(1);
    let users = Repository::<User, _, _>::new(&db, &registry, Dialect::Postgres);

    let err = users.insert(&user(1, "ann")).await.unwrap_err();
    assert!(matches!(err, OrmError::Executor(ref msg) if msg == "statement 1 failed"));
}

#[tokio::test]
async fn test_unregistered_entity_fails_before_io() {
    let registry = EntityRegistry::new();
    let db = MockExecutor::new();
    let users = Repository::<User, _, _>::new(&db, &registry, Dialect::Postgres);

    let err = users.query_by_column_equals("UserId", 1).await.unwrap_err();
    assert!(err.is_configuration());
    assert!(db.events().is_empty());
}
