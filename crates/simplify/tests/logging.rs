//! `tracing` events emitted by the SQL logger, batches and hydration.

mod common;

use common::MockExecutor;
use common::capture::capture;
use simplify::{
    CommandBuilder, Dialect, Entity, EntityRegistry, Executor, FromRow, Hydrator, Member,
    NamingConvention, OrmResult, Row, SimplifyConfig, TableMeta, Value, key,
};
use tracing::Level;

fn insert(name: &str) -> CommandBuilder {
    CommandBuilder::new(Dialect::Generic).insert_values("t", [("name", name)])
}

// ==================== simplify.sql ====================

#[tokio::test]
async fn test_statements_are_logged_with_kind_and_truncated_sql() {
    let capture = capture();
    let config = SimplifyConfig::new(Dialect::Generic).with_max_logged_sql_length(Some(16));
    let db = config.instrument(MockExecutor::new());

    let cmd = insert("a");
    let full_sql = cmd.build_command();
    db.execute(&full_sql, cmd.parameters()).await.unwrap();
    db.run(&insert("b")).await.unwrap();
    let _: Vec<Row> = db
        .fetch_all(&config.query().select_all_from("User").where_equals("User", "Id", 1))
        .await
        .unwrap();

    let events = capture.target("simplify.sql");
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.level == Level::DEBUG));

    let kinds: Vec<&str> = events.iter().filter_map(|e| e.field("kind")).collect();
    assert_eq!(kinds, vec!["command", "batch", "query"]);

    let expected = format!("{}...", &full_sql[..16]);
    assert_eq!(events[0].field("sql"), Some(expected.as_str()));
    assert_eq!(events[0].field("param_count"), Some("1"));
    assert_eq!(events[2].field("param_count"), Some("1"));
}

#[tokio::test]
async fn test_short_sql_is_logged_whole() {
    let capture = capture();
    let config = SimplifyConfig::new(Dialect::Generic).with_max_logged_sql_length(None);
    let db = config.instrument(MockExecutor::new());

    let query = config.query().select_all_from("User");
    let _: Vec<Row> = db.fetch_all(&query).await.unwrap();

    let events = capture.target("simplify.sql");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("sql"), Some(query.build_query().as_str()));
    assert_eq!(events[0].field("param_count"), Some("0"));
}

#[tokio::test]
async fn test_disabled_logging_emits_nothing() {
    let capture = capture();
    let config = SimplifyConfig::new(Dialect::Generic).with_sql_logging(false);
    let db = config.instrument(MockExecutor::new());

    db.run_batch(&[insert("a"), insert("b")]).await.unwrap();

    assert!(capture.target("simplify.sql").is_empty());
}

#[tokio::test]
async fn test_failed_batch_warns_before_rollback() {
    let capture = capture();
    let db = MockExecutor::new().fail_on(2);

    db.run_batch(&[insert("a"), insert("b"), insert("c")])
        .await
        .unwrap_err();

    let warnings: Vec<_> = capture
        .target("simplify.sql")
        .into_iter()
        .filter(|e| e.level == Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field("statements"), Some("3"));
    assert_eq!(warnings[0].field("message"), Some("batch failed; rolling back"));
    let error = warnings[0].field("error").unwrap_or_default();
    assert!(error.contains("statement 2 failed"), "{error}");
}

#[tokio::test]
async fn test_successful_batch_does_not_warn() {
    let capture = capture();
    let db = MockExecutor::new();

    db.run_batch(&[insert("a")]).await.unwrap();

    assert!(capture.events().iter().all(|e| e.level != Level::WARN));
}

// ==================== simplify.hydrate ====================

#[derive(Debug, Clone, Default, PartialEq)]
struct Post {
    id: i64,
    author_id: i64,
}

impl Entity for Post {
    const PROPERTIES: &'static [&'static str] = &["id", "author_id"];

    fn column_values(&self) -> Vec<Value> {
        vec![self.id.into(), self.author_id.into()]
    }

    fn table_meta() -> TableMeta {
        TableMeta::new("Post").naming(NamingConvention::Pascal)
    }
}

impl FromRow for Post {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(Self {
            id: row.try_get("Id")?,
            author_id: row.try_get("AuthorId")?,
        })
    }
}

#[derive(Debug, Default)]
struct Author {
    id: i64,
    posts: Vec<Post>,
}

impl Entity for Author {
    const PROPERTIES: &'static [&'static str] = &["id"];

    fn column_values(&self) -> Vec<Value> {
        vec![self.id.into()]
    }
}

fn post_row(id: i64, author_id: i64) -> Row {
    Row::new().with("Id", id).with("AuthorId", author_id)
}

#[tokio::test]
async fn test_hydration_reports_relation_and_counts() {
    let mut registry = EntityRegistry::new();
    registry.register::<Author>().unwrap();
    registry.register::<Post>().unwrap();
    let relation = Hydrator::new(&registry, Dialect::Generic)
        .relation(
            key!(Author, id),
            Member::many("posts", |a: &mut Author| &mut a.posts),
            key!(Post, author_id),
        )
        .unwrap();

    let capture = capture();
    let db = MockExecutor::new().with_rows(vec![post_row(10, 1), post_row(11, 1), post_row(20, 2)]);
    let mut authors = vec![
        Author { id: 1, ..Author::default() },
        Author { id: 2, ..Author::default() },
    ];
    relation.hydrate_all(&db, &mut authors).await.unwrap();

    let events = capture.target("simplify.hydrate");
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.level, Level::DEBUG);
    assert_eq!(event.field("child_table"), Some("Post"));
    assert_eq!(event.field("member"), Some("posts"));
    assert_eq!(event.field("kind"), Some("Many"));
    assert_eq!(event.field("parents"), Some("2"));
    assert_eq!(event.field("children"), Some("3"));

    relation.hydrate_all(&db, &mut []).await.unwrap();
    assert_eq!(capture.target("simplify.hydrate").len(), 1);
}
