//! Command execution, batches and SQL logging through the executor traits.

mod common;

use common::{Blocking, Event, MockExecutor};
use simplify::{
    CommandBuilder, Dialect, Executor, OrmError, QueryBuilder, Row, SimplifyConfig, SqlLogger,
    Value,
};

fn insert(name: &str) -> CommandBuilder {
    CommandBuilder::new(Dialect::Generic).insert_values("t", [("name", name)])
}

fn sql(name: &str) -> String {
    insert(name).build_command()
}

fn execute(name: &str) -> Event {
    let cmd = insert(name);
    Event::Execute {
        sql: cmd.build_command(),
        params: cmd.parameters().clone(),
    }
}

// ==================== run ====================

#[tokio::test]
async fn test_run_uses_its_own_transaction() {
    let db = MockExecutor::new();
    let affected = db.run(&insert("a")).await.unwrap();

    assert_eq!(affected, 1);
    assert_eq!(db.events(), vec![Event::Begin, execute("a"), Event::Commit]);
}

#[tokio::test]
async fn test_run_failure_rolls_back_and_returns_error_unchanged() {
    let db = MockExecutor::new().fail_on(1);
    let err = db.run(&insert("a")).await.unwrap_err();

    assert!(matches!(err, OrmError::Executor(ref msg) if msg == "statement 1 failed"));
    assert_eq!(db.events(), vec![Event::Begin, execute("a"), Event::Rollback]);
}

#[tokio::test]
async fn test_failed_rollback_is_reported_with_original_error() {
    let db = MockExecutor::new().fail_on(1).fail_rollback();
    let err = db.run(&insert("a")).await.unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("statement 1 failed"), "{msg}");
    assert!(msg.contains("rollback failed"), "{msg}");
}

// ==================== run_batch ====================

#[tokio::test]
async fn test_batch_runs_in_order_and_commits() {
    let db = MockExecutor::new();
    db.run_batch(&[insert("a"), insert("b"), insert("c")])
        .await
        .unwrap();

    assert_eq!(db.statements(), vec![sql("a"), sql("b"), sql("c")]);
    assert_eq!(db.events().first(), Some(&Event::Begin));
    assert_eq!(db.events().last(), Some(&Event::Commit));
    assert_eq!(
        db.events().iter().filter(|e| **e == Event::Begin).count(),
        1
    );
}

#[tokio::test]
async fn test_batch_stops_at_first_failure() {
    let db = MockExecutor::new().fail_on(2);
    let err = db
        .run_batch(&[insert("a"), insert("b"), insert("c")])
        .await
        .unwrap_err();

    assert!(matches!(err, OrmError::Executor(_)));
    assert_eq!(db.statements(), vec![sql("a"), sql("b")]);
    assert_eq!(db.events().last(), Some(&Event::Rollback));
    assert!(!db.events().contains(&Event::Commit));
}

#[tokio::test]
async fn test_empty_batch_commits_nothing() {
    let db = MockExecutor::new();
    db.run_batch(&[]).await.unwrap();
    assert_eq!(db.events(), vec![Event::Begin, Event::Commit]);
}

#[test]
fn test_blocking_batch() {
    use simplify::BlockingExecutor;

    let db = MockExecutor::new().fail_on(3);
    let blocking = Blocking(&db);

    blocking.run_batch(&[insert("a"), insert("b")]).unwrap();
    let err = blocking.run_batch(&[insert("c"), insert("d")]).unwrap_err();

    assert!(matches!(err, OrmError::Executor(_)));
    assert_eq!(db.statements(), vec![sql("a"), sql("b"), sql("c")]);
    let boundaries: Vec<Event> = db
        .events()
        .into_iter()
        .filter(|e| matches!(e, Event::Begin | Event::Commit | Event::Rollback))
        .collect();
    assert_eq!(
        boundaries,
        vec![Event::Begin, Event::Commit, Event::Begin, Event::Rollback]
    );
}

// ==================== fetch ====================

#[tokio::test]
async fn test_fetch_maps_rows() {
    let rows = vec![
        Row::new().with("Id", 1).with("Name", "ann"),
        Row::new().with("Id", 2).with("Name", "bob"),
    ];
    let db = MockExecutor::new().with_rows(rows.clone());
    let query = QueryBuilder::new(Dialect::SqlServer)
        .select_all_from("User")
        .where_greater("User", "Id", 0);

    let all: Vec<Row> = db.fetch_all(&query).await.unwrap();
    assert_eq!(all, rows);

    let first: Option<Row> = db.fetch_first_or_default(&query).await.unwrap();
    assert_eq!(first.and_then(|r| r.get("Name").cloned()), Some(Value::from("ann")));

    match &db.events()[0] {
        Event::Query { sql, params } => {
            assert_eq!(sql, "SELECT [User].* FROM [User] WHERE [User].[Id] > @Id0 ;");
            assert_eq!(params, query.parameters());
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_first_on_empty_result() {
    let db = MockExecutor::new();
    let query = QueryBuilder::new(Dialect::Generic).select_all_from("User");
    let first: Option<Row> = db.fetch_first_or_default(&query).await.unwrap();
    assert!(first.is_none());
}

// ==================== Logging ====================

#[tokio::test]
async fn test_logged_executor_passes_through() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();

    let config = SimplifyConfig::new(Dialect::Postgres).with_max_logged_sql_length(Some(16));
    let db = config.instrument(MockExecutor::new().fail_on(2));

    db.run_batch(&[insert("a")]).await.unwrap();
    let err = db.run_batch(&[insert("b"), insert("c")]).await.unwrap_err();
    assert!(matches!(err, OrmError::Executor(_)));

    let rows: Vec<Row> = db
        .fetch_all(&config.query().select_all_from("User"))
        .await
        .unwrap();
    assert!(rows.is_empty());

    let inner = db.into_inner();
    assert_eq!(inner.statements(), vec![sql("a"), sql("b")]);
    assert_eq!(inner.queries(), vec![r#"SELECT "User".* FROM "User" ;"#]);
}

#[test]
fn test_logger_settings_follow_config() {
    let logger = SimplifyConfig::default().with_sql_logging(false).logger();
    assert!(!logger.enabled);
    assert_eq!(logger.max_sql_length, Some(200));

    let logger = SqlLogger::new().max_sql_length(6);
    assert_eq!(logger.truncate_sql("SELECT 1 ;"), "SELECT...");
}
