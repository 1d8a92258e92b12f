//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    quill_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    for table in ["tenant", "user", "api_key", "content_type", "content_entry", "_migration"] {
        assert!(info_str.contains(table), "missing {table} table");
    }
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    quill_db::run_migrations(&db).await.unwrap();
    quill_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len() as u32, quill_db::latest_version());
}

#[tokio::test]
async fn plan_assertion_rejects_unknown_values() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    quill_db::run_migrations(&db).await.unwrap();

    let result = db
        .query("CREATE tenant SET name = 'x', plan = 'Platinum'")
        .await
        .unwrap()
        .check();
    assert!(result.is_err(), "unknown plan must be rejected");
}

#[tokio::test]
async fn connect_and_migrate_embedded() {
    let manager = quill_db::DbManager::connect_and_migrate(&quill_db::DbConfig::default())
        .await
        .unwrap();

    let mut result = manager
        .client()
        .query("SELECT * FROM _migration")
        .await
        .unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1);
}
