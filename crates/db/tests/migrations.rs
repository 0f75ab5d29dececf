mod support;

use rusqlite::Connection;
use support::setup_db;
use water_db::{Db, migration_names};

#[test]
fn migrate_records_every_migration() {
    let test_db = setup_db();
    let applied = test_db.db.applied_migrations().expect("applied");
    assert_eq!(applied, migration_names());
}

#[test]
fn migrate_is_idempotent_and_keeps_data() {
    let mut test_db = setup_db();
    test_db
        .db
        .put_value("water_usage", "state", "{}")
        .expect("put");

    test_db.db.migrate().expect("second migrate");
    let mut reopened = Db::open(&test_db.path).expect("reopen");
    reopened.migrate().expect("third migrate");

    assert_eq!(
        reopened
            .get_value("water_usage", "state")
            .expect("get")
            .as_deref(),
        Some("{}")
    );
    assert_eq!(
        reopened.applied_migrations().expect("applied").len(),
        migration_names().len()
    );
}

#[test]
fn migrate_adopts_database_without_migration_record() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("legacy.sqlite");
    {
        let conn = Connection::open(&db_path).expect("open conn");
        conn.execute_batch(
            r#"
            CREATE TABLE kv_entry (
              namespace TEXT NOT NULL,
              key TEXT NOT NULL,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL,
              PRIMARY KEY (namespace, key)
            );
            INSERT INTO kv_entry (namespace, key, value, updated_at)
            VALUES ('water_usage', 'state', '{"lifetime_total_ml":1.5}', '2025-12-19T10:00:00.000Z');
            "#,
        )
        .expect("create legacy schema");
    }

    let mut db = Db::open(&db_path).expect("open db");
    db.migrate().expect("migrate db");

    assert_eq!(
        db.get_value("water_usage", "state").expect("get").as_deref(),
        Some(r#"{"lifetime_total_ml":1.5}"#)
    );
    assert_eq!(db.applied_migrations().expect("applied"), vec!["0001_init"]);
}
