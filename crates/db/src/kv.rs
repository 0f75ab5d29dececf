use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use rusqlite::params;

use crate::Db;
use crate::error::Result;

/// Namespaced string store. Every `put` replaces the whole value in one
/// write, so readers observe either the previous or the new value.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>>;
    fn put(&self, namespace: &str, key: &str, value: &str) -> Result<()>;
    fn delete(&self, namespace: &str, key: &str) -> Result<()>;
}

impl Db {
    pub fn get_value(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv_entry WHERE namespace = ?1 AND key = ?2")?;
        let mut rows = stmt.query(params![namespace, key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get::<_, String>(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn put_value(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.conn.execute(
            r#"
            INSERT INTO kv_entry (namespace, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(namespace, key) DO UPDATE SET
              value = excluded.value,
              updated_at = excluded.updated_at
            "#,
            params![namespace, key, value, now],
        )?;
        Ok(())
    }

    pub fn delete_value(&self, namespace: &str, key: &str) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM kv_entry WHERE namespace = ?1 AND key = ?2",
            params![namespace, key],
        )?;
        Ok(deleted)
    }

    pub fn list_keys(&self, namespace: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entry WHERE namespace = ?1 ORDER BY key ASC")?;
        let rows = stmt.query_map(params![namespace], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

/// SQLite-backed store that opens a connection per operation.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn db(&self) -> Result<Db> {
        Db::open(&self.path)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        self.db()?.get_value(namespace, key)
    }

    fn put(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        self.db()?.put_value(namespace, key, value)
    }

    fn delete(&self, namespace: &str, key: &str) -> Result<()> {
        self.db()?.delete_value(namespace, key).map(|_| ())
    }
}
