use chrono::{SecondsFormat, Utc};
use rusqlite::{Transaction, params};

use crate::Db;
use crate::error::Result;

const MIGRATION_0001: &str = include_str!("../migrations/0001_init.sql");

const MIGRATIONS: &[(&str, &str)] = &[("0001_init", MIGRATION_0001)];

pub fn migration_names() -> Vec<&'static str> {
    MIGRATIONS.iter().map(|(name, _)| *name).collect()
}

impl Db {
    /// Applies every migration in one transaction. Each script is idempotent,
    /// so running this on an up-to-date database is a no-op.
    pub fn migrate(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (_, sql) in MIGRATIONS {
            tx.execute_batch(sql)?;
        }
        record_applied(&tx)?;
        tx.commit()?;
        Ok(())
    }

    pub fn applied_migrations(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM schema_migration ORDER BY name ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn record_applied(tx: &Transaction<'_>) -> Result<()> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut stmt =
        tx.prepare("INSERT OR IGNORE INTO schema_migration (name, applied_at) VALUES (?1, ?2)")?;
    for (name, _) in MIGRATIONS {
        stmt.execute(params![name, now])?;
    }
    Ok(())
}
