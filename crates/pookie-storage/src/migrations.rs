//! Database migrations
//!
//! The schema version lives in SQLite's `user_version` header field.

use crate::Result;
use rusqlite::Connection;

/// Ordered schema steps; step `i` brings the schema to version `i + 1`.
const MIGRATIONS: &[(&str, &str)] = &[(
    "slot table",
    r#"
    CREATE TABLE IF NOT EXISTS slots (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
)];

pub fn schema_version(conn: &Connection) -> Result<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current = schema_version(conn)? as usize;

    for (index, (name, sql)) in MIGRATIONS.iter().enumerate().skip(current) {
        let version = index + 1;
        tracing::info!(version, name, "Running migration");

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version as u32)?;
        tx.commit()?;
    }

    Ok(())
}
