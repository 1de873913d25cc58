//! Table definitions and the idempotent schema bootstrap.

use rusqlite::Connection;

use crate::error::Result;

/// Every statement is `IF NOT EXISTS`, so running the bootstrap on an
/// existing database is a no-op.
pub(super) const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS usernames_searched (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    search_timestamp TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    uri_check TEXT NOT NULL,
    cat TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (name, uri_check)
);

CREATE TABLE IF NOT EXISTS username_correlations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username_id INTEGER NOT NULL REFERENCES usernames_searched(id),
    site_id INTEGER NOT NULL REFERENCES sites(id),
    found_timestamp TEXT NOT NULL,
    UNIQUE (username_id, site_id)
);

CREATE INDEX IF NOT EXISTS idx_correlations_username
    ON username_correlations(username_id);
"#;

pub(super) fn bootstrap(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(CREATE_TABLES)?;
    tracing::debug!("Database schema ready");
    Ok(())
}
