// src/store/mod.rs
// =============================================================================
// SQLite persistence for the finder.
//
// Three record sets live in one database file:
// - usernames_searched: every username that has been looked up (Search Cache)
// - sites: the probing catalog (written by `ingest`, read-only afterwards)
// - username_correlations: (username, site) pairs confirmed by a probe
//
// Submodules each add one group of methods to `Store`:
// - schema: table definitions and bootstrap
// - sites: catalog upsert and reads
// - searches: the Search Cache
// - correlations: the Correlation Store
//
// `Store` is cheap to clone. All clones share one connection behind a mutex,
// so concurrent lookups for different usernames can write safely.
// =============================================================================

mod correlations;
mod schema;
mod searches;
mod sites;

use parking_lot::Mutex;
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

/// A site in the probing catalog, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    pub id: i64,
    /// Display name, e.g. "GitHub"
    pub name: String,
    /// URL template containing a single `{account}` placeholder
    pub uri_check: String,
    /// Category label from the catalog, e.g. "coding"
    pub category: String,
    pub created_at: String,
}

/// A site descriptor waiting to be inserted into the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSite {
    pub name: String,
    pub uri_check: String,
    pub category: String,
}

/// A username that has been searched at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Username {
    pub id: i64,
    pub username: String,
    pub search_timestamp: String,
}

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (or creates) the database file at `path` and bootstraps the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Opened database");
        Self::from_connection(conn)
    }

    /// In-memory database, used by `--db :memory:` and by the tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::bootstrap(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

/// Current time as an RFC 3339 UTC string, the format every timestamp column uses.
fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
