// src/store/correlations.rs
// =============================================================================
// The Correlation Store: (username, site) pairs a probe confirmed.
//
// The pair is UNIQUE in the schema and inserts use INSERT OR IGNORE, so
// recording the same match twice (even from two concurrent runs) leaves a
// single row.
// =============================================================================

use rusqlite::params;

use super::sites::site_from_row;
use super::{now_timestamp, Site, Store};
use crate::error::Result;

impl Store {
    /// Records that `username` exists on `site`.
    ///
    /// Returns true if a new correlation was written, false if it was
    /// already there. The username row is created if missing.
    pub fn record_match(&self, username: &str, site: &Site) -> Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let now = now_timestamp();

        tx.execute(
            "INSERT OR IGNORE INTO usernames_searched (username, search_timestamp)
             VALUES (?1, ?2)",
            params![username, now],
        )?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO username_correlations (username_id, site_id, found_timestamp)
             SELECT id, ?2, ?3 FROM usernames_searched WHERE username = ?1",
            params![username, site.id, now],
        )?;

        tx.commit()?;
        Ok(inserted > 0)
    }

    /// All sites correlated with `username`, in catalog order.
    ///
    /// Empty both for "searched, nothing found" and "never searched";
    /// use `has_been_searched` to tell them apart.
    pub fn matches_for(&self, username: &str) -> Result<Vec<Site>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT s.id, s.name, s.uri_check, s.cat, s.created_at
             FROM username_correlations c
             JOIN usernames_searched u ON u.id = c.username_id
             JOIN sites s ON s.id = c.site_id
             WHERE u.username = ?1
             ORDER BY s.id",
        )?;
        let rows = stmt.query_map(params![username], site_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
