// src/store/sites.rs
// =============================================================================
// The Site Catalog as the probe engine consumes it.
//
// Sites are written once by `ingest` (idempotent upsert keyed by name and
// URL template) and only read during lookups.
// =============================================================================

use rusqlite::{params, Row};

use super::{now_timestamp, NewSite, Site, Store};
use crate::error::Result;

impl Store {
    /// Inserts every site not already in the catalog, in one transaction.
    ///
    /// Returns how many rows were newly inserted. Re-ingesting the same
    /// catalog inserts nothing.
    pub fn upsert_sites(&self, sites: &[NewSite]) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let created_at = now_timestamp();
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO sites (name, uri_check, cat, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for site in sites {
                inserted += stmt.execute(params![
                    site.name,
                    site.uri_check,
                    site.category,
                    created_at
                ])?;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    /// The full catalog in insertion order.
    pub fn all_sites(&self) -> Result<Vec<Site>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, uri_check, cat, created_at FROM sites ORDER BY id",
        )?;
        let rows = stmt.query_map([], site_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn site_count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sites", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Maps a row selected as (id, name, uri_check, cat, created_at).
pub(super) fn site_from_row(row: &Row<'_>) -> rusqlite::Result<Site> {
    Ok(Site {
        id: row.get(0)?,
        name: row.get(1)?,
        uri_check: row.get(2)?,
        category: row.get(3)?,
        created_at: row.get(4)?,
    })
}
