// src/store/searches.rs
// =============================================================================
// The Search Cache: remembers which usernames have already been probed.
//
// A username is "searched" as soon as its row exists, even if no site
// matched. That is what separates "never probed" from "probed, no matches".
// =============================================================================

use rusqlite::{params, OptionalExtension};

use super::{now_timestamp, Store, Username};
use crate::error::Result;

impl Store {
    pub fn has_been_searched(&self, username: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let found = conn
            .query_row(
                "SELECT 1 FROM usernames_searched WHERE username = ?1",
                params![username],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Records that `username` has been searched.
    ///
    /// Registering twice is a no-op: the existing record, with its original
    /// timestamp, is returned.
    pub fn register_search(&self, username: &str) -> Result<Username> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR IGNORE INTO usernames_searched (username, search_timestamp)
             VALUES (?1, ?2)",
            params![username, now_timestamp()],
        )?;
        let record = conn.query_row(
            "SELECT id, username, search_timestamp FROM usernames_searched WHERE username = ?1",
            params![username],
            |row| {
                Ok(Username {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    search_timestamp: row.get(2)?,
                })
            },
        )?;
        Ok(record)
    }
}
