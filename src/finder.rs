// src/finder.rs
// =============================================================================
// The "lookup username" operation.
//
// Flow:
// 1. Reject empty usernames
// 2. Already searched? Return the stored matches without probing anything
// 3. Otherwise register the username, load the catalog, run the probe engine
//
// The username is registered before probing starts, so a run that aborts on a
// fatal error still counts as searched and keeps whatever it had recorded.
// =============================================================================

use serde::Serialize;

use crate::error::{FinderError, Result};
use crate::probe::ProbeEngine;
use crate::store::{Site, Store};

/// The answer to one lookup.
#[derive(Debug, Clone, Serialize)]
pub struct Lookup {
    pub username: String,
    /// True if the result came from an earlier search
    pub cached: bool,
    pub sites: Vec<Site>,
}

#[derive(Clone)]
pub struct Finder {
    store: Store,
    engine: ProbeEngine,
}

impl Finder {
    pub fn new(store: Store, engine: ProbeEngine) -> Self {
        Self { store, engine }
    }

    pub async fn lookup(&self, username: &str) -> Result<Lookup> {
        if username.trim().is_empty() {
            return Err(FinderError::InvalidUsername);
        }

        if self.store.has_been_searched(username)? {
            tracing::info!(username, "Username has been previously searched");
            return Ok(Lookup {
                username: username.to_string(),
                cached: true,
                sites: self.store.matches_for(username)?,
            });
        }

        self.store.register_search(username)?;
        let sites = self.store.all_sites()?;
        tracing::info!(username, sites = sites.len(), "Started searching for username");

        let report = self.engine.probe(username, &sites).await?;
        Ok(Lookup {
            username: username.to_string(),
            cached: false,
            sites: report.found,
        })
    }
}
