// src/error.rs
// =============================================================================
// Error types shared by the store, the catalog loader and the probe engine.
//
// Only conditions that the caller must react to are errors here. A malformed
// URL template or a transient network failure on one site is NOT an error:
// those are reported as `ProbeOutcome::Skipped` values by the probe engine.
// =============================================================================

use thiserror::Error;

/// Result alias used by every library-style module in this crate.
pub type Result<T> = std::result::Result<T, FinderError>;

#[derive(Debug, Error)]
pub enum FinderError {
    /// The username was empty (or only whitespace).
    #[error("username must not be empty")]
    InvalidUsername,

    /// Any failure reading or writing the SQLite database.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// The site catalog could not be fetched or decoded.
    #[error("site catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// An unclassified failure while probing a site. Aborts the whole run.
    #[error("fatal error while probing site '{site}': {source}")]
    FatalProbe {
        site: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FinderError {
    /// True for the error that aborts a probe run part-way through.
    pub fn is_fatal_probe(&self) -> bool {
        matches!(self, FinderError::FatalProbe { .. })
    }
}
