// src/catalog/fetch.rs
// =============================================================================
// Fetches and decodes the WhatsMyName site list.
//
// Document shape (other fields are ignored):
//   { "sites": [ { "name": "GitHub", "uri_check": "https://github.com/{account}",
//                  "cat": "coding", ... }, ... ] }
//
// Entries missing a name, uri_check or cat are skipped with a warning. The
// templates themselves are not validated here; the probe engine skips
// malformed ones at lookup time.
// =============================================================================

use reqwest::Client;
use serde::Deserialize;
use std::path::Path;

use crate::error::{FinderError, Result};
use crate::store::NewSite;

/// Where `ingest` downloads the catalog from by default.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/WebBreacher/WhatsMyName/main/wmn-data.json";

#[derive(Debug, Deserialize)]
struct WmnDocument {
    sites: Vec<WmnSite>,
}

#[derive(Debug, Deserialize)]
struct WmnSite {
    name: Option<String>,
    uri_check: Option<String>,
    cat: Option<String>,
}

// Downloads and decodes the catalog at `url`
//
// Returns: the decoded sites, or CatalogUnavailable if the request fails,
// the server answers with a non-success status, or the body does not decode
pub async fn fetch_site_list(client: &Client, url: &str) -> Result<Vec<NewSite>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FinderError::CatalogUnavailable(format!("request to {} failed: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(FinderError::CatalogUnavailable(format!(
            "failed to fetch {}: HTTP {}",
            url,
            response.status().as_u16()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FinderError::CatalogUnavailable(format!("failed to read {}: {}", url, e)))?;

    let sites = parse_site_list(&body)?;
    tracing::info!(url, sites = sites.len(), "Retrieved site list");
    Ok(sites)
}

/// Reads and decodes a catalog saved on disk.
pub fn load_site_list(path: &Path) -> Result<Vec<NewSite>> {
    let body = std::fs::read_to_string(path).map_err(|e| {
        FinderError::CatalogUnavailable(format!("failed to read {}: {}", path.display(), e))
    })?;
    let sites = parse_site_list(&body)?;
    tracing::info!(path = %path.display(), sites = sites.len(), "Loaded site list");
    Ok(sites)
}

fn parse_site_list(json: &str) -> Result<Vec<NewSite>> {
    let document: WmnDocument = serde_json::from_str(json)
        .map_err(|e| FinderError::CatalogUnavailable(format!("invalid site list: {}", e)))?;

    let mut sites = Vec::with_capacity(document.sites.len());
    for (index, entry) in document.sites.into_iter().enumerate() {
        match (entry.name, entry.uri_check, entry.cat) {
            (Some(name), Some(uri_check), Some(category)) => sites.push(NewSite {
                name,
                uri_check,
                category,
            }),
            (name, _, _) => {
                tracing::warn!(
                    index,
                    name = name.as_deref().unwrap_or("<unnamed>"),
                    "Skipping catalog entry without name, uri_check or cat"
                );
            }
        }
    }
    Ok(sites)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Option<String> for every field?
//    - serde fails the whole document if a required field is missing
//    - With Option, one incomplete entry is skipped instead of rejecting
//      the other few hundred
//
// 2. What does map_err do here?
//    - It turns reqwest/serde/io errors into our own CatalogUnavailable
//      variant, with a message saying which step failed
// -----------------------------------------------------------------------------
