// src/catalog/mod.rs
// =============================================================================
// This module loads the site catalog the finder probes.
//
// Currently implements:
// - Downloading the WhatsMyName `wmn-data.json` document
// - Reading the same document from a local file
// - Decoding only the fields the probe engine needs (name, uri_check, cat)
//
// The decoded sites are handed to `Store::upsert_sites` by the `ingest`
// command. Nothing here runs during a lookup.
// =============================================================================

mod fetch;

pub use fetch::{fetch_site_list, load_site_list, DEFAULT_SOURCE};
