// src/probe/mod.rs
// =============================================================================
// The probe engine: checks one username against every site in the catalog.
//
// Submodules:
// - template: substitutes the username into a site's URL template
// - http: one HEAD request per site, classified into a ProbeOutcome
// - engine: bounded-concurrency fan-out over the catalog, persisting matches
//
// Only a Fatal outcome escapes the engine as an error. Malformed templates
// and transient network failures are logged and skipped.
// =============================================================================

mod engine;
mod http;
mod template;

pub use engine::{build_client, ProbeConfig, ProbeEngine};
