// src/probe/engine.rs
// =============================================================================
// Fans a username out over the whole catalog.
//
// How it works:
// 1. Build one check future per site (nothing runs yet)
// 2. Run them through buffer_unordered(limit): at most `limit` checks are in
//    flight at once, and results arrive in completion order
// 3. Each Found is written to the Correlation Store as soon as it arrives
// 4. A Fatal outcome returns early. Dropping the stream cancels every
//    in-flight check and no further requests are started. Matches already
//    written stay written.
// =============================================================================

use futures::stream::{self, StreamExt};
use reqwest::{redirect, Client};
use std::collections::HashSet;
use std::time::Duration;

use super::http::{check_site, ProbeOutcome, SkipReason};
use crate::error::{FinderError, Result};
use crate::store::{Site, Store};

pub const DEFAULT_CONCURRENCY: usize = 50;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tuning for a probe run.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Maximum number of checks in flight at once (at least 1)
    pub concurrency: usize,
    /// Per-request timeout, covering connect and response headers
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// Builds the HTTP client shared by every probe
//
// Redirects are not followed: a site that redirects a missing profile to its
// home page must not count as a match.
pub fn build_client(config: &ProbeConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(config.timeout)
        .connect_timeout(config.timeout)
        .redirect(redirect::Policy::none())
        .user_agent(concat!("wmn-finder/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// What a completed run found.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Sites where the account exists, in catalog order
    pub found: Vec<Site>,
    pub not_found: usize,
    pub malformed: usize,
    pub transient: usize,
}

#[derive(Clone)]
pub struct ProbeEngine {
    client: Client,
    store: Store,
    concurrency: usize,
}

impl ProbeEngine {
    pub fn new(client: Client, store: Store, config: &ProbeConfig) -> Self {
        Self {
            client,
            store,
            concurrency: config.concurrency.max(1),
        }
    }

    /// Probes every site in `sites` for `username`.
    ///
    /// Returns `FinderError::FatalProbe` if any check fails in an
    /// unclassified way; correlations recorded before that point remain.
    pub async fn probe(&self, username: &str, sites: &[Site]) -> Result<ProbeReport> {
        let checks = sites.iter().map(|site| {
            let client = &self.client;
            async move { (site, check_site(client, site, username).await) }
        });

        let mut outcomes = stream::iter(checks).buffer_unordered(self.concurrency);
        let mut report = ProbeReport::default();
        let mut seen = HashSet::new();

        while let Some((site, outcome)) = outcomes.next().await {
            match outcome {
                ProbeOutcome::Found => {
                    self.store.record_match(username, site)?;
                    if seen.insert(site.id) {
                        report.found.push(site.clone());
                    }
                    tracing::info!(
                        username,
                        site = site.name.as_str(),
                        uri_check = site.uri_check.as_str(),
                        "Username found on site"
                    );
                }
                ProbeOutcome::NotFound(status) => {
                    report.not_found += 1;
                    tracing::debug!(
                        username,
                        site = site.name.as_str(),
                        status = status.as_u16(),
                        "Username not found on site"
                    );
                }
                ProbeOutcome::Skipped(reason) => {
                    match reason {
                        SkipReason::Malformed(_) => report.malformed += 1,
                        SkipReason::Transient { .. } => report.transient += 1,
                    }
                    tracing::warn!(
                        username,
                        site = site.name.as_str(),
                        uri_check = site.uri_check.as_str(),
                        reason = %reason,
                        "Skipped site"
                    );
                }
                ProbeOutcome::Fatal(error) => {
                    tracing::error!(
                        username,
                        site = site.name.as_str(),
                        error = %error,
                        recorded = report.found.len(),
                        "Unexpected error, aborting search"
                    );
                    return Err(FinderError::FatalProbe {
                        site: site.name.clone(),
                        source: error,
                    });
                }
            }
        }

        report.found.sort_by_key(|site| site.id);
        tracing::info!(
            username,
            probed = sites.len(),
            found = report.found.len(),
            not_found = report.not_found,
            malformed = report.malformed,
            transient = report.transient,
            "Finished searching"
        );
        Ok(report)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why buffer_unordered instead of tokio::spawn per site?
//    - The catalog has hundreds of sites; spawning them all at once would open
//      hundreds of connections at the same moment
//    - buffer_unordered(N) keeps exactly N futures running and starts the next
//      one only when a slot frees up
//
// 2. Why can the futures borrow `sites` and `username`?
//    - They never leave this function: the stream is polled to completion (or
//      dropped) before probe() returns, so plain references are enough
//
// 3. What does returning early from the while loop do?
//    - `outcomes` is dropped, and with it every future still inside
//    - Dropping a reqwest future cancels its request
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewSite;
    use crate::test_support::{refused_address, test_client, Route, TestServer};

    fn catalog(store: &Store, entries: &[(&str, String)]) -> Vec<Site> {
        let sites: Vec<NewSite> = entries
            .iter()
            .map(|(name, uri_check)| NewSite {
                name: name.to_string(),
                uri_check: uri_check.clone(),
                category: "test".to_string(),
            })
            .collect();
        store.upsert_sites(&sites).unwrap();
        store.all_sites().unwrap()
    }

    fn engine(store: &Store, concurrency: usize) -> ProbeEngine {
        let config = ProbeConfig {
            concurrency,
            ..ProbeConfig::default()
        };
        ProbeEngine::new(test_client(), store.clone(), &config)
    }

    fn names(sites: &[Site]) -> Vec<&str> {
        sites.iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_found_sites_are_returned_and_recorded() {
        let server = TestServer::start(vec![("/alpha/neo", Route::status(200))]).await;
        let store = Store::open_in_memory().unwrap();
        let sites = catalog(
            &store,
            &[
                ("Alpha", server.url("/alpha/{account}")),
                ("Beta", server.url("/beta/{account}")),
            ],
        );

        let report = engine(&store, 4).probe("neo", &sites).await.unwrap();

        assert_eq!(names(&report.found), vec!["Alpha"]);
        assert_eq!(report.not_found, 1);
        assert_eq!(names(&store.matches_for("neo").unwrap()), vec!["Alpha"]);
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn test_empty_catalog_is_zero_matches() {
        let store = Store::open_in_memory().unwrap();
        let report = engine(&store, 4).probe("neo", &[]).await.unwrap();
        assert_eq!(report, ProbeReport::default());
    }

    #[tokio::test]
    async fn test_bad_sites_do_not_suppress_good_ones() {
        let server = TestServer::start(vec![
            ("/alpha/neo", Route::status(200)),
            ("/flaky/neo", Route::hang_up()),
            ("/gamma/neo", Route::status(200)),
        ])
        .await;
        let refused = refused_address().await;
        let store = Store::open_in_memory().unwrap();
        let sites = catalog(
            &store,
            &[
                ("Alpha", server.url("/alpha/{account}")),
                ("NoPlaceholder", server.url("/static/")),
                ("Unbalanced", server.url("/x/{account")),
                ("Refused", format!("http://{}/{{account}}", refused)),
                ("Flaky", server.url("/flaky/{account}")),
                ("Gamma", server.url("/gamma/{account}")),
            ],
        );

        let report = engine(&store, 3).probe("neo", &sites).await.unwrap();

        assert_eq!(names(&report.found), vec!["Alpha", "Gamma"]);
        assert_eq!(report.malformed, 2);
        assert_eq!(report.transient, 2);
    }

    #[tokio::test]
    async fn test_result_is_independent_of_concurrency() {
        let routes = (0..12)
            .map(|i| {
                let status = if i % 3 == 0 { 200 } else { 404 };
                (format!("/site{}/neo", i), Route::status(status))
            })
            .collect::<Vec<_>>();
        let server = TestServer::start(
            routes
                .iter()
                .map(|(path, route)| (path.as_str(), route.clone()))
                .collect(),
        )
        .await;
        let store = Store::open_in_memory().unwrap();
        let entries: Vec<(String, String)> = (0..12)
            .map(|i| (format!("Site{}", i), server.url(&format!("/site{}/{{account}}", i))))
            .collect();
        let entries: Vec<(&str, String)> = entries
            .iter()
            .map(|(name, url)| (name.as_str(), url.clone()))
            .collect();
        let sites = catalog(&store, &entries);

        let sequential = engine(&store, 1).probe("neo", &sites).await.unwrap();
        let concurrent = engine(&store, 8).probe("neo", &sites).await.unwrap();

        assert_eq!(names(&sequential.found), vec!["Site0", "Site3", "Site6", "Site9"]);
        assert_eq!(sequential.found, concurrent.found);
        assert_eq!(store.matches_for("neo").unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_in_flight_checks_never_exceed_limit() {
        let routes: Vec<(String, Route)> = (0..8)
            .map(|i| {
                (
                    format!("/slow{}/neo", i),
                    Route::status(404).with_delay(Duration::from_millis(100)),
                )
            })
            .collect();
        let server = TestServer::start(
            routes
                .iter()
                .map(|(path, route)| (path.as_str(), route.clone()))
                .collect(),
        )
        .await;
        let store = Store::open_in_memory().unwrap();
        let entries: Vec<(String, String)> = (0..8)
            .map(|i| (format!("Slow{}", i), server.url(&format!("/slow{}/{{account}}", i))))
            .collect();
        let entries: Vec<(&str, String)> = entries
            .iter()
            .map(|(name, url)| (name.as_str(), url.clone()))
            .collect();
        let sites = catalog(&store, &entries);

        engine(&store, 2).probe("neo", &sites).await.unwrap();

        assert_eq!(server.hits(), 8);
        assert!(server.max_in_flight() <= 2);
        assert!(server.max_in_flight() >= 1);
    }

    #[tokio::test]
    async fn test_fatal_aborts_run_but_keeps_earlier_matches() {
        let server = TestServer::start(vec![
            ("/alpha/neo", Route::status(200)),
            ("/gamma/neo", Route::status(200)),
        ])
        .await;
        let store = Store::open_in_memory().unwrap();
        let sites = catalog(
            &store,
            &[
                ("Alpha", server.url("/alpha/{account}")),
                ("Beta", "ftp://beta.test/{account}".to_string()),
                ("Gamma", server.url("/gamma/{account}")),
            ],
        );

        // With one check in flight the sites run in catalog order
        let err = engine(&store, 1).probe("neo", &sites).await.unwrap_err();

        match err {
            FinderError::FatalProbe { site, .. } => assert_eq!(site, "Beta"),
            other => panic!("expected FatalProbe, got {:?}", other),
        }
        assert_eq!(names(&store.matches_for("neo").unwrap()), vec!["Alpha"]);
        // Gamma was never requested
        assert_eq!(server.hits(), 1);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let store = Store::open_in_memory().unwrap();
        let engine = engine(&store, 0);
        assert_eq!(engine.concurrency, 1);
    }

    #[test]
    fn test_build_client_with_defaults() {
        assert!(build_client(&ProbeConfig::default()).is_ok());
    }
}
