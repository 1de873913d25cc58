// src/probe/http.rs
// =============================================================================
// Checks a single site for a single username.
//
// Key functionality:
// - Expands the site's URL template (malformed templates are skipped)
// - Makes one HTTP HEAD request (metadata only, no body download)
// - Classifies the result into a ProbeOutcome instead of returning an error,
//   so expected conditions like a refused connection never unwind the run
//
// Classification:
// - HTTP 200                          -> Found
// - any other status (incl. 3xx)      -> NotFound
// - timeout / connect / read failure  -> Skipped(Transient)
// - anything else                     -> Fatal (aborts the whole run)
// =============================================================================

use reqwest::{Client, Response, StatusCode};
use std::fmt;

use super::template::{expand_template, MalformedReason};
use crate::store::Site;

/// Result of probing one site.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The site answered 200: the account exists
    Found,
    /// The site answered with another status
    NotFound(StatusCode),
    /// The site contributes nothing to this run
    Skipped(SkipReason),
    /// Unclassified failure; the run must stop
    Fatal(reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Malformed(MalformedReason),
    Transient { kind: TransientKind, detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientKind {
    Timeout,
    Connect,
    Read,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Malformed(reason) => write!(f, "malformed URL template: {}", reason),
            SkipReason::Transient { kind, detail } => {
                let kind = match kind {
                    TransientKind::Timeout => "timed out",
                    TransientKind::Connect => "connection failed",
                    TransientKind::Read => "read failed",
                };
                write!(f, "{}: {}", kind, detail)
            }
        }
    }
}

// Probes `site` for `username`
//
// The client is borrowed: one client (and its connection pool) is shared by
// every concurrent check.
pub async fn check_site(client: &Client, site: &Site, username: &str) -> ProbeOutcome {
    let url = match expand_template(&site.uri_check, username) {
        Ok(url) => url,
        Err(reason) => return ProbeOutcome::Skipped(SkipReason::Malformed(reason)),
    };

    match client.head(url).send().await {
        Ok(response) => analyze_response(&response),
        Err(e) => categorize_error(e),
    }
}

fn analyze_response(response: &Response) -> ProbeOutcome {
    let status = response.status();
    if status == StatusCode::OK {
        ProbeOutcome::Found
    } else {
        ProbeOutcome::NotFound(status)
    }
}

// Sorts reqwest errors into transient (skip this site) and fatal (stop).
//
// A connect timeout reports both is_timeout() and is_connect(); it is
// classified as a timeout.
fn categorize_error(error: reqwest::Error) -> ProbeOutcome {
    let kind = if error.is_timeout() {
        TransientKind::Timeout
    } else if error.is_connect() {
        TransientKind::Connect
    } else if error.is_request() || error.is_body() {
        TransientKind::Read
    } else {
        return ProbeOutcome::Fatal(error);
    };

    ProbeOutcome::Skipped(SkipReason::Transient {
        kind,
        detail: error.to_string(),
    })
}
