// src/main.rs
// =============================================================================
// This is the entry point of the wmn-finder CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and open the SQLite database
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = matches found, 1 = no matches, 2 = error)
// =============================================================================

mod catalog;       // src/catalog/ - site list download and decoding
mod cli;           // src/cli.rs - command-line parsing
mod error;         // src/error.rs - error taxonomy
mod finder;        // src/finder.rs - the lookup operation
mod logging;       // src/logging.rs - tracing setup
mod probe;         // src/probe/ - the probe engine
mod store;         // src/store/ - SQLite persistence

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use cli::{Cli, Commands};
use finder::{Finder, Lookup};
use probe::{ProbeConfig, ProbeEngine};
use store::{Site, Store};

/// Timeout for downloading the catalog document, which is much larger than a probe.
const CATALOG_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = success (a lookup found at least one site)
//   Ok(1) = lookup completed with no matches
//   Err   = any failure, including a lookup aborted by a fatal probe error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let store = open_store(&cli.db)?;
    let config = ProbeConfig {
        concurrency: cli.concurrency as usize,
        timeout: Duration::from_secs(cli.timeout_secs),
    };

    match cli.command {
        Commands::Ingest { source, file } => handle_ingest(&store, &source, file.as_deref()).await,
        Commands::Lookup { username, json } => {
            handle_lookup(store, &config, &username, json).await
        }
        Commands::Sites { json } => handle_sites(&store, json),
    }
}

fn open_store(db: &Path) -> Result<Store> {
    let store = if db == Path::new(":memory:") {
        Store::open_in_memory()
    } else {
        Store::open(db)
    };
    store.with_context(|| format!("failed to open database {}", db.display()))
}

// Handles the 'ingest' subcommand: schema is already bootstrapped by
// open_store, so this only loads the catalog
async fn handle_ingest(store: &Store, source: &str, file: Option<&Path>) -> Result<i32> {
    tracing::info!("Ingesting website data...");

    let sites = match file {
        Some(path) => catalog::load_site_list(path)?,
        None => {
            let client = Client::builder().timeout(CATALOG_TIMEOUT).build()?;
            catalog::fetch_site_list(&client, source).await?
        }
    };

    let inserted = store.upsert_sites(&sites)?;
    let total = store.site_count()?;
    tracing::info!(decoded = sites.len(), inserted, total, "Ingested site catalog");

    println!("📥 Ingested {} site(s) ({} new, {} in catalog)", sites.len(), inserted, total);
    Ok(0)
}

// Handles the 'lookup' subcommand
async fn handle_lookup(store: Store, config: &ProbeConfig, username: &str, json: bool) -> Result<i32> {
    let client = probe::build_client(config)?;
    let engine = ProbeEngine::new(client, store.clone(), config);
    let finder = Finder::new(store, engine);

    let lookup = match finder.lookup(username).await {
        Ok(lookup) => lookup,
        Err(e) if e.is_fatal_probe() => {
            return Err(anyhow::Error::new(e).context(format!(
                "search for '{}' aborted; sites found before the failure were kept",
                username
            )));
        }
        Err(e) => return Err(e.into()),
    };

    print_lookup(&lookup, json)?;

    if lookup.sites.is_empty() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn handle_sites(store: &Store, json: bool) -> Result<i32> {
    let sites = store.all_sites()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&sites)?);
    } else {
        print_table(&sites);
        println!("📋 Total: {}", sites.len());
    }
    Ok(0)
}

fn print_lookup(lookup: &Lookup, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(lookup)?);
        return Ok(());
    }

    if lookup.cached {
        println!("🗂️  '{}' was searched before, showing stored results\n", lookup.username);
    }
    print_table(&lookup.sites);
    println!("📊 '{}' found on {} site(s)", lookup.username, lookup.sites.len());
    Ok(())
}

// Prints sites as a human-readable table in the terminal
fn print_table(sites: &[Site]) {
    println!("{:<30} {:<15} {:<60}", "SITE", "CATEGORY", "URL TEMPLATE");
    println!("{}", "=".repeat(105));

    for site in sites {
        println!(
            "{:<30} {:<15} {:<60}",
            truncate(&site.name, 30),
            truncate(&site.category, 15),
            truncate(&site.uri_check, 60)
        );
    }

    println!();
}

// Shortens a cell to `width` characters, marking the cut with "..."
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
