// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Global flags configure the database, the probe engine and logging. Each
// one can also be set through an environment variable (e.g. WMN_DB), which
// is handy when the tool runs from cron or a container.
//
// Subcommands:
// - ingest: load the site catalog (run once before the first lookup)
// - lookup: find which sites host an account for a username
// - sites: list the catalog as stored
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::DEFAULT_SOURCE;

#[derive(Parser, Debug)]
#[command(
    name = "wmn-finder",
    version,
    about = "Find which sites in the WhatsMyName catalog host a username",
    long_about = "wmn-finder checks a username against every site in the WhatsMyName catalog \
                  with one HEAD request per site, and remembers the results so repeat \
                  lookups are answered without probing again."
)]
pub struct Cli {
    /// SQLite database file (use ":memory:" for a throwaway database)
    #[arg(long, global = true, default_value = "wmn-finder.db", env = "WMN_DB")]
    pub db: PathBuf,

    /// Maximum number of sites probed at the same time
    #[arg(
        long,
        global = true,
        default_value_t = 50,
        env = "WMN_CONCURRENCY",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub concurrency: u32,

    /// Per-site request timeout in seconds
    #[arg(
        long,
        global = true,
        default_value_t = 10,
        env = "WMN_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Also write logs to this file
    #[arg(long, global = true, env = "WMN_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and load the site catalog
    ///
    /// Example: wmn-finder ingest --file wmn-data.json
    Ingest {
        /// URL of the WhatsMyName JSON document
        #[arg(long, default_value = DEFAULT_SOURCE, conflicts_with = "file")]
        source: String,

        /// Read the catalog from a local file instead of downloading it
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Look up which sites host an account for a username
    ///
    /// Example: wmn-finder lookup neo --json
    Lookup {
        /// The username to look for (case-sensitive)
        username: String,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the stored site catalog
    Sites {
        /// Output the catalog in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}
