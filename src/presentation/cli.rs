//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--json, --verbose) are inherited by all subcommands
//! - `--revision` beats `CAPSTAN_REVISION`, which beats the definition file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

/// Capstan - release deployment with atomic symlink switching and rollback
#[derive(Parser, Debug)]
#[command(name = "capstan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy the configured revision (or roll back to it if already on disk)
    Deploy {
        /// Path to the deploy definition
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Revision to deploy (branch, tag, HEAD, or full SHA)
        #[arg(short, long)]
        revision: Option<String>,
    },

    /// List releases on disk, oldest first
    Releases {
        /// Path to the deploy definition
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },

    /// Resolve a revision against a remote repository
    Resolve {
        /// Repository URL or path
        repository: String,

        /// Revision to resolve
        #[arg(default_value = "HEAD")]
        revision: String,
    },
}

/// Default tracing filter for a `-v` count
pub fn log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "capstan=info",
        1 => "capstan=debug",
        _ => "capstan=trace",
    }
}
