//! Capstan CLI - release deployment with atomic symlink switching
//!
//! Usage: capstan <COMMAND>
//!
//! Commands:
//!   deploy    Deploy (or roll back to) the configured revision
//!   releases  List releases on disk
//!   resolve   Resolve a revision against a remote repository

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use capstan::presentation::cli::{log_directive, Cli, Commands};
use capstan::presentation::OutputFormat;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let format = OutputFormat::from_json_flag(cli.json);
    match cli.command {
        Commands::Deploy { config, revision } => {
            commands::deploy::cmd_deploy(&config, revision.as_deref(), format)
        }
        Commands::Releases { config } => commands::releases::cmd_releases(&config, format),
        Commands::Resolve {
            repository,
            revision,
        } => commands::resolve::cmd_resolve(&repository, &revision, format),
    }
}

/// Log to stderr so `--json` output on stdout stays parseable
fn init_tracing(verbose: u8) -> Result<()> {
    let filter = if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("").add_directive(log_directive(verbose).parse()?)
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
