//! `capstan releases`

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use capstan::application::release_inventory;
use capstan::infrastructure::ProcessRunner;
use capstan::presentation::output::render_releases;
use capstan::presentation::{load_desired_state, OutputFormat};

pub fn cmd_releases(config: &Path, format: OutputFormat) -> Result<()> {
    let (desired, warnings) = load_desired_state(config, None)
        .with_context(|| format!("failed to load {}", config.display()))?;
    for warning in &warnings {
        warn!("{}", warning);
    }

    let entries = release_inventory(&ProcessRunner::new(), &desired.layout).with_context(|| {
        format!(
            "failed to list releases under {}",
            desired.layout.deploy_to().display()
        )
    })?;
    print!("{}", render_releases(&entries, format));
    Ok(())
}
