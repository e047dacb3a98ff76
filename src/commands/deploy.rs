//! `capstan deploy`

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use capstan::presentation::output::render_outcome;
use capstan::presentation::{create_deployment_engine, load_desired_state, OutputFormat};

pub fn cmd_deploy(config: &Path, revision: Option<&str>, format: OutputFormat) -> Result<()> {
    let (desired, warnings) = load_desired_state(config, revision)
        .with_context(|| format!("failed to load {}", config.display()))?;
    for warning in &warnings {
        warn!("{}", warning);
    }

    info!(
        resource = %desired.log_prefix(),
        revision = %desired.revision,
        deploy_to = %desired.layout.deploy_to().display(),
        "starting deploy"
    );
    let mut engine = create_deployment_engine(desired);
    let outcome = engine
        .apply()
        .with_context(|| format!("deploy of {} failed", engine.desired().log_prefix()))?;

    print!("{}", render_outcome(&outcome, format));
    Ok(())
}
