//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::{Path, PathBuf};

use crate::application::DeploymentEngine;
use crate::config::{load_with_warnings, with_env_overrides, ConfigWarning};
use crate::domain::entities::DesiredState;
use crate::error::CapstanResult;
use crate::infrastructure::{ProcessRunner, ScriptRecipeExecutor};

/// Type alias for the concrete DeploymentEngine with all dependencies
pub type ConcreteDeploymentEngine =
    DeploymentEngine<ProcessRunner, ScriptRecipeExecutor<ProcessRunner>>;

/// Create a deployment engine backed by real processes
pub fn create_deployment_engine(desired: DesiredState) -> ConcreteDeploymentEngine {
    let runner = ProcessRunner::new();
    let recipes = ScriptRecipeExecutor::new(ProcessRunner::new());
    DeploymentEngine::new(desired, runner, recipes)
}

/// Load a definition file with env overrides, then an optional CLI revision.
///
/// Relative paths inside the file resolve against the file's directory.
pub fn load_desired_state(
    path: &Path,
    revision: Option<&str>,
) -> CapstanResult<(DesiredState, Vec<ConfigWarning>)> {
    let (config, warnings) = load_with_warnings(path)?;
    let mut config = with_env_overrides(config)?;
    if let Some(revision) = revision {
        config.revision = revision.to_string();
    }

    let base_dir = definition_dir(path, &std::env::current_dir()?);
    let desired = config.into_desired(&base_dir)?;
    Ok((desired, warnings))
}

/// Absolute directory holding the definition file.
///
/// Recipes run inside the release directory, so every configured path must be
/// absolute before it reaches them.
fn definition_dir(path: &Path, cwd: &Path) -> PathBuf {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => cwd.join(parent),
        None => cwd.to_path_buf(),
    }
}
