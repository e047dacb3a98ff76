//! Deploy definition configuration
//!
//! Precedence, highest first:
//! 1. CLI flags (`--revision`)
//! 2. Environment variables (CAPSTAN_*)
//! 3. The deploy definition file (`deploy.toml`)
//! 4. Built-in defaults

mod loader;
mod types;

pub use loader::{
    apply_overrides, load_with_warnings, parse_with_warnings, with_env_overrides, ConfigWarning,
};
pub use types::{
    ActionConfig, CallbackConfig, DeployConfig, DirectoryConfig, GitConfig, RestartConfig,
    SourceConfig, SHALLOW_CLONE_DEPTH,
};

/// Default deploy definition file name
pub const DEFAULT_CONFIG_FILE: &str = "deploy.toml";
