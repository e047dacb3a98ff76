//! Capstan - capistrano-style release deployment
//!
//! Materializes releases under `<deploy_to>/releases/<id>`, swings the
//! `current` symlink to the live one, runs lifecycle callbacks, and retires
//! old releases while keeping a bounded history for rollback.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployOutcome, DeploymentEngine, ReleaseRegistry};
pub use config::DeployConfig;
pub use domain::entities::{DesiredState, Release};
pub use error::{CapstanError, CapstanResult};
