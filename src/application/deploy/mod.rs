//! Deploy Module
//!
//! Converges one deploy root to a desired release.
//!
//! ## Structure
//!
//! - `result` - `DeployOutcome`
//! - `use_case` - `DeploymentEngine`
//!
//! ## Usage
//!
//! ```ignore
//! use capstan::application::deploy::DeploymentEngine;
//!
//! let mut engine = DeploymentEngine::new(desired, runner, recipes);
//! let outcome = engine.apply()?;
//! ```

mod result;
mod use_case;

pub use result::DeployOutcome;
pub use use_case::DeploymentEngine;

#[cfg(test)]
mod tests;
