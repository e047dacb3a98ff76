//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `cli` - Command-line definition
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Output rendering
//!
//! ## Usage
//!
//! ```ignore
//! use capstan::presentation::factory;
//!
//! let (desired, _warnings) = factory::load_desired_state(path, None)?;
//! let mut engine = factory::create_deployment_engine(desired);
//! let outcome = engine.apply()?;
//! ```

pub mod cli;
pub mod factory;
pub mod output;

pub use factory::{create_deployment_engine, load_desired_state};
pub use output::OutputFormat;
