//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod command_runner;
pub mod recipe_executor;

pub use command_runner::{CommandOutput, CommandRunner, Invocation};
pub use recipe_executor::{RecipeBindings, RecipeExecutor};
