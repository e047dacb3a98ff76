//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `process` - `CommandRunner` backed by `std::process`
//! - `recipe` - `RecipeExecutor` that runs hook scripts
//! - `fs/` - Release directory enumeration
//! - `git/` - Remote ref resolution and the cached working copy

pub mod fs;
pub mod git;
pub mod process;
pub mod recipe;

// Re-export for convenience
pub use git::{GitRevisionResolver, SyncAction, WorkingCopySynchronizer};
pub use process::{ProcessRunner, RecordingRunner};
pub use recipe::ScriptRecipeExecutor;
