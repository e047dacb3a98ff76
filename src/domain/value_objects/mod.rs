//! Domain Value Objects
//!
//! Immutable value types that represent deployment concepts.

mod callback;
mod layout;
mod ownership;
mod revision;

pub use callback::{Callback, Hook, RestartCommand};
pub use layout::DeployLayout;
pub use ownership::Ownership;
pub use revision::{CommitId, RevisionSpec};
