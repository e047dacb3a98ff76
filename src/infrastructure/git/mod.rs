//! Git integration
//!
//! - `resolver` - revision specifier to commit via `git ls-remote`
//! - `working_copy` - clone/fetch/reset of the cached checkout

mod resolver;
mod working_copy;

pub use resolver::GitRevisionResolver;
pub use working_copy::{SyncAction, WorkingCopySynchronizer};
