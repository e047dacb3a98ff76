//! Domain Entities
//!
//! - `Release` - A materialized copy of the application under `releases/`
//! - `DesiredState` - The validated deploy definition the engine converges to

mod desired_state;
mod release;

pub use desired_state::{
    default_create_dirs_before_symlink, default_purge_before_symlink, default_symlinks, Action,
    Callbacks, DesiredState, GitSource, SourceSpec,
};
pub use release::Release;
