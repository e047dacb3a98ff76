//! Domain Services
//!
//! Stateless computations used by the deployment engine.

pub mod ref_resolution;
pub mod retention;

pub use ref_resolution::{parse_ls_remote, resolution_rules, select_ref, RefRule, RemoteRef};
pub use retention::{cleanup_candidates, rollback_candidates};
