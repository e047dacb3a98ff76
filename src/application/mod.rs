//! Application Layer
//!
//! Use cases that orchestrate the release lifecycle.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeploymentEngine` - Converges a deploy root (deploy, roll back, or no-op)
//!
//! ## Services
//!
//! - `ReleaseRegistry` - Ordered view of the releases on disk
//! - `SymlinkManager` - Shared links and the `current` swing
//! - `Provisioner` - Directory creation and ownership
//! - `release_inventory` - Read-only listing for reports

pub mod deploy;
pub mod inventory;
pub mod provision;
pub mod registry;
pub mod symlinks;

pub use deploy::{DeployOutcome, DeploymentEngine};
pub use inventory::{release_inventory, ReleaseEntry};
pub use provision::Provisioner;
pub use registry::{modification_time, ReleaseRegistry};
pub use symlinks::SymlinkManager;
