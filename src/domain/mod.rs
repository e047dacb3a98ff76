//! Domain Layer
//!
//! Pure release-deployment logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Releases and the desired deploy state
//! - `value_objects/` - Revisions, callbacks, ownership, directory layout
//! - `services/` - Ref resolution rules and retention arithmetic
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or spawns processes
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All commands go through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
