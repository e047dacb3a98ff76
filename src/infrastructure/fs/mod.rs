//! File System Helpers
//!
//! Release enumeration under a deploy root.

mod releases;

pub use releases::{escape_glob_dir, list_release_dirs};
