//! Release directory enumeration
//!
//! Lists `<deploy_to>/releases/*`. The deploy root is escaped before it is
//! embedded in the pattern, so roots such as `/srv/app[staging]` are matched
//! literally.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::CapstanResult;

/// Escape glob metacharacters in a directory path
pub fn escape_glob_dir(path: &Path) -> String {
    Pattern::escape(&path.to_string_lossy())
}

/// Entries directly under `<deploy_to>/releases`, in lexical order.
///
/// Hidden entries are skipped. A missing `releases/` yields an empty list.
pub fn list_release_dirs(deploy_to: &Path) -> CapstanResult<Vec<PathBuf>> {
    let pattern = format!("{}/releases/*", escape_glob_dir(deploy_to));
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let mut dirs = Vec::new();
    for entry in glob::glob_with(&pattern, options)? {
        dirs.push(entry?);
    }
    Ok(dirs)
}
