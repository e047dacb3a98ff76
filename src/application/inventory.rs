//! Release inventory
//!
//! Read-only view of a deploy root for reporting: every release with its
//! modification time and whether `current` points at it.

use std::fs;

use crate::domain::entities::Release;
use crate::domain::ports::CommandRunner;
use crate::domain::value_objects::DeployLayout;
use crate::error::CapstanResult;

use super::registry::{modification_time, ReleaseRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEntry {
    pub release: Release,
    /// Seconds since the epoch
    pub modified: i64,
    pub current: bool,
}

/// Releases oldest first, with the live one marked
pub fn release_inventory<R: CommandRunner + ?Sized>(
    runner: &R,
    layout: &DeployLayout,
) -> CapstanResult<Vec<ReleaseEntry>> {
    let live = fs::read_link(layout.current_path()).ok().map(|target| {
        match layout.current_path().parent() {
            Some(parent) if target.is_relative() => parent.join(target),
            _ => target,
        }
    });

    let mut registry = ReleaseRegistry::new(layout.deploy_to());
    let mut entries = Vec::new();
    for release in registry.all(runner)? {
        entries.push(ReleaseEntry {
            modified: modification_time(runner, release.path())?,
            current: live.as_deref() == Some(release.path()),
            release: release.clone(),
        });
    }
    Ok(entries)
}
