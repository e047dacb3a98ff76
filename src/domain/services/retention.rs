//! Release retention
//!
//! The live release never counts toward the retention window and is never
//! selected for removal; `keep_releases` is the number of non-live releases
//! that survive.

use crate::domain::entities::Release;

/// Releases to remove after a fresh deploy.
///
/// `releases` is oldest first with the just-deployed release last.
pub fn cleanup_candidates(releases: &[Release], keep_releases: usize) -> &[Release] {
    let end = releases
        .len()
        .saturating_sub(1)
        .saturating_sub(keep_releases);
    &releases[..end]
}

/// Releases to remove when rolling back to `releases[target]`.
///
/// Everything newer than the target goes, except the newest `keep_releases`.
pub fn rollback_candidates(releases: &[Release], target: usize, keep_releases: usize) -> &[Release] {
    let start = target.saturating_add(1).min(releases.len());
    let end = releases.len().saturating_sub(keep_releases);
    if start >= end {
        return &[];
    }
    &releases[start..end]
}
