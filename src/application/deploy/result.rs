//! Deploy Outcome
//!
//! What one `apply` did to the deploy root.

use crate::domain::entities::Release;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// `current` already pointed at the requested release; nothing changed
    AlreadyCurrent { release: Release },
    /// The requested release already existed and `current` was moved back to it
    RolledBack {
        release: Release,
        removed: Vec<Release>,
    },
    /// A new release was materialized and promoted
    Deployed {
        release: Release,
        previous: Option<Release>,
        removed: Vec<Release>,
    },
}

impl DeployOutcome {
    pub fn release(&self) -> &Release {
        match self {
            DeployOutcome::AlreadyCurrent { release }
            | DeployOutcome::RolledBack { release, .. }
            | DeployOutcome::Deployed { release, .. } => release,
        }
    }

    /// Releases deleted by retention or rollback
    pub fn removed(&self) -> &[Release] {
        match self {
            DeployOutcome::AlreadyCurrent { .. } => &[],
            DeployOutcome::RolledBack { removed, .. } | DeployOutcome::Deployed { removed, .. } => {
                removed
            }
        }
    }

    pub fn has_changes(&self) -> bool {
        !matches!(self, DeployOutcome::AlreadyCurrent { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DeployOutcome::AlreadyCurrent { .. } => "already_current",
            DeployOutcome::RolledBack { .. } => "rolled_back",
            DeployOutcome::Deployed { .. } => "deployed",
        }
    }
}
