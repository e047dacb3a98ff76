//! Deploy Root Layout
//!
//! ```text
//! <deploy_to>/
//!   releases/<id>/   one directory per release
//!   shared/          persistent across releases
//!   current -> releases/<id>
//! ```

use std::path::{Path, PathBuf};

use crate::domain::entities::Release;

/// Resolved paths of one deploy root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployLayout {
    deploy_to: PathBuf,
    shared_path: PathBuf,
    current_path: PathBuf,
}

impl DeployLayout {
    /// Layout with the conventional `shared/` and `current` locations
    pub fn new(deploy_to: impl Into<PathBuf>) -> Self {
        let deploy_to = deploy_to.into();
        Self {
            shared_path: deploy_to.join("shared"),
            current_path: deploy_to.join("current"),
            deploy_to,
        }
    }

    pub fn with_shared_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.shared_path = path.into();
        self
    }

    pub fn with_current_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.current_path = path.into();
        self
    }

    pub fn deploy_to(&self) -> &Path {
        &self.deploy_to
    }

    pub fn shared_path(&self) -> &Path {
        &self.shared_path
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn releases_dir(&self) -> PathBuf {
        self.deploy_to.join("releases")
    }

    /// The release whose directory name is `id`
    pub fn release(&self, id: &str) -> Release {
        Release::new(self.releases_dir().join(id))
    }

    /// Path of a shared entry (symlink source)
    pub fn shared(&self, relative: &str) -> PathBuf {
        self.shared_path.join(relative)
    }
}
