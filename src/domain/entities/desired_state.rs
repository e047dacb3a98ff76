//! Desired deploy state
//!
//! The validated, fully-defaulted deploy definition the engine converges the
//! host to. Produced by `config::DeployConfig::into_desired`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::value_objects::{Callback, DeployLayout, Hook, Ownership, RestartCommand};

/// Requested resource action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Deploy,
    ForceDeploy,
    Rollback,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Deploy => "deploy",
            Action::ForceDeploy => "force_deploy",
            Action::Rollback => "rollback",
        }
    }
}

/// The four user callback slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Callbacks {
    pub before_migrate: Callback,
    pub before_symlink: Callback,
    pub before_restart: Callback,
    pub after_restart: Callback,
}

impl Callbacks {
    pub fn get(&self, hook: Hook) -> &Callback {
        match hook {
            Hook::BeforeMigrate => &self.before_migrate,
            Hook::BeforeSymlink => &self.before_symlink,
            Hook::BeforeRestart => &self.before_restart,
            Hook::AfterRestart => &self.after_restart,
        }
    }
}

/// Git-backed source settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    pub repository: String,
    pub remote: String,
    /// Local working copy that releases are copied from
    pub destination: PathBuf,
    pub depth: Option<u32>,
    pub enable_checkout: bool,
    pub checkout_branch: String,
    pub enable_submodules: bool,
    pub additional_remotes: BTreeMap<String, String>,
}

impl GitSource {
    pub fn new(repository: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            repository: repository.into(),
            remote: "origin".to_string(),
            destination: destination.into(),
            depth: None,
            enable_checkout: true,
            checkout_branch: "deploy".to_string(),
            enable_submodules: false,
            additional_remotes: BTreeMap::new(),
        }
    }
}

/// Where release contents come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// `deploy_revision`: release id is the resolved commit
    Git(GitSource),
    /// `deploy_directory`: release id is the revision string
    Directory(PathBuf),
}

impl SourceSpec {
    /// Resource type used in log prefixes
    pub fn resource_type(&self) -> &'static str {
        match self {
            SourceSpec::Git(_) => "deploy_revision",
            SourceSpec::Directory(_) => "deploy_directory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    pub name: String,
    pub action: Action,
    pub revision: String,
    pub layout: DeployLayout,
    pub source: SourceSpec,
    pub ownership: Ownership,
    pub keep_releases: usize,
    pub rollback_on_error: bool,
    pub migrate: bool,
    pub restart_command: RestartCommand,
    pub callbacks: Callbacks,
    /// shared-relative source -> release-relative destination, before migration
    pub symlink_before_migrate: BTreeMap<String, String>,
    /// shared-relative source -> release-relative destination, steady state
    pub symlinks: BTreeMap<String, String>,
    pub purge_before_symlink: Vec<String>,
    pub create_dirs_before_symlink: Vec<String>,
}

impl DesiredState {
    /// State with the default deploy settings
    pub fn new(name: impl Into<String>, layout: DeployLayout, source: SourceSpec) -> Self {
        Self {
            name: name.into(),
            action: Action::Deploy,
            revision: "HEAD".to_string(),
            layout,
            source,
            ownership: Ownership::default(),
            keep_releases: 5,
            rollback_on_error: false,
            migrate: false,
            restart_command: RestartCommand::None,
            callbacks: Callbacks::default(),
            symlink_before_migrate: BTreeMap::new(),
            symlinks: default_symlinks(),
            purge_before_symlink: default_purge_before_symlink(),
            create_dirs_before_symlink: default_create_dirs_before_symlink(),
        }
    }

    /// `"<resourceType>[<resourceName>]"`
    pub fn log_prefix(&self) -> String {
        format!("{}[{}]", self.source.resource_type(), self.name)
    }
}

pub fn default_symlinks() -> BTreeMap<String, String> {
    [("system", "public/system"), ("pids", "tmp/pids"), ("log", "log")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn default_purge_before_symlink() -> Vec<String> {
    vec!["log".into(), "tmp/pids".into(), "public/system".into()]
}

pub fn default_create_dirs_before_symlink() -> Vec<String> {
    vec!["tmp".into(), "public".into(), "config".into()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_prefix_uses_source_variant() {
        let layout = DeployLayout::new("/srv/app");
        let git = DesiredState::new(
            "app",
            layout.clone(),
            SourceSpec::Git(GitSource::new("git@example.com:app.git", "/tmp/cache")),
        );
        assert_eq!(git.log_prefix(), "deploy_revision[app]");

        let dir = DesiredState::new("app", layout, SourceSpec::Directory("/build".into()));
        assert_eq!(dir.log_prefix(), "deploy_directory[app]");
    }

    #[test]
    fn defaults_match_resource_definition() {
        let state = DesiredState::new(
            "app",
            DeployLayout::new("/srv/app"),
            SourceSpec::Directory("/build".into()),
        );
        assert_eq!(state.keep_releases, 5);
        assert_eq!(state.revision, "HEAD");
        assert_eq!(state.symlinks.get("log").map(String::as_str), Some("log"));
        assert!(state.purge_before_symlink.contains(&"tmp/pids".to_string()));
        assert!(!state.rollback_on_error);
    }
}
