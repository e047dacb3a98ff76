//! Deploy definition types
//!
//! The on-disk TOML shape. `into_desired` turns it into the validated
//! `DesiredState` the engine runs against.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::entities::{
    default_create_dirs_before_symlink, default_purge_before_symlink, default_symlinks, Action,
    Callbacks, DesiredState, GitSource, SourceSpec,
};
use crate::domain::value_objects::{Callback, DeployLayout, Ownership, RestartCommand};
use crate::error::{CapstanError, CapstanResult};

use super::loader;

/// Clone depth used for `shallow_clone = true`
pub const SHALLOW_CLONE_DEPTH: u32 = 5;

/// Requested action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionConfig {
    #[default]
    Deploy,
    ForceDeploy,
    Rollback,
}

impl From<ActionConfig> for Action {
    fn from(action: ActionConfig) -> Self {
        match action {
            ActionConfig::Deploy => Action::Deploy,
            ActionConfig::ForceDeploy => Action::ForceDeploy,
            ActionConfig::Rollback => Action::Rollback,
        }
    }
}

/// Callback slot.
///
/// Accepts either a plain string:
///   before_migrate = "bundle exec rake assets:precompile"
///
/// Or a recipe table:
///   before_migrate = { recipe = "deploy/before_migrate.sh" }
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CallbackConfig {
    Command(String),
    Recipe { recipe: PathBuf },
}

impl CallbackConfig {
    fn resolve(self, base_dir: &Path) -> Callback {
        match self {
            CallbackConfig::Command(command) => Callback::Command(command),
            CallbackConfig::Recipe { recipe } => Callback::Recipe(relative_to(base_dir, recipe)),
        }
    }
}

/// Restart command: shell string, argument list, or recipe table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RestartConfig {
    Shell(String),
    Argv(Vec<String>),
    Recipe { recipe: PathBuf },
}

impl RestartConfig {
    fn resolve(self, base_dir: &Path) -> CapstanResult<RestartCommand> {
        match self {
            RestartConfig::Shell(script) => Ok(RestartCommand::Shell(script)),
            RestartConfig::Argv(argv) if argv.is_empty() => Err(CapstanError::InvalidConfig {
                message: "restart_command must not be an empty list".to_string(),
            }),
            RestartConfig::Argv(argv) => Ok(RestartCommand::Argv(argv)),
            RestartConfig::Recipe { recipe } => {
                Ok(RestartCommand::Recipe(relative_to(base_dir, recipe)))
            }
        }
    }
}

/// `[source.git]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitConfig {
    pub repository: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Cached working copy, defaults to `<shared_path>/cached-copy`
    #[serde(default)]
    pub destination: Option<PathBuf>,

    #[serde(default)]
    pub depth: Option<u32>,

    #[serde(default)]
    pub shallow_clone: bool,

    #[serde(default = "default_true")]
    pub enable_checkout: bool,

    #[serde(default = "default_checkout_branch")]
    pub checkout_branch: String,

    #[serde(default)]
    pub enable_submodules: bool,

    #[serde(default)]
    pub additional_remotes: BTreeMap<String, String>,
}

impl GitConfig {
    /// Explicit depth wins over `shallow_clone`
    pub fn effective_depth(&self) -> Option<u32> {
        self.depth
            .or(self.shallow_clone.then_some(SHALLOW_CLONE_DEPTH))
    }
}

/// `[source.directory]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryConfig {
    pub path: PathBuf,
}

/// Where releases come from: exactly one of `git` or `directory`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceConfig {
    Git(GitConfig),
    Directory(DirectoryConfig),
}

/// A deploy definition file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeployConfig {
    /// Resource name used in log lines; defaults to the deploy root's name
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub action: ActionConfig,

    #[serde(default = "default_revision")]
    pub revision: String,

    pub deploy_to: PathBuf,

    #[serde(default)]
    pub shared_path: Option<PathBuf>,

    #[serde(default)]
    pub current_path: Option<PathBuf>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub group: Option<String>,

    #[serde(default = "default_keep_releases")]
    pub keep_releases: usize,

    #[serde(default)]
    pub rollback_on_error: bool,

    #[serde(default)]
    pub migrate: bool,

    #[serde(default)]
    pub restart_command: Option<RestartConfig>,

    #[serde(default)]
    pub before_migrate: Option<CallbackConfig>,

    #[serde(default)]
    pub before_symlink: Option<CallbackConfig>,

    #[serde(default)]
    pub before_restart: Option<CallbackConfig>,

    #[serde(default)]
    pub after_restart: Option<CallbackConfig>,

    #[serde(default)]
    pub symlink_before_migrate: BTreeMap<String, String>,

    #[serde(default = "default_symlinks")]
    pub symlinks: BTreeMap<String, String>,

    #[serde(default = "default_purge_before_symlink")]
    pub purge_before_symlink: Vec<String>,

    #[serde(default = "default_create_dirs_before_symlink")]
    pub create_dirs_before_symlink: Vec<String>,

    pub source: SourceConfig,
}

fn default_true() -> bool {
    true
}

fn default_revision() -> String {
    "HEAD".to_string()
}

fn default_keep_releases() -> usize {
    5
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_checkout_branch() -> String {
    "deploy".to_string()
}

fn relative_to(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

impl DeployConfig {
    /// Load a deploy definition, discarding warnings
    pub fn load(path: &Path) -> CapstanResult<Self> {
        loader::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Validate and apply defaults.
    ///
    /// Relative recipe and source paths resolve against `base_dir`, normally
    /// the directory holding the definition file.
    pub fn into_desired(self, base_dir: &Path) -> CapstanResult<DesiredState> {
        if !self.deploy_to.is_absolute() {
            return Err(CapstanError::InvalidConfig {
                message: format!(
                    "deploy_to must be an absolute path, got '{}'",
                    self.deploy_to.display()
                ),
            });
        }

        let mut layout = DeployLayout::new(&self.deploy_to);
        if let Some(shared) = self.shared_path {
            layout = layout.with_shared_path(relative_to(&self.deploy_to, shared));
        }
        if let Some(current) = self.current_path {
            layout = layout.with_current_path(relative_to(&self.deploy_to, current));
        }

        let source = match self.source {
            SourceConfig::Git(git) => {
                let depth = git.effective_depth();
                let destination = git
                    .destination
                    .map(|dest| relative_to(base_dir, dest))
                    .unwrap_or_else(|| layout.shared("cached-copy"));
                SourceSpec::Git(GitSource {
                    repository: git.repository,
                    remote: git.remote,
                    destination,
                    depth,
                    enable_checkout: git.enable_checkout,
                    checkout_branch: git.checkout_branch,
                    enable_submodules: git.enable_submodules,
                    additional_remotes: git.additional_remotes,
                })
            }
            SourceConfig::Directory(dir) => SourceSpec::Directory(relative_to(base_dir, dir.path)),
        };

        let name = self.name.unwrap_or_else(|| {
            self.deploy_to
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "app".to_string())
        });

        let callback = |slot: Option<CallbackConfig>| {
            slot.map(|c| c.resolve(base_dir)).unwrap_or_default()
        };
        let callbacks = Callbacks {
            before_migrate: callback(self.before_migrate),
            before_symlink: callback(self.before_symlink),
            before_restart: callback(self.before_restart),
            after_restart: callback(self.after_restart),
        };

        let restart_command = match self.restart_command {
            Some(restart) => restart.resolve(base_dir)?,
            None => RestartCommand::None,
        };

        let mut desired = DesiredState::new(name, layout, source);
        desired.action = self.action.into();
        desired.revision = self.revision;
        desired.ownership = Ownership::new(self.user, self.group);
        desired.keep_releases = self.keep_releases;
        desired.rollback_on_error = self.rollback_on_error;
        desired.migrate = self.migrate;
        desired.restart_command = restart_command;
        desired.callbacks = callbacks;
        desired.symlink_before_migrate = self.symlink_before_migrate;
        desired.symlinks = self.symlinks;
        desired.purge_before_symlink = self.purge_before_symlink;
        desired.create_dirs_before_symlink = self.create_dirs_before_symlink;
        Ok(desired)
    }
}
