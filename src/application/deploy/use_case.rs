//! Deployment Engine
//!
//! Converges a deploy root to the desired release. One `apply` decides,
//! from filesystem state alone, between three paths:
//!
//! 1. `current` already points at the requested release: no-op
//! 2. the release exists but is not live: roll back to it
//! 3. the release does not exist: fresh deploy, guarded by rollback-on-error
//!
//! The fresh-deploy pipeline is strictly ordered and stops at the first
//! failure:
//!
//! ```text
//! verify dirs -> sync/copy -> ownership -> dependencies -> ownership
//!   -> before_migrate -> migrate -> before_symlink -> symlink
//!   -> before_restart -> restart -> after_restart -> cleanup
//! ```
//!
//! The engine is single-use per deploy root and provides no locking; callers
//! must not run two applies against the same root at once.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::application::provision::Provisioner;
use crate::application::registry::ReleaseRegistry;
use crate::application::symlinks::SymlinkManager;
use crate::domain::entities::{Action, DesiredState, Release, SourceSpec};
use crate::domain::ports::{CommandRunner, Invocation, RecipeBindings, RecipeExecutor};
use crate::domain::services::{cleanup_candidates, rollback_candidates};
use crate::domain::value_objects::{Callback, CommitId, Hook, RestartCommand};
use crate::error::{CapstanError, CapstanResult};
use crate::infrastructure::{GitRevisionResolver, WorkingCopySynchronizer};

use super::result::DeployOutcome;

/// Dependency manifest that would require a bundle install step
const DEPENDENCY_MANIFEST: &str = "gems.yml";

pub struct DeploymentEngine<R, X>
where
    R: CommandRunner,
    X: RecipeExecutor,
{
    desired: DesiredState,
    runner: R,
    recipes: X,
    registry: ReleaseRegistry,
    resource: String,
    /// Release being worked on; switches to the previous one during recovery
    release: Option<Release>,
    previous_release: Option<Release>,
    target_commit: Option<CommitId>,
}

impl<R, X> DeploymentEngine<R, X>
where
    R: CommandRunner,
    X: RecipeExecutor,
{
    pub fn new(desired: DesiredState, runner: R, recipes: X) -> Self {
        let registry = ReleaseRegistry::new(desired.layout.deploy_to());
        let resource = desired.log_prefix();
        Self {
            desired,
            runner,
            recipes,
            registry,
            resource,
            release: None,
            previous_release: None,
            target_commit: None,
        }
    }

    pub fn desired(&self) -> &DesiredState {
        &self.desired
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn recipes(&self) -> &X {
        &self.recipes
    }

    /// Release the engine last worked on; the previous one after a recovery
    pub fn release(&self) -> Option<&Release> {
        self.release.as_ref()
    }

    /// The release `current` pointed at before this apply, if it still exists
    pub fn previous_release(&self) -> Option<&Release> {
        self.previous_release.as_ref()
    }

    /// Releases known to this engine, oldest first
    pub fn releases(&mut self) -> CapstanResult<Vec<Release>> {
        Ok(self.registry.all(&self.runner)?.to_vec())
    }

    /// Converge the deploy root to the desired release
    pub fn apply(&mut self) -> CapstanResult<DeployOutcome> {
        self.ensure_action_supported()?;
        self.save_release_state()?;

        let release = self.target_release()?;
        self.release = Some(release.clone());

        if self.registry.contains(&self.runner, &release)? {
            if self.previous_release.as_ref() == Some(&release) {
                debug!(resource = %self.resource, release = %release, "already the latest version");
                return Ok(DeployOutcome::AlreadyCurrent { release });
            }
            let removed = self.rollback_to(&release)?;
            return Ok(DeployOutcome::RolledBack { release, removed });
        }

        let removed = self.with_rollback_on_error(&release)?;
        Ok(DeployOutcome::Deployed {
            release,
            previous: self.previous_release.clone(),
            removed,
        })
    }

    fn ensure_action_supported(&self) -> CapstanResult<()> {
        match self.desired.action {
            Action::Deploy => Ok(()),
            other => Err(CapstanError::unsupported(format!(
                "action '{}' (only the deployed state is supported)",
                other.as_str()
            ))),
        }
    }

    /// Remember what `current` points at, ignoring dangling links
    fn save_release_state(&mut self) -> CapstanResult<()> {
        let current = self.desired.layout.current_path();
        let metadata = match std::fs::symlink_metadata(current) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if !metadata.file_type().is_symlink() {
            return Err(CapstanError::InvalidConfig {
                message: format!(
                    "{} exists but is not a symlink; move it aside before deploying",
                    current.display()
                ),
            });
        }
        let target = std::fs::read_link(current)?;
        let target = match current.parent() {
            Some(parent) if target.is_relative() => parent.join(target),
            _ => target,
        };
        if target.exists() {
            debug!(resource = %self.resource, previous = %target.display(), "found live release");
            self.previous_release = Some(Release::new(target));
        }
        Ok(())
    }

    /// Release directory for the requested revision
    fn target_release(&mut self) -> CapstanResult<Release> {
        let id = match &self.desired.source {
            SourceSpec::Git(git) => {
                let commit = GitRevisionResolver::new(&self.runner)
                    .resolve(&self.desired.revision, &git.repository)?;
                let id = commit.as_str().to_string();
                self.target_commit = Some(commit);
                id
            }
            SourceSpec::Directory(_) => validate_release_id(&self.desired.revision)?,
        };
        Ok(self.desired.layout.release(&id))
    }

    fn rollback_to(&mut self, target: &Release) -> CapstanResult<Vec<Release>> {
        self.release = Some(target.clone());

        let releases = self.registry.all(&self.runner)?;
        let index = releases.iter().position(|r| r == target).unwrap_or(0);
        let doomed = rollback_candidates(releases, index, self.desired.keep_releases).to_vec();

        self.rollback(target)?;

        for release in &doomed {
            info!(resource = %self.resource, release = %release, "removing release");
            self.registry.retire(&self.runner, release)?;
        }
        Ok(doomed)
    }

    fn rollback(&self, release: &Release) -> CapstanResult<()> {
        info!(resource = %self.resource, release = %release, "rolling back to previous release");
        self.symlink(release)?;
        info!(resource = %self.resource, "restarting with previous release");
        self.restart(release)
    }

    /// Fresh deploy; on failure optionally restore the previous release.
    ///
    /// The deploy error is always returned, whether or not recovery worked.
    fn with_rollback_on_error(&mut self, release: &Release) -> CapstanResult<Vec<Release>> {
        match self.deploy(release) {
            Ok(removed) => Ok(removed),
            Err(err) => {
                if self.desired.rollback_on_error {
                    self.recover_from_failed_deploy(release, &err);
                }
                Err(err)
            }
        }
    }

    fn recover_from_failed_deploy(&mut self, failed: &Release, err: &CapstanError) {
        warn!(resource = %self.resource, release = %failed, error = %err, "error on deploying release");

        if let Some(previous) = self.previous_release.clone() {
            self.release = Some(previous.clone());
            if let Err(rollback_err) = self.rollback(&previous) {
                warn!(
                    resource = %self.resource,
                    release = %previous,
                    error = %rollback_err,
                    "rollback to previous release failed"
                );
            }
        }

        info!(resource = %self.resource, release = %failed, "removing failed deploy");
        if let Err(cleanup_err) = self.registry.retire(&self.runner, failed) {
            warn!(
                resource = %self.resource,
                release = %failed,
                error = %cleanup_err,
                "could not remove failed deploy"
            );
        }
    }

    fn deploy(&mut self, release: &Release) -> CapstanResult<Vec<Release>> {
        self.verify_directories_exist()?;
        self.update_cached_repo()?;
        self.copy_source(release)?;
        self.enforce_ownership()?;
        self.install_dependencies(release)?;
        self.enforce_ownership()?;
        self.callback(Hook::BeforeMigrate, release)?;
        self.migrate(release)?;
        self.callback(Hook::BeforeSymlink, release)?;
        self.symlink(release)?;
        self.callback(Hook::BeforeRestart, release)?;
        self.restart(release)?;
        self.callback(Hook::AfterRestart, release)?;
        let removed = self.cleanup(release)?;
        info!(
            resource = %self.resource,
            deploy_to = %self.desired.layout.deploy_to().display(),
            release = %release,
            "deployed"
        );
        Ok(removed)
    }

    fn provisioner(&self) -> Provisioner<'_, R> {
        Provisioner::new(&self.runner, &self.desired.ownership, &self.resource)
    }

    fn symlinks(&self) -> SymlinkManager<'_, R> {
        SymlinkManager::new(&self.runner, &self.desired, &self.resource)
    }

    fn verify_directories_exist(&self) -> CapstanResult<()> {
        let provisioner = self.provisioner();
        provisioner.create_dir_unless_exists(self.desired.layout.deploy_to())?;
        provisioner.create_dir_unless_exists(self.desired.layout.shared_path())?;
        Ok(())
    }

    fn enforce_ownership(&self) -> CapstanResult<()> {
        self.provisioner()
            .enforce_ownership(self.desired.layout.deploy_to())
    }

    /// Bring the cached working copy to the target commit (git source only)
    fn update_cached_repo(&self) -> CapstanResult<()> {
        let SourceSpec::Git(git) = &self.desired.source else {
            return Ok(());
        };
        let Some(commit) = &self.target_commit else {
            return Err(CapstanError::InvalidConfig {
                message: "git revision was not resolved before syncing".to_string(),
            });
        };
        let action = WorkingCopySynchronizer::new(&self.runner, git, &self.resource).sync(commit)?;
        debug!(resource = %self.resource, action = ?action, "working copy synchronized");
        Ok(())
    }

    /// Materialize the release directory, replacing any stale partial copy
    fn copy_source(&self, release: &Release) -> CapstanResult<()> {
        if release.path().exists() {
            self.runner
                .run(&Invocation::new("rm").arg("-rf").path_arg(release.path()))?;
        }
        self.runner.run(
            &Invocation::new("mkdir")
                .arg("-p")
                .path_arg(&self.desired.layout.releases_dir()),
        )?;

        let source: PathBuf = match &self.desired.source {
            SourceSpec::Git(git) => git.destination.join("."),
            SourceSpec::Directory(dir) => dir.clone(),
        };
        self.runner.run(
            &Invocation::new("cp")
                .arg("-rp")
                .path_arg(&source)
                .path_arg(release.path()),
        )?;
        info!(
            resource = %self.resource,
            source = %source.display(),
            release = %release,
            "copied the source into the release"
        );
        Ok(())
    }

    fn install_dependencies(&self, release: &Release) -> CapstanResult<()> {
        if release.path().join(DEPENDENCY_MANIFEST).exists() {
            return Err(CapstanError::unsupported(format!(
                "dependency manifest {}",
                DEPENDENCY_MANIFEST
            )));
        }
        Ok(())
    }

    fn migrate(&self, release: &Release) -> CapstanResult<()> {
        self.symlinks().link_before_migrate(release)?;
        if self.desired.migrate {
            self.enforce_ownership()?;
            return Err(CapstanError::unsupported("migrations"));
        }
        Ok(())
    }

    fn symlink(&self, release: &Release) -> CapstanResult<()> {
        self.symlinks().symlink(release)?;
        info!(resource = %self.resource, release = %release, "updated symlinks");
        Ok(())
    }

    fn callback(&self, hook: Hook, release: &Release) -> CapstanResult<()> {
        match self.desired.callbacks.get(hook) {
            Callback::None => Ok(()),
            Callback::Recipe(recipe) => {
                info!(resource = %self.resource, callback = %hook, "running callback");
                self.run_recipe(recipe, release)
            }
            Callback::Command(_) => Err(CapstanError::unsupported(format!(
                "string command in {} callback",
                hook
            ))),
        }
    }

    fn restart(&self, release: &Release) -> CapstanResult<()> {
        let current = self.desired.layout.current_path();
        match &self.desired.restart_command {
            RestartCommand::None => Ok(()),
            RestartCommand::Recipe(recipe) => {
                info!(resource = %self.resource, "restarting app with embedded recipe");
                self.run_recipe(recipe, release)
            }
            RestartCommand::Shell(script) => {
                info!(resource = %self.resource, command = %script, "restarting app");
                self.runner
                    .run(&Invocation::shell(script.as_str()).current_dir(current))?;
                Ok(())
            }
            RestartCommand::Argv(argv) => {
                let invocation =
                    Invocation::argv(argv.iter().cloned()).ok_or_else(|| CapstanError::InvalidConfig {
                        message: "restart_command must not be an empty list".to_string(),
                    })?;
                info!(resource = %self.resource, command = %invocation, "restarting app");
                self.runner.run(&invocation.current_dir(current))?;
                Ok(())
            }
        }
    }

    fn run_recipe(&self, recipe: &Path, release: &Release) -> CapstanResult<()> {
        let bindings = RecipeBindings {
            release_path: release.path().to_path_buf(),
            deploy_to: self.desired.layout.deploy_to().to_path_buf(),
            shared_path: self.desired.layout.shared_path().to_path_buf(),
        };
        self.recipes.execute(recipe, &bindings)
    }

    /// Mark `release` newest and delete what falls outside the retention window
    fn cleanup(&mut self, release: &Release) -> CapstanResult<Vec<Release>> {
        self.registry.created(&self.runner, release)?;

        let releases = self.registry.all(&self.runner)?;
        let doomed = cleanup_candidates(releases, self.desired.keep_releases).to_vec();
        for old in &doomed {
            info!(resource = %self.resource, release = %old, "removing old release");
            self.registry.retire(&self.runner, old)?;
        }
        Ok(doomed)
    }
}

/// Directory-source release ids become a single path component
fn validate_release_id(revision: &str) -> CapstanResult<String> {
    let id = revision.trim();
    // dot-prefixed names are invisible to the release glob
    if id.is_empty() || id.starts_with('.') || id.contains('/') {
        return Err(CapstanError::InvalidConfig {
            message: format!("revision '{}' cannot be used as a release directory name", revision),
        });
    }
    Ok(id.to_string())
}
