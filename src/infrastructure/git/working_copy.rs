//! Cached working copy
//!
//! The working copy under `destination` is a disposable cache that releases
//! are copied from. It is cloned once, then moved between revisions with
//! fetch + `reset --hard`; it is never merged into.

use std::path::Path;

use tracing::{debug, info};

use crate::domain::entities::GitSource;
use crate::domain::ports::{CommandOutput, CommandRunner, Invocation};
use crate::domain::value_objects::CommitId;
use crate::error::{CapstanError, CapstanResult};

/// What `sync` had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Fresh clone
    Cloned,
    /// Existing clone fetched and reset to the target
    Updated,
    /// Existing clone already at the target
    UpToDate,
    /// Destination is a non-empty directory without `.git`; left alone
    Skipped,
}

pub struct WorkingCopySynchronizer<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    source: &'a GitSource,
    resource: &'a str,
}

impl<'a, R: CommandRunner + ?Sized> WorkingCopySynchronizer<'a, R> {
    pub fn new(runner: &'a R, source: &'a GitSource, resource: &'a str) -> Self {
        Self {
            runner,
            source,
            resource,
        }
    }

    /// Bring the working copy to `target`, cloning it if needed
    pub fn sync(&self, target: &CommitId) -> CapstanResult<SyncAction> {
        if !self.existing_git_clone() {
            return self.checkout(target);
        }

        let current = self.current_revision()?;
        debug!(
            resource = self.resource,
            current = current.as_ref().map(CommitId::as_str).unwrap_or("none"),
            target = %target,
            "comparing working copy revision"
        );

        let action = if current.as_ref() == Some(target) {
            SyncAction::UpToDate
        } else {
            self.fetch_updates(target)?;
            self.enable_submodules()?;
            info!(resource = self.resource, revision = %target, "updated working copy");
            SyncAction::Updated
        };
        self.add_remotes()?;
        Ok(action)
    }

    /// Clone into an absent or empty destination
    pub fn checkout(&self, target: &CommitId) -> CapstanResult<SyncAction> {
        if !self.destination_absent_or_empty()? {
            debug!(
                resource = self.resource,
                destination = %self.source.destination.display(),
                "checkout destination already exists or is a non-empty directory"
            );
            return Ok(SyncAction::Skipped);
        }

        self.clone_repository()?;
        if self.source.enable_checkout {
            self.checkout_branch(target)?;
        }
        self.enable_submodules()?;
        self.add_remotes()?;
        Ok(SyncAction::Cloned)
    }

    fn destination(&self) -> &Path {
        &self.source.destination
    }

    fn existing_git_clone(&self) -> bool {
        self.destination().join(".git").exists()
    }

    fn destination_absent_or_empty(&self) -> CapstanResult<bool> {
        let destination = self.destination();
        if !destination.exists() {
            return Ok(true);
        }
        Ok(std::fs::read_dir(destination)?.next().is_none())
    }

    fn git(&self) -> Invocation {
        Invocation::new("git")
    }

    fn git_in_destination(&self) -> Invocation {
        self.git().arg("-C").path_arg(self.destination())
    }

    fn clone_repository(&self) -> CapstanResult<()> {
        info!(
            resource = self.resource,
            repository = %self.source.repository,
            destination = %self.source.destination.display(),
            "cloning repository"
        );
        let mut clone = self.git().arg("clone");
        if let Some(depth) = self.source.depth {
            clone = clone
                .arg("--depth")
                .arg(depth.to_string())
                .arg("--no-single-branch");
        }
        clone = clone
            .arg(self.source.repository.as_str())
            .path_arg(self.destination());
        self.runner.run(&clone)?;
        Ok(())
    }

    /// Check out into a local branch rather than a detached HEAD
    fn checkout_branch(&self, target: &CommitId) -> CapstanResult<()> {
        let branch = self.source.checkout_branch.as_str();
        self.runner.run(
            &self
                .git_in_destination()
                .args(["branch", "-f", branch, target.as_str()]),
        )?;
        self.runner
            .run(&self.git_in_destination().args(["checkout", branch]))?;
        info!(
            resource = self.resource,
            branch,
            reference = %target,
            "checked out branch"
        );
        Ok(())
    }

    fn enable_submodules(&self) -> CapstanResult<()> {
        if !self.source.enable_submodules {
            return Ok(());
        }
        info!(resource = self.resource, "synchronizing git submodules");
        self.runner
            .run(&self.git_in_destination().args(["submodule", "sync"]))?;
        info!(resource = self.resource, "enabling git submodules");
        self.runner.run(
            &self
                .git_in_destination()
                .args(["submodule", "update", "--init", "--recursive"]),
        )?;
        Ok(())
    }

    fn fetch_updates(&self, target: &CommitId) -> CapstanResult<()> {
        let remote = self.source.remote.as_str();
        self.setup_remote_tracking_branches(remote, &self.source.repository)?;
        debug!(
            resource = self.resource,
            remote,
            revision = %target,
            "fetching updates and resetting"
        );
        self.runner
            .run(&self.git_in_destination().args(["fetch", remote]))?;
        self.runner
            .run(&self.git_in_destination().args(["fetch", remote, "--tags"]))?;
        self.runner.run(
            &self
                .git_in_destination()
                .args(["reset", "--hard", target.as_str()]),
        )?;
        Ok(())
    }

    fn add_remotes(&self) -> CapstanResult<()> {
        for (name, url) in &self.source.additional_remotes {
            info!(resource = self.resource, remote = %name, url = %url, "adding git remote");
            self.setup_remote_tracking_branches(name, url)?;
        }
        Ok(())
    }

    /// Make `remote.<name>.url` exactly `url`.
    ///
    /// `git config --get` exits 0 when the key holds one value, 1 when it is
    /// missing and 2 when it holds several.
    fn setup_remote_tracking_branches(&self, name: &str, url: &str) -> CapstanResult<()> {
        debug!(
            resource = self.resource,
            remote = name,
            url,
            "configuring remote tracking branches"
        );
        let key = format!("remote.{}.url", name);
        let check = self
            .git_in_destination()
            .args(["config", "--get", key.as_str()]);
        let status = self.runner.execute(&check)?;
        match status.status {
            Some(0) | Some(2) => {
                if multiple_urls(&status) || status.stdout.trim() != url {
                    self.runner.run(
                        &self
                            .git_in_destination()
                            .args(["config", "--replace-all", key.as_str(), url]),
                    )?;
                }
                Ok(())
            }
            Some(1) => {
                self.runner
                    .run(&self.git_in_destination().args(["remote", "add", name, url]))?;
                Ok(())
            }
            other => Err(CapstanError::CommandFailed {
                command: check.to_string(),
                status: other,
                stderr: status.stderr,
            }),
        }
    }

    fn current_revision(&self) -> CapstanResult<Option<CommitId>> {
        let output = self
            .runner
            .execute(&self.git_in_destination().args(["rev-parse", "HEAD"]))?;
        if !output.success() {
            return Ok(None);
        }
        let sha = output.stdout.trim();
        Ok((!sha.is_empty()).then(|| CommitId::new(sha)))
    }
}

fn multiple_urls(output: &CommandOutput) -> bool {
    output.status == Some(2)
}
