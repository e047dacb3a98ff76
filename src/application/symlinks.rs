//! Symlink Manager
//!
//! Wires shared directories into a release and swings `current` to it.
//!
//! The full step run during a deploy is:
//! purge -> create dirs + link shared -> pre-migrate links -> ownership -> promote

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::application::provision::Provisioner;
use crate::domain::entities::{DesiredState, Release};
use crate::domain::ports::{CommandRunner, Invocation};
use crate::error::CapstanResult;

pub struct SymlinkManager<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    desired: &'a DesiredState,
    resource: &'a str,
}

impl<'a, R: CommandRunner + ?Sized> SymlinkManager<'a, R> {
    pub fn new(runner: &'a R, desired: &'a DesiredState, resource: &'a str) -> Self {
        Self {
            runner,
            desired,
            resource,
        }
    }

    fn provisioner(&self) -> Provisioner<'a, R> {
        Provisioner::new(self.runner, &self.desired.ownership, self.resource)
    }

    /// Remove release paths that are provided from `shared/` instead
    pub fn purge_before_symlink(&self, release: &Release) -> CapstanResult<()> {
        if self.desired.purge_before_symlink.is_empty() {
            return Ok(());
        }
        info!(
            resource = self.resource,
            dirs = %self.desired.purge_before_symlink.join(", "),
            "purging directories in checkout"
        );
        for dir in &self.desired.purge_before_symlink {
            self.runner
                .run(&Invocation::new("rm").arg("-rf").path_arg(&release.path().join(dir)))?;
        }
        Ok(())
    }

    /// Create the configured parent directories, then link each shared entry
    pub fn link_shared_into_release(
        &self,
        release: &Release,
        links: &BTreeMap<String, String>,
    ) -> CapstanResult<()> {
        let provisioner = self.provisioner();
        for dir in &self.desired.create_dirs_before_symlink {
            provisioner.create_dir_unless_exists(&release.path().join(dir))?;
        }
        self.link(release, links)?;
        if !links.is_empty() {
            info!(
                resource = self.resource,
                links = %describe(links),
                "linked shared paths into release"
            );
        }
        Ok(())
    }

    /// Links that must exist before migrations run
    pub fn link_before_migrate(&self, release: &Release) -> CapstanResult<()> {
        let links = &self.desired.symlink_before_migrate;
        if links.is_empty() {
            return Ok(());
        }
        self.link(release, links)?;
        info!(
            resource = self.resource,
            links = %describe(links),
            "made pre-migration symlinks"
        );
        Ok(())
    }

    /// The complete symlink step, ending with `current` pointing at `release`
    pub fn symlink(&self, release: &Release) -> CapstanResult<()> {
        self.purge_before_symlink(release)?;
        self.link_shared_into_release(release, &self.desired.symlinks)?;
        self.link_before_migrate(release)?;
        self.provisioner()
            .enforce_ownership(self.desired.layout.deploy_to())?;
        self.promote(release)
    }

    /// Point `current` at `release`
    pub fn promote(&self, release: &Release) -> CapstanResult<()> {
        let current = self.desired.layout.current_path();
        self.runner
            .run(&Invocation::new("rm").arg("-f").path_arg(current))?;
        self.runner.run(
            &Invocation::new("ln")
                .arg("-sf")
                .path_arg(release.path())
                .path_arg(current),
        )?;
        info!(
            resource = self.resource,
            release = %release,
            current = %current.display(),
            "linked release into production"
        );
        self.provisioner()
            .enforce_ownership(self.desired.layout.deploy_to())
    }

    fn link(&self, release: &Release, links: &BTreeMap<String, String>) -> CapstanResult<()> {
        for (shared, target) in links {
            let source = self.desired.layout.shared(shared);
            let dest = release.path().join(target);
            debug!(
                resource = self.resource,
                source = %source.display(),
                dest = %dest.display(),
                "linking shared path"
            );
            self.runner.run(
                &Invocation::new("ln")
                    .arg("-sf")
                    .path_arg(&source)
                    .path_arg(&dest),
            )?;
        }
        Ok(())
    }
}

fn describe(links: &BTreeMap<String, String>) -> String {
    links
        .iter()
        .map(|(shared, target)| format!("{} => {}", shared, target))
        .collect::<Vec<_>>()
        .join(", ")
}
