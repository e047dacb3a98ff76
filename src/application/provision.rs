//! Directory provisioning and ownership
//!
//! `mkdir` and `chown` go through the runner like every other mutation.

use std::path::Path;

use tracing::{debug, info};

use crate::domain::ports::{CommandRunner, Invocation};
use crate::domain::value_objects::Ownership;
use crate::error::CapstanResult;

pub struct Provisioner<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    ownership: &'a Ownership,
    resource: &'a str,
}

impl<'a, R: CommandRunner + ?Sized> Provisioner<'a, R> {
    pub fn new(runner: &'a R, ownership: &'a Ownership, resource: &'a str) -> Self {
        Self {
            runner,
            ownership,
            resource,
        }
    }

    /// Create `dir` (and parents) unless it is already a directory.
    ///
    /// A freshly created directory is handed to the configured user and group.
    /// Returns whether anything was created.
    pub fn create_dir_unless_exists(&self, dir: &Path) -> CapstanResult<bool> {
        if dir.is_dir() {
            debug!(
                resource = self.resource,
                dir = %dir.display(),
                "not creating directory because it already exists"
            );
            return Ok(false);
        }

        self.runner
            .run(&Invocation::new("mkdir").arg("-p").path_arg(dir))?;
        debug!(resource = self.resource, dir = %dir.display(), "created directory");

        if let Some(user) = &self.ownership.user {
            self.runner
                .run(&Invocation::new("chown").arg(user.as_str()).path_arg(dir))?;
        }
        if let Some(group) = &self.ownership.group {
            self.runner
                .run(&Invocation::new("chown").arg(format!(":{}", group)).path_arg(dir))?;
        }
        Ok(true)
    }

    /// Recursively apply the configured owner to `deploy_to`
    pub fn enforce_ownership(&self, deploy_to: &Path) -> CapstanResult<()> {
        let Some(spec) = self.ownership.chown_spec() else {
            return Ok(());
        };
        info!(
            resource = self.resource,
            owner = %spec,
            deploy_to = %deploy_to.display(),
            "setting ownership"
        );
        self.runner
            .run(&Invocation::new("chown").arg("-Rf").arg(spec).path_arg(deploy_to))?;
        Ok(())
    }
}
