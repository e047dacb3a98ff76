//! Release Registry
//!
//! The ordered (oldest first) list of releases on disk. Loaded from the
//! filesystem on first use and then owned by the engine for the rest of one
//! apply; afterwards it changes only through `created`, `deleted` and
//! `retire`, so ordering decisions never re-probe the disk mid-deploy.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::entities::Release;
use crate::domain::ports::{CommandRunner, Invocation};
use crate::error::{CapstanError, CapstanResult};
use crate::infrastructure::fs::list_release_dirs;

#[derive(Debug)]
pub struct ReleaseRegistry {
    deploy_to: PathBuf,
    loaded: bool,
    releases: Vec<Release>,
}

impl ReleaseRegistry {
    pub fn new(deploy_to: impl Into<PathBuf>) -> Self {
        Self {
            deploy_to: deploy_to.into(),
            loaded: false,
            releases: Vec::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// All releases, oldest first
    pub fn all<R: CommandRunner + ?Sized>(&mut self, runner: &R) -> CapstanResult<&[Release]> {
        self.ensure_loaded(runner)?;
        Ok(&self.releases)
    }

    pub fn contains<R: CommandRunner + ?Sized>(
        &mut self,
        runner: &R,
        release: &Release,
    ) -> CapstanResult<bool> {
        Ok(self.position(runner, release)?.is_some())
    }

    pub fn position<R: CommandRunner + ?Sized>(
        &mut self,
        runner: &R,
        release: &Release,
    ) -> CapstanResult<Option<usize>> {
        Ok(self.all(runner)?.iter().position(|r| r == release))
    }

    /// Record `release` as the newest, whatever its timestamp says
    pub fn created<R: CommandRunner + ?Sized>(
        &mut self,
        runner: &R,
        release: &Release,
    ) -> CapstanResult<()> {
        self.ensure_loaded(runner)?;
        self.releases.retain(|r| r != release);
        self.releases.push(release.clone());
        Ok(())
    }

    /// Forget `release`; absent releases are ignored
    pub fn deleted<R: CommandRunner + ?Sized>(
        &mut self,
        runner: &R,
        release: &Release,
    ) -> CapstanResult<()> {
        self.ensure_loaded(runner)?;
        self.releases.retain(|r| r != release);
        Ok(())
    }

    /// Remove the release directory and forget it
    pub fn retire<R: CommandRunner + ?Sized>(
        &mut self,
        runner: &R,
        release: &Release,
    ) -> CapstanResult<()> {
        runner.run(&Invocation::new("rm").arg("-rf").path_arg(release.path()))?;
        self.deleted(runner, release)
    }

    fn ensure_loaded<R: CommandRunner + ?Sized>(&mut self, runner: &R) -> CapstanResult<()> {
        if self.loaded {
            return Ok(());
        }
        self.releases = sorted_releases_from_filesystem(runner, &self.deploy_to)?;
        self.loaded = true;
        debug!(
            deploy_to = %self.deploy_to.display(),
            count = self.releases.len(),
            "loaded releases"
        );
        Ok(())
    }
}

/// Release directories ordered by mtime; ties keep lexical order
fn sorted_releases_from_filesystem<R: CommandRunner + ?Sized>(
    runner: &R,
    deploy_to: &Path,
) -> CapstanResult<Vec<Release>> {
    let mut stamped = Vec::new();
    for dir in list_release_dirs(deploy_to)? {
        let mtime = modification_time(runner, &dir)?;
        stamped.push((mtime, Release::new(dir)));
    }
    stamped.sort_by_key(|(mtime, _)| *mtime);
    Ok(stamped.into_iter().map(|(_, release)| release).collect())
}

/// Seconds since the epoch, via `stat` since creation time is not portable
pub fn modification_time<R: CommandRunner + ?Sized>(runner: &R, path: &Path) -> CapstanResult<i64> {
    let output = runner.run(
        &Invocation::new("stat")
            .arg("--format=%Y")
            .path_arg(path),
    )?;
    let raw = output.stdout.trim();
    raw.parse::<i64>()
        .map_err(|_| CapstanError::InvalidTimestamp {
            path: path.to_path_buf(),
            output: raw.to_string(),
        })
}
