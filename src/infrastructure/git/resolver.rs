//! Remote revision resolution
//!
//! Full SHAs are returned as-is without contacting the remote. Everything else
//! is looked up with `git ls-remote` and narrowed with the ordered rules from
//! `domain::services::ref_resolution`.

use tracing::debug;

use crate::domain::ports::{CommandRunner, Invocation};
use crate::domain::services::{parse_ls_remote, resolution_rules, select_ref};
use crate::domain::value_objects::{CommitId, RevisionSpec};
use crate::error::{CapstanError, CapstanResult};

pub struct GitRevisionResolver<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> GitRevisionResolver<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    /// Resolve `revision` against `repository` to exactly one commit
    pub fn resolve(&self, revision: &str, repository: &str) -> CapstanResult<CommitId> {
        let spec = RevisionSpec::parse(revision);
        if let RevisionSpec::Commit(commit) = spec {
            return Ok(commit);
        }

        let pattern = spec.search_pattern();
        debug!(repository, pattern = %pattern, "resolving remote reference");
        let listing = self.runner.run(
            &Invocation::new("git")
                .arg("ls-remote")
                .arg(repository)
                .arg(pattern.as_str()),
        )?;

        let refs = parse_ls_remote(&listing.stdout);
        let rules = resolution_rules(&spec);
        select_ref(&refs, &rules).map_err(|err| CapstanError::AmbiguousRevision {
            revision: spec.to_string(),
            repository: repository.to_string(),
            found: err.found(),
        })
    }
}
