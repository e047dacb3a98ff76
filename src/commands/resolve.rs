//! `capstan resolve`

use anyhow::Result;

use capstan::infrastructure::{GitRevisionResolver, ProcessRunner};
use capstan::presentation::output::render_resolution;
use capstan::presentation::OutputFormat;

pub fn cmd_resolve(repository: &str, revision: &str, format: OutputFormat) -> Result<()> {
    let runner = ProcessRunner::new();
    let commit = GitRevisionResolver::new(&runner).resolve(revision, repository)?;
    print!("{}", render_resolution(revision, &commit, format));
    Ok(())
}
