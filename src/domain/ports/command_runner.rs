//! CommandRunner port - abstraction over subprocess execution
//!
//! Every filesystem mutation (`mkdir`, `ln`, `rm`, `cp`, `chown`), the
//! release mtime probe (`stat`) and all `git` subcommands go through this
//! trait, so the engine can be exercised with a recording runner.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CapstanError, CapstanResult};

/// A command to run: program, arguments, and options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    env: Vec<(String, OsString)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Build from an argument vector whose first element is the program
    pub fn argv<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts = argv.into_iter().map(Into::into);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.map(OsString::from).collect(),
            cwd: None,
            env: Vec::new(),
        })
    }

    /// Run `script` through `sh -c`
    pub fn shell(script: impl Into<String>) -> Self {
        Self::new("sh").arg("-c").arg(script.into())
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument, bytes untouched
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.as_os_str())
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn get_env(&self) -> &[(String, OsString)] {
        &self.env
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Completed command result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs commands to completion
pub trait CommandRunner {
    /// Run and return the output whatever the exit status
    fn execute(&self, invocation: &Invocation) -> CapstanResult<CommandOutput>;

    /// Run and fail on a non-zero exit status
    fn run(&self, invocation: &Invocation) -> CapstanResult<CommandOutput> {
        let output = self.execute(invocation)?;
        if output.success() {
            Ok(output)
        } else {
            Err(CapstanError::CommandFailed {
                command: invocation.to_string(),
                status: output.status,
                stderr: output.stderr,
            })
        }
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn execute(&self, invocation: &Invocation) -> CapstanResult<CommandOutput> {
        (**self).execute(invocation)
    }
}
