//! Process-backed command runner
//!
//! Runs each invocation to completion with captured stdout/stderr. stdin is
//! closed so a command waiting for input (e.g. a git credential prompt) fails
//! instead of hanging the deploy.

use std::cell::RefCell;
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use crate::domain::ports::{CommandOutput, CommandRunner, Invocation};
use crate::error::{CapstanError, CapstanResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn execute(&self, invocation: &Invocation) -> CapstanResult<CommandOutput> {
        debug!(command = %invocation, cwd = ?invocation.get_current_dir(), "running command");

        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = invocation.get_current_dir() {
            cmd.current_dir(dir);
        }
        for (key, value) in invocation.get_env() {
            cmd.env(key, value);
        }

        let output = cmd.output().map_err(|source| CapstanError::CommandSpawn {
            command: invocation.to_string(),
            source,
        })?;

        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        trace!(command = %invocation, status = ?result.status, "command finished");
        Ok(result)
    }
}

/// Decorator that records every invocation before delegating
#[derive(Debug, Default)]
pub struct RecordingRunner<R: CommandRunner> {
    inner: R,
    calls: RefCell<Vec<Invocation>>,
}

impl<R: CommandRunner> RecordingRunner<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Recorded invocations rendered as command lines
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }

    /// Commands run by `program`, rendered as command lines
    pub fn commands_for(&self, program: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|inv| inv.program() == program)
            .map(ToString::to_string)
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl<R: CommandRunner> CommandRunner for RecordingRunner<R> {
    fn execute(&self, invocation: &Invocation) -> CapstanResult<CommandOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        self.inner.execute(invocation)
    }
}
