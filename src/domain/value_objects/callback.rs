//! Lifecycle callback values
//!
//! A callback slot is either empty, an embedded recipe handed to the
//! `RecipeExecutor`, or a plain string command. String commands were never
//! given semantics and are rejected when the slot fires.

use std::fmt;
use std::path::PathBuf;

/// Pipeline points at which user callbacks run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    BeforeMigrate,
    BeforeSymlink,
    BeforeRestart,
    AfterRestart,
}

impl Hook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hook::BeforeMigrate => "before_migrate",
            Hook::BeforeSymlink => "before_symlink",
            Hook::BeforeRestart => "before_restart",
            Hook::AfterRestart => "after_restart",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contents of one callback slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Callback {
    #[default]
    None,
    /// Embedded executable block, run with the release path bound
    Recipe(PathBuf),
    /// Plain string command (unsupported)
    Command(String),
}

impl Callback {
    pub fn is_none(&self) -> bool {
        matches!(self, Callback::None)
    }
}

/// How the application is restarted after the symlink swing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RestartCommand {
    #[default]
    None,
    /// Shell string, run via `sh -c` from the current path
    Shell(String),
    /// Argument vector, run directly from the current path
    Argv(Vec<String>),
    /// Embedded recipe
    Recipe(PathBuf),
}
