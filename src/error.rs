//! Error types for Capstan
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Capstan operations
pub type CapstanResult<T> = Result<T, CapstanError>;

/// Main error type for Capstan operations
#[derive(Error, Debug)]
pub enum CapstanError {
    /// Behavior the deploy resource declares but this engine does not implement
    #[error("unsupported: {feature}")]
    UnsupportedFeature { feature: String },

    /// A revision specifier matched zero or several remote refs
    #[error("could not resolve revision '{revision}' from {repository}: expected exactly one matching ref, found {found}")]
    AmbiguousRevision {
        revision: String,
        repository: String,
        found: usize,
    },

    /// A command exited with a non-zero status
    #[error("command `{command}` failed with {}: {}", status_label(.status), first_line(.stderr))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    /// A command could not be started at all
    #[error("failed to spawn `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// `stat` returned something that is not a timestamp
    #[error("unexpected modification time for {path}: '{output}'")]
    InvalidTimestamp { path: PathBuf, output: String },

    /// Release enumeration failed
    #[error("failed to list releases: {message}")]
    Glob { message: String },

    /// Deploy definition could not be parsed
    #[error("invalid deploy definition in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Deploy definition parsed but is not usable
    #[error("invalid deploy definition: {message}")]
    InvalidConfig { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CapstanError {
    pub fn unsupported(feature: impl Into<String>) -> Self {
        CapstanError::UnsupportedFeature {
            feature: feature.into(),
        }
    }

    /// True for failures that signal a gap in supported behavior rather than a runtime condition
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CapstanError::UnsupportedFeature { .. })
    }
}

fn status_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "a signal".to_string(),
    }
}

fn first_line(stderr: &str) -> &str {
    stderr.trim().lines().next().unwrap_or("")
}

impl From<glob::PatternError> for CapstanError {
    fn from(err: glob::PatternError) -> Self {
        CapstanError::Glob {
            message: err.to_string(),
        }
    }
}

impl From<glob::GlobError> for CapstanError {
    fn from(err: glob::GlobError) -> Self {
        CapstanError::Glob {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_command_failed() {
        let err = CapstanError::CommandFailed {
            command: "git ls-remote origin HEAD".to_string(),
            status: Some(128),
            stderr: "fatal: repository not found\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "command `git ls-remote origin HEAD` failed with exit status 128: fatal: repository not found"
        );
    }

    #[test]
    fn test_error_display_killed_by_signal() {
        let err = CapstanError::CommandFailed {
            command: "sleep 10".to_string(),
            status: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("a signal"));
    }

    #[test]
    fn test_error_display_ambiguous_revision() {
        let err = CapstanError::AmbiguousRevision {
            revision: "v1".to_string(),
            repository: "https://example.com/app.git".to_string(),
            found: 2,
        };
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn test_unsupported_helper() {
        let err = CapstanError::unsupported("migrations");
        assert!(err.is_unsupported());
        assert_eq!(err.to_string(), "unsupported: migrations");
    }
}
