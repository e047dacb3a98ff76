//! Output Rendering
//!
//! Renders command results as human-readable text or JSON.

use chrono::DateTime;

use crate::application::{DeployOutcome, ReleaseEntry};
use crate::domain::entities::Release;
use crate::domain::value_objects::CommitId;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

fn paths(releases: &[Release]) -> Vec<String> {
    releases.iter().map(ToString::to_string).collect()
}

fn to_json_string(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Render the result of one deploy
pub fn render_outcome(outcome: &DeployOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let previous = match outcome {
                DeployOutcome::Deployed { previous, .. } => previous.as_ref().map(ToString::to_string),
                _ => None,
            };
            let json = serde_json::json!({
                "outcome": outcome.kind(),
                "release": outcome.release().to_string(),
                "release_id": outcome.release().id(),
                "previous": previous,
                "removed": paths(outcome.removed()),
            });
            to_json_string(&json)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            match outcome {
                DeployOutcome::AlreadyCurrent { release } => {
                    out.push_str(&format!("Already up-to-date: {}\n", release.id()));
                }
                DeployOutcome::RolledBack { release, .. } => {
                    out.push_str(&format!("Rolled back to {}\n", release.id()));
                }
                DeployOutcome::Deployed { release, previous, .. } => {
                    out.push_str(&format!("Deployed {}\n", release.id()));
                    if let Some(previous) = previous {
                        out.push_str(&format!("  previous: {}\n", previous.id()));
                    }
                }
            }
            out.push_str(&format!("  path: {}\n", outcome.release()));
            let removed = outcome.removed();
            if !removed.is_empty() {
                out.push_str(&format!("  Removed ({}):\n", removed.len()));
                for release in removed {
                    out.push_str(&format!("    - {}\n", release.id()));
                }
            }
            out
        }
    }
}

fn format_timestamp(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// Render a release listing, oldest first
pub fn render_releases(entries: &[ReleaseEntry], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let releases: Vec<serde_json::Value> = entries
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "id": entry.release.id(),
                        "path": entry.release.to_string(),
                        "modified": DateTime::from_timestamp(entry.modified, 0)
                            .map(|t| t.to_rfc3339()),
                        "current": entry.current,
                    })
                })
                .collect();
            to_json_string(&serde_json::json!({ "releases": releases }))
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                return "No releases\n".to_string();
            }
            let mut out = String::new();
            for entry in entries {
                let marker = if entry.current { "*" } else { " " };
                out.push_str(&format!(
                    "{} {}  {}\n",
                    marker,
                    format_timestamp(entry.modified),
                    entry.release.id()
                ));
            }
            out
        }
    }
}

/// Render a resolved revision
pub fn render_resolution(revision: &str, commit: &CommitId, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json_string(&serde_json::json!({
            "revision": revision,
            "commit": commit.as_str(),
        })),
        OutputFormat::Text => format!("{}\n", commit),
    }
}
