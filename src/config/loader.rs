//! Deploy definition loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CapstanError, CapstanResult};

use super::types::DeployConfig;

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load a deploy definition and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> CapstanResult<(DeployConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    parse_with_warnings(&content, path)
}

/// Parse definition text; `path` is only used in messages
pub fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> CapstanResult<(DeployConfig, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: DeployConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| CapstanError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Apply environment variable overrides (CAPSTAN_* prefix)
pub fn with_env_overrides(config: DeployConfig) -> CapstanResult<DeployConfig> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides from `lookup`, which maps a variable name to its value
pub fn apply_overrides<F>(mut config: DeployConfig, lookup: F) -> CapstanResult<DeployConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // CAPSTAN_REVISION
    if let Some(revision) = lookup("CAPSTAN_REVISION") {
        if !revision.trim().is_empty() {
            config.revision = revision.trim().to_string();
        }
    }

    // CAPSTAN_KEEP_RELEASES
    if let Some(keep) = lookup("CAPSTAN_KEEP_RELEASES") {
        config.keep_releases = keep.trim().parse().map_err(|_| CapstanError::InvalidConfig {
            message: format!("CAPSTAN_KEEP_RELEASES must be a non-negative integer, got '{}'", keep),
        })?;
    }

    // CAPSTAN_ROLLBACK_ON_ERROR
    if let Some(val) = lookup("CAPSTAN_ROLLBACK_ON_ERROR") {
        config.rollback_on_error = val.to_lowercase() != "false" && val != "0";
    }

    Ok(config)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "name",
        "action",
        "revision",
        "deploy_to",
        "shared_path",
        "current_path",
        "user",
        "group",
        "keep_releases",
        "rollback_on_error",
        "migrate",
        "restart_command",
        "before_migrate",
        "before_symlink",
        "before_restart",
        "after_restart",
        "symlink_before_migrate",
        "symlinks",
        "purge_before_symlink",
        "create_dirs_before_symlink",
        "source",
        "git",
        "directory",
        "path",
        "repository",
        "remote",
        "destination",
        "depth",
        "shallow_clone",
        "enable_checkout",
        "checkout_branch",
        "enable_submodules",
        "additional_remotes",
        "recipe",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
