//! Remote ref resolution
//!
//! Turns `git ls-remote` output plus a `RevisionSpec` into a single commit,
//! following git's own tag-before-branch precedence. The precedence is an
//! ordered rule list so it can be read top to bottom:
//!
//! | # | named revision `v1`       | `HEAD`               |
//! |---|---------------------------|----------------------|
//! | 1 | `refs/tags/v1^{}`         | `HEAD`               |
//! | 2 | `refs/heads/v1^{}`        | `refs/tags/HEAD`     |
//! | 3 | `v1^{}`                   | `refs/heads/HEAD`    |
//! | 4 | `refs/tags/v1`            |                      |
//! | 5 | `refs/heads/v1`           |                      |
//! | 6 | `v1`                      |                      |
//!
//! The first rule with any match decides; it must match exactly once.
//! Annotated tags named `HEAD` are never dereferenced.

use crate::domain::value_objects::{CommitId, RevisionSpec};

const TAG_PREFIX: &str = "refs/tags/";
const HEAD_PREFIX: &str = "refs/heads/";
const PEELED_SUFFIX: &str = "^{}";

/// One `<sha>\t<refname>` line of `git ls-remote`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    pub commit: CommitId,
    pub name: String,
}

/// Exact ref name to look for, with a label for logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRule {
    pub label: &'static str,
    pub pattern: String,
}

impl RefRule {
    fn new(label: &'static str, pattern: String) -> Self {
        Self { label, pattern }
    }
}

/// Why no single ref could be selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefSelectionError {
    /// No rule matched anything
    NotFound,
    /// The deciding rule matched more than once
    Ambiguous { rule: RefRule, found: usize },
}

impl RefSelectionError {
    pub fn found(&self) -> usize {
        match self {
            RefSelectionError::NotFound => 0,
            RefSelectionError::Ambiguous { found, .. } => *found,
        }
    }
}

/// Parse tab-separated `ls-remote` output, skipping malformed lines
pub fn parse_ls_remote(output: &str) -> Vec<RemoteRef> {
    output
        .lines()
        .filter_map(|line| {
            let (commit, name) = line.split_once('\t')?;
            let commit = commit.trim();
            let name = name.trim();
            if commit.is_empty() || name.is_empty() {
                return None;
            }
            Some(RemoteRef {
                commit: CommitId::new(commit),
                name: name.to_string(),
            })
        })
        .collect()
}

fn qualify(prefix: &str, revision: &str) -> String {
    if revision.starts_with(prefix) {
        revision.to_string()
    } else {
        format!("{}{}", prefix, revision)
    }
}

fn candidate_rules(revision: &str, suffix: &str) -> [RefRule; 3] {
    let (tag, head, verbatim) = if suffix.is_empty() {
        ("tag", "branch", "ref")
    } else {
        ("annotated tag", "peeled branch", "peeled ref")
    };
    [
        RefRule::new(tag, qualify(TAG_PREFIX, revision) + suffix),
        RefRule::new(head, qualify(HEAD_PREFIX, revision) + suffix),
        RefRule::new(verbatim, format!("{}{}", revision, suffix)),
    ]
}

/// Ordered rules for a revision. A full SHA yields no rules; it never needs a lookup.
pub fn resolution_rules(spec: &RevisionSpec) -> Vec<RefRule> {
    match spec {
        RevisionSpec::Commit(_) => Vec::new(),
        RevisionSpec::Head => {
            let mut rules = vec![RefRule::new("HEAD", "HEAD".to_string())];
            // The verbatim rule would repeat `HEAD`
            rules.extend(candidate_rules("HEAD", "").into_iter().take(2));
            rules
        }
        RevisionSpec::Named(name) => {
            let mut rules = candidate_rules(name, PEELED_SUFFIX).to_vec();
            rules.extend(candidate_rules(name, ""));
            rules
        }
    }
}

/// Apply `rules` in order to `refs`
pub fn select_ref(refs: &[RemoteRef], rules: &[RefRule]) -> Result<CommitId, RefSelectionError> {
    for rule in rules {
        let matches: Vec<&RemoteRef> = refs.iter().filter(|r| r.name == rule.pattern).collect();
        match matches.as_slice() {
            [] => continue,
            [single] => return Ok(single.commit.clone()),
            many => {
                return Err(RefSelectionError::Ambiguous {
                    rule: rule.clone(),
                    found: many.len(),
                })
            }
        }
    }
    Err(RefSelectionError::NotFound)
}
