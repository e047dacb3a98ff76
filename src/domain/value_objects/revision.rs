//! Revision Value Objects
//!
//! `RevisionSpec` is what an operator writes (`HEAD`, a branch, a tag, a SHA);
//! `CommitId` is what it resolves to.

use std::fmt;

/// Length of a full hexadecimal SHA-1 object name
const SHA_LEN: usize = 40;

/// An exact commit identifier as reported by git
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    /// Wrap an object name reported by git (e.g. a `ls-remote` column)
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a user-supplied string, accepting only a full lowercase SHA
    pub fn parse(s: &str) -> Option<Self> {
        if Self::is_full_sha(s) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    /// True when `s` is exactly 40 lowercase hex characters
    pub fn is_full_sha(s: &str) -> bool {
        s.len() == SHA_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A human-supplied revision specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionSpec {
    /// `""` or `"HEAD"`: whatever the remote's HEAD points at
    Head,
    /// A full SHA; resolves to itself without touching the network
    Commit(CommitId),
    /// A branch, tag, or fully-qualified ref name
    Named(String),
}

impl RevisionSpec {
    pub fn parse(s: &str) -> Self {
        match s {
            "" | "HEAD" => RevisionSpec::Head,
            _ => match CommitId::parse(s) {
                Some(commit) => RevisionSpec::Commit(commit),
                None => RevisionSpec::Named(s.to_string()),
            },
        }
    }

    /// Pattern passed to `git ls-remote`.
    ///
    /// Named revisions get a trailing `*` so annotated-tag dereference
    /// entries (`refs/tags/<name>^{}`) are listed too.
    pub fn search_pattern(&self) -> String {
        match self {
            RevisionSpec::Head => "HEAD".to_string(),
            RevisionSpec::Commit(commit) => commit.to_string(),
            RevisionSpec::Named(name) => format!("{}*", name),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RevisionSpec::Head => "HEAD",
            RevisionSpec::Commit(commit) => commit.as_str(),
            RevisionSpec::Named(name) => name,
        }
    }
}

impl fmt::Display for RevisionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
