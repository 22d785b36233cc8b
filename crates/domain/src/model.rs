//! Domain models and value objects

use serde::{Serialize, Serializer};
use std::fmt;

/// SHA-256 digest of a directory's included file contents
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Which part of the history a scan walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    /// Commits reachable from HEAD, most recent first
    Commits,
    /// Tag names in repository order
    Tags,
}

impl ScanKind {
    /// Resolve the `--commits` / `--tags` flags; neither flag means both
    pub fn selected(commits: bool, tags: bool) -> Vec<ScanKind> {
        let mut kinds = Vec::with_capacity(2);
        if commits || !tags {
            kinds.push(ScanKind::Commits);
        }
        if tags || !commits {
            kinds.push(ScanKind::Tags);
        }
        kinds
    }

    /// Singular noun used in user-facing messages
    pub fn noun(&self) -> &'static str {
        match self {
            ScanKind::Commits => "commit",
            ScanKind::Tags => "tag",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanKind::Commits => f.write_str("commits"),
            ScanKind::Tags => f.write_str("tags"),
        }
    }
}

/// One point in the repository's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revision {
    pub kind: ScanKind,
    /// Commit hash or tag name
    pub id: String,
}

impl Revision {
    pub fn commit(id: impl Into<String>) -> Self {
        Self {
            kind: ScanKind::Commits,
            id: id.into(),
        }
    }

    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            kind: ScanKind::Tags,
            id: name.into(),
        }
    }
}

/// Terminal outcome of a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    NoMatch,
    Matched {
        revision: Revision,
        /// Commit date as reported by the repository
        timestamp: String,
    },
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    pub fn revision(&self) -> Option<&Revision> {
        match self {
            MatchResult::Matched { revision, .. } => Some(revision),
            MatchResult::NoMatch => None,
        }
    }
}

/// A revision that was skipped because it could not be examined
#[derive(Debug, Clone, Serialize)]
pub struct RevisionFailure {
    pub revision: Revision,
    pub error: String,
}

/// Everything a single scan observed
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub kind: ScanKind,
    pub result: MatchResult,
    /// Revisions checked out and fingerprinted (including the match)
    pub examined: usize,
    pub failures: Vec<RevisionFailure>,
}

/// A remote repository URL with an optional branch pin, written `url#branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocator {
    pub url: String,
    pub branch: Option<String>,
}

impl RepoLocator {
    /// Split `url#branch` on the first `#`; an empty branch means the default one
    pub fn parse(input: &str) -> Self {
        match input.split_once('#') {
            Some((url, branch)) if !branch.is_empty() => Self {
                url: url.to_string(),
                branch: Some(branch.to_string()),
            },
            Some((url, _)) => Self {
                url: url.to_string(),
                branch: None,
            },
            None => Self {
                url: input.to_string(),
                branch: None,
            },
        }
    }

    /// Last path segment of the URL without a trailing `.git`
    pub fn repo_name(&self) -> String {
        let trimmed = self.url.trim_end_matches('/');
        let base = trimmed
            .rsplit(['/', '\\', ':'])
            .next()
            .unwrap_or(trimmed);
        let name = base.strip_suffix(".git").unwrap_or(base);
        if name.is_empty() || name == "." || name == ".." {
            "repository".to_string()
        } else {
            name.to_string()
        }
    }
}
