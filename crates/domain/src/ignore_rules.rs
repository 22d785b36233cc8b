//! Gitignore-based exclusion rules for fingerprinting
//!
//! Only the `.gitignore` at the root of the hashed directory is consulted.
//! Nested `.gitignore` files, `.git/info/exclude` and global excludes are not.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the ignore file read from the root of a hashed directory
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// The ignore file exists but could not be compiled
#[derive(Debug, Error)]
#[error("Failed to parse {}: {message}", .path.display())]
pub struct RuleParseError {
    pub path: PathBuf,
    pub message: String,
}

/// Compiled exclusion patterns for one directory
#[derive(Debug, Clone)]
pub struct IgnoreRuleSet {
    gitignore: Gitignore,
}

impl IgnoreRuleSet {
    /// A rule set that excludes nothing
    pub fn empty() -> Self {
        Self {
            gitignore: Gitignore::empty(),
        }
    }

    /// Compile the `.gitignore` at the root of `dir`
    ///
    /// A missing file yields the empty rule set.
    pub fn compile(dir: &Path) -> Result<Self, RuleParseError> {
        let path = dir.join(IGNORE_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::empty());
        }

        let mut builder = GitignoreBuilder::new(dir);
        if let Some(err) = builder.add(&path) {
            return Err(RuleParseError {
                path,
                message: err.to_string(),
            });
        }

        let gitignore = builder.build().map_err(|e| RuleParseError {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(
            path = %path.display(),
            patterns = gitignore.len(),
            "Compiled ignore rules"
        );

        Ok(Self { gitignore })
    }

    /// Like [`IgnoreRuleSet::compile`], but a malformed file degrades to the
    /// empty rule set with a warning instead of failing
    pub fn compile_or_empty(dir: &Path) -> Self {
        match Self::compile(dir) {
            Ok(rules) => rules,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed ignore file");
                Self::empty()
            }
        }
    }

    /// Whether `relative_path` (forward slashes, relative to the compiled
    /// directory) is excluded
    pub fn matches(&self, relative_path: &str, is_dir: bool) -> bool {
        self.gitignore.matched(relative_path, is_dir).is_ignore()
    }

    pub fn is_empty(&self) -> bool {
        self.gitignore.is_empty()
    }
}

impl Default for IgnoreRuleSet {
    fn default() -> Self {
        Self::empty()
    }
}
