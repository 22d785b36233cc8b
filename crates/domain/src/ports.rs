//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Error type for repository operations
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Failed to run {command}: {message}")]
    Spawn { command: String, message: String },
    #[error("Clone of {url} failed: {message}")]
    Clone { url: String, message: String },
    #[error("Listing {what} failed: {message}")]
    List { what: &'static str, message: String },
    #[error("Checkout of {revision} failed: {message}")]
    Checkout { revision: String, message: String },
    #[error("Reading date of {revision} failed: {message}")]
    Timestamp { revision: String, message: String },
}

/// Port for a local working copy of a version-controlled repository
///
/// The working copy is a single mutable directory: `checkout` replaces its
/// contents, so callers must not interleave checkouts with reads of the tree.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// Directory holding the checked-out tree
    fn working_copy(&self) -> &Path;

    /// Commit hashes reachable from HEAD, most recent first
    async fn list_commits(&self) -> Result<Vec<String>, RepoError>;

    /// Tag names in the order the repository reports them
    async fn list_tags(&self) -> Result<Vec<String>, RepoError>;

    /// Materialize a commit or tag into the working copy
    async fn checkout(&self, revision: &str) -> Result<(), RepoError>;

    /// Commit date of a commit or tag, as display text
    async fn timestamp(&self, revision: &str) -> Result<String, RepoError>;
}
