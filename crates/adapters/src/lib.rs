//! gitmatch adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `git`: `git` binary adapter (clone, log, tag, checkout)
//! - `workspace`: scratch directory for the clone

mod git_cli;
pub mod workspace;

/// Re-exports for git adapters
pub mod git {
    pub use crate::git_cli::{GitCli, GitWorkingCopy};
}
