//! Directory fingerprinting use case

use sha2::{Digest, Sha256};
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::{ignore_rules::IgnoreRuleSet, model::Fingerprint};

/// Version-control bookkeeping directory, never part of the content
pub const VCS_DIR_NAME: &str = ".git";

/// Error type for fingerprinting
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Hash every included regular file under `root` into a single digest
///
/// Entries are visited depth-first in file-name order and only file bytes
/// are hashed, so two trees fingerprint equal exactly when their included
/// files have the same contents in the same order. `.git` directories and
/// paths excluded by the root `.gitignore` are pruned. Any read failure
/// aborts the whole computation.
pub fn fingerprint_dir(root: &Path) -> Result<Fingerprint, FingerprintError> {
    if !root.is_dir() {
        return Err(FingerprintError::NotADirectory(root.to_path_buf()));
    }

    let rules = IgnoreRuleSet::compile_or_empty(root);
    let mut hasher = Sha256::new();
    let mut files_hashed = 0usize;

    let mut entries = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = entries.next() {
        let entry = entry.map_err(|e| FingerprintError::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e,
        })?;

        if entry.depth() == 0 {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_dir() && entry.file_name() == VCS_DIR_NAME {
            entries.skip_current_dir();
            continue;
        }

        let relative = relative_posix_path(root, entry.path());
        if rules.matches(&relative, file_type.is_dir()) {
            if file_type.is_dir() {
                tracing::trace!(path = %relative, "Pruned ignored directory");
                entries.skip_current_dir();
            }
            continue;
        }

        if !file_type.is_file() {
            continue;
        }

        let mut file = File::open(entry.path()).map_err(|e| FingerprintError::Read {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        std::io::copy(&mut file, &mut hasher).map_err(|e| FingerprintError::Read {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        files_hashed += 1;
    }

    let fingerprint = Fingerprint::from_bytes(hasher.finalize().into());

    tracing::debug!(
        root = %root.display(),
        files = files_hashed,
        fingerprint = %fingerprint,
        "Fingerprinted directory"
    );

    Ok(fingerprint)
}

fn relative_posix_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&part.to_string_lossy());
        }
    }
    out
}
