//! Scratch directory that receives the clone for a scan

use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Failed to prepare workspace {}: {source}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid workspace name {name:?}: must be a single directory name")]
    InvalidName { name: String },
}

/// Location of the scratch clone, cleaned up on drop unless kept
///
/// With an explicit root the clone lives at `<root>/<repo-name>` and any
/// leftover directory there is removed first. Otherwise a fresh temporary
/// directory is used.
#[derive(Debug)]
pub struct ScratchWorkspace {
    clone_dir: PathBuf,
    temp: Option<TempDir>,
    keep: bool,
}

impl ScratchWorkspace {
    pub fn create(
        root: Option<&Path>,
        repo_name: &str,
        keep: bool,
    ) -> Result<Self, WorkspaceError> {
        let mut components = Path::new(repo_name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(WorkspaceError::InvalidName {
                name: repo_name.to_string(),
            });
        }

        match root {
            Some(root) => {
                let clone_dir = root.join(repo_name);
                if clone_dir.exists() {
                    tracing::debug!(path = %clone_dir.display(), "Removing stale workspace");
                    std::fs::remove_dir_all(&clone_dir).map_err(|source| {
                        WorkspaceError::Prepare {
                            path: clone_dir.clone(),
                            source,
                        }
                    })?;
                }
                std::fs::create_dir_all(root).map_err(|source| WorkspaceError::Prepare {
                    path: root.to_path_buf(),
                    source,
                })?;
                Ok(Self {
                    clone_dir,
                    temp: None,
                    keep,
                })
            }
            None => {
                let temp = tempfile::Builder::new()
                    .prefix("gitmatch-")
                    .disable_cleanup(keep)
                    .tempdir()
                    .map_err(|source| WorkspaceError::Prepare {
                        path: std::env::temp_dir(),
                        source,
                    })?;
                Ok(Self {
                    clone_dir: temp.path().join(repo_name),
                    temp: Some(temp),
                    keep,
                })
            }
        }
    }

    /// Directory the repository should be cloned into (not yet created)
    pub fn clone_dir(&self) -> &Path {
        &self.clone_dir
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        if self.keep {
            tracing::info!(path = %self.clone_dir.display(), "Keeping workspace");
            return;
        }
        // TempDir removes itself
        if self.temp.is_none() && self.clone_dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.clone_dir) {
                tracing::warn!(
                    path = %self.clone_dir.display(),
                    error = %e,
                    "Failed to remove workspace"
                );
            }
        }
    }
}
