//! Repository adapter that shells out to the `git` binary

use async_trait::async_trait;
use gitmatch_domain::{RepoError, RepoLocator, RepositoryProvider};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Handle on a `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
}

impl GitCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Output of `git --version`
    pub async fn version(&self) -> Result<String, RepoError> {
        self.capture(None, &["--version"])
            .await?
            .map(|out| out.trim().to_string())
            .map_err(|message| RepoError::Spawn {
                command: format!("{} --version", self.binary),
                message,
            })
    }

    /// Clone `locator` into `dest`, pinned to its branch if one is given
    pub async fn clone_repository(
        &self,
        locator: &RepoLocator,
        dest: &Path,
    ) -> Result<GitWorkingCopy, RepoError> {
        let dest_arg = dest.to_string_lossy();
        let mut args = vec!["clone", "--quiet"];
        if let Some(branch) = locator.branch.as_deref() {
            args.extend(["--branch", branch]);
        }
        args.extend(["--", locator.url.as_str(), &*dest_arg]);

        tracing::info!(
            url = %locator.url,
            branch = ?locator.branch,
            dest = %dest.display(),
            "Cloning repository"
        );

        self.capture(None, &args)
            .await?
            .map_err(|message| RepoError::Clone {
                url: locator.url.clone(),
                message,
            })?;

        Ok(GitWorkingCopy::open(self.clone(), dest))
    }

    /// Run git and return stdout on success, stderr as the error otherwise
    async fn capture(
        &self,
        dir: Option<&Path>,
        args: &[&str],
    ) -> Result<Result<String, String>, RepoError> {
        let mut command = Command::new(&self.binary);
        command.args(args);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }
        command.env("GIT_TERMINAL_PROMPT", "0");
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        tracing::trace!(binary = %self.binary, args = ?args, "Running git");

        let output = command.output().await.map_err(|e| RepoError::Spawn {
            command: self.binary.clone(),
            message: e.to_string(),
        })?;

        if output.status.success() {
            Ok(Ok(String::from_utf8_lossy(&output.stdout).into_owned()))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Ok(Err(format!("{}: {}", output.status, stderr.trim())))
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

/// A cloned repository whose working tree is rewritten by each checkout
#[derive(Debug, Clone)]
pub struct GitWorkingCopy {
    git: GitCli,
    dir: PathBuf,
}

impl GitWorkingCopy {
    /// Wrap an existing clone
    pub fn open(git: GitCli, dir: impl Into<PathBuf>) -> Self {
        Self {
            git,
            dir: dir.into(),
        }
    }
}

fn non_blank_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl RepositoryProvider for GitWorkingCopy {
    fn working_copy(&self) -> &Path {
        &self.dir
    }

    async fn list_commits(&self) -> Result<Vec<String>, RepoError> {
        let output = self
            .git
            .capture(Some(&self.dir), &["log", "--pretty=format:%H"])
            .await?
            .map_err(|message| RepoError::List {
                what: "commits",
                message,
            })?;
        Ok(non_blank_lines(&output))
    }

    async fn list_tags(&self) -> Result<Vec<String>, RepoError> {
        let output = self
            .git
            .capture(Some(&self.dir), &["tag", "--list"])
            .await?
            .map_err(|message| RepoError::List {
                what: "tags",
                message,
            })?;
        Ok(non_blank_lines(&output))
    }

    async fn checkout(&self, revision: &str) -> Result<(), RepoError> {
        self.git
            .capture(
                Some(&self.dir),
                &[
                    "-c",
                    "advice.detachedHead=false",
                    "checkout",
                    "--quiet",
                    "--force",
                    revision,
                    "--",
                ],
            )
            .await?
            .map_err(|message| RepoError::Checkout {
                revision: revision.to_string(),
                message,
            })?;
        Ok(())
    }

    async fn timestamp(&self, revision: &str) -> Result<String, RepoError> {
        let output = self
            .git
            .capture(
                Some(&self.dir),
                &["log", "-1", "--format=%ci", revision, "--"],
            )
            .await?
            .map_err(|message| RepoError::Timestamp {
                revision: revision.to_string(),
                message,
            })?;
        Ok(output.trim().to_string())
    }
}
