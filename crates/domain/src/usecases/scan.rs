//! History scan use case - checks out each revision and compares fingerprints

use std::sync::Arc;
use thiserror::Error;

use crate::{
    model::{Fingerprint, MatchResult, Revision, RevisionFailure, ScanKind, ScanReport},
    ports::{RepoError, RepositoryProvider},
    usecases::fingerprint::{FingerprintError, fingerprint_dir},
};

/// Fatal scan errors: the revision list itself could not be produced
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to enumerate {kind}: {source}")]
    Enumerate {
        kind: ScanKind,
        #[source]
        source: RepoError,
    },
}

/// Per-revision errors; the scan records them and moves on
#[derive(Debug, Error)]
pub enum RevisionError {
    #[error(transparent)]
    Checkout(RepoError),
    #[error("Fingerprint failed: {0}")]
    Fingerprint(#[from] FingerprintError),
    #[error(transparent)]
    Timestamp(RepoError),
}

/// Walks a repository's history looking for a tree equal to a target fingerprint
pub struct HistoryScanner<R>
where
    R: RepositoryProvider + ?Sized,
{
    repo: Arc<R>,
}

impl<R> HistoryScanner<R>
where
    R: RepositoryProvider + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Run the scan for one kind of revision
    pub async fn scan(&self, kind: ScanKind, target: &Fingerprint) -> Result<ScanReport, ScanError> {
        match kind {
            ScanKind::Commits => self.scan_commits(target).await,
            ScanKind::Tags => self.scan_tags(target).await,
        }
    }

    /// Compare every commit reachable from HEAD, most recent first
    pub async fn scan_commits(&self, target: &Fingerprint) -> Result<ScanReport, ScanError> {
        let ids = self
            .repo
            .list_commits()
            .await
            .map_err(|source| ScanError::Enumerate {
                kind: ScanKind::Commits,
                source,
            })?;

        let revisions = ids.into_iter().map(Revision::commit).collect();
        Ok(self.scan_revisions(ScanKind::Commits, revisions, target).await)
    }

    /// Compare every tag, in the order the repository lists them
    pub async fn scan_tags(&self, target: &Fingerprint) -> Result<ScanReport, ScanError> {
        let names = self
            .repo
            .list_tags()
            .await
            .map_err(|source| ScanError::Enumerate {
                kind: ScanKind::Tags,
                source,
            })?;

        let revisions = names.into_iter().map(Revision::tag).collect();
        Ok(self.scan_revisions(ScanKind::Tags, revisions, target).await)
    }

    async fn scan_revisions(
        &self,
        kind: ScanKind,
        revisions: Vec<Revision>,
        target: &Fingerprint,
    ) -> ScanReport {
        let revisions: Vec<Revision> = revisions
            .into_iter()
            .filter(|r| !r.id.trim().is_empty())
            .collect();

        tracing::info!(
            kind = %kind,
            candidates = revisions.len(),
            target = %target,
            "Scanning history"
        );

        let mut report = ScanReport {
            kind,
            result: MatchResult::NoMatch,
            examined: 0,
            failures: Vec::new(),
        };

        for revision in revisions {
            match self.examine(&revision, target).await {
                Ok(Some(timestamp)) => {
                    report.examined += 1;
                    tracing::info!(
                        kind = %kind,
                        revision = %revision.id,
                        timestamp = %timestamp,
                        "Found matching revision"
                    );
                    report.result = MatchResult::Matched {
                        revision,
                        timestamp,
                    };
                    return report;
                }
                Ok(None) => {
                    report.examined += 1;
                    tracing::debug!(revision = %revision.id, "No match");
                }
                Err(e) => {
                    tracing::warn!(
                        kind = %kind,
                        revision = %revision.id,
                        error = %e,
                        "Skipping revision"
                    );
                    report.failures.push(RevisionFailure {
                        revision,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            kind = %kind,
            examined = report.examined,
            failed = report.failures.len(),
            "No matching revision found"
        );

        report
    }

    /// Materialize one revision and compare; returns its timestamp on a match
    async fn examine(
        &self,
        revision: &Revision,
        target: &Fingerprint,
    ) -> Result<Option<String>, RevisionError> {
        self.repo
            .checkout(&revision.id)
            .await
            .map_err(RevisionError::Checkout)?;

        let fingerprint = fingerprint_dir(self.repo.working_copy())?;
        if fingerprint != *target {
            return Ok(None);
        }

        let timestamp = self
            .repo
            .timestamp(&revision.id)
            .await
            .map_err(RevisionError::Timestamp)?;

        Ok(Some(timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    type Tree = Vec<(&'static str, &'static str)>;

    #[derive(Default)]
    struct FakeRepository {
        commits: Vec<String>,
        tags: Vec<String>,
        trees: HashMap<String, Tree>,
        broken_checkouts: HashSet<String>,
        broken_timestamps: HashSet<String>,
        vanishing_checkouts: HashSet<String>,
        listing_fails: bool,
        checked_out: Mutex<Vec<String>>,
        dir: Option<TempDir>,
    }

    impl FakeRepository {
        fn new() -> Self {
            Self {
                dir: Some(TempDir::new().unwrap()),
                ..Default::default()
            }
        }

        fn commit(mut self, id: &str, tree: Tree) -> Self {
            self.commits.push(id.to_string());
            self.trees.insert(id.to_string(), tree);
            self
        }

        fn tag(mut self, name: &str, tree: Tree) -> Self {
            self.tags.push(name.to_string());
            self.trees.insert(name.to_string(), tree);
            self
        }

        fn checked_out(&self) -> Vec<String> {
            self.checked_out.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RepositoryProvider for FakeRepository {
        fn working_copy(&self) -> &Path {
            self.dir.as_ref().unwrap().path()
        }

        async fn list_commits(&self) -> Result<Vec<String>, RepoError> {
            if self.listing_fails {
                return Err(RepoError::List {
                    what: "commits",
                    message: "not a git repository".to_string(),
                });
            }
            Ok(self.commits.clone())
        }

        async fn list_tags(&self) -> Result<Vec<String>, RepoError> {
            if self.listing_fails {
                return Err(RepoError::List {
                    what: "tags",
                    message: "not a git repository".to_string(),
                });
            }
            Ok(self.tags.clone())
        }

        async fn checkout(&self, revision: &str) -> Result<(), RepoError> {
            self.checked_out.lock().unwrap().push(revision.to_string());
            if self.broken_checkouts.contains(revision) {
                return Err(RepoError::Checkout {
                    revision: revision.to_string(),
                    message: "unable to unpack tree".to_string(),
                });
            }
            let tree = self.trees.get(revision).ok_or_else(|| RepoError::Checkout {
                revision: revision.to_string(),
                message: "unknown revision".to_string(),
            })?;

            let root = self.working_copy();
            fs::create_dir_all(root).unwrap();
            for entry in fs::read_dir(root).unwrap() {
                let path = entry.unwrap().path();
                if path.file_name().is_some_and(|n| n == ".git") {
                    continue;
                }
                if path.is_dir() {
                    fs::remove_dir_all(path).unwrap();
                } else {
                    fs::remove_file(path).unwrap();
                }
            }
            // bookkeeping that differs per revision must not affect the hash
            fs::create_dir_all(root.join(".git")).unwrap();
            fs::write(root.join(".git/HEAD"), revision).unwrap();

            for (rel, content) in tree {
                let path = root.join(rel);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, content).unwrap();
            }
            if self.vanishing_checkouts.contains(revision) {
                fs::remove_dir_all(root).unwrap();
            }
            Ok(())
        }

        async fn timestamp(&self, revision: &str) -> Result<String, RepoError> {
            if self.broken_timestamps.contains(revision) {
                return Err(RepoError::Timestamp {
                    revision: revision.to_string(),
                    message: "bad object".to_string(),
                });
            }
            Ok(format!("2024-01-01 00:00:00 +0000 ({})", revision))
        }
    }

    fn target_for(tree: Tree) -> (TempDir, Fingerprint) {
        let dir = TempDir::new().unwrap();
        for (rel, content) in tree {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let fp = fingerprint_dir(dir.path()).unwrap();
        (dir, fp)
    }

    fn local_tree() -> Tree {
        vec![(".gitignore", "*.log\n"), ("a.txt", "hello")]
    }

    #[tokio::test]
    async fn test_ignored_file_in_revision_still_matches() {
        let (_local, target) = target_for(local_tree());
        let repo = Arc::new(FakeRepository::new().commit(
            "c1",
            vec![(".gitignore", "*.log\n"), ("a.txt", "hello"), ("debug.log", "x")],
        ));

        let report = HistoryScanner::new(repo).scan_commits(&target).await.unwrap();

        assert_eq!(report.result.revision(), Some(&Revision::commit("c1")));
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_trailing_space_does_not_match() {
        let (_local, target) = target_for(local_tree());
        let repo = Arc::new(
            FakeRepository::new().commit("c1", vec![(".gitignore", "*.log\n"), ("a.txt", "hello ")]),
        );

        let report = HistoryScanner::new(repo).scan_commits(&target).await.unwrap();

        assert_eq!(report.result, MatchResult::NoMatch);
        assert_eq!(report.examined, 1);
    }

    #[tokio::test]
    async fn test_single_commit_history() {
        let (_local, target) = target_for(local_tree());
        let repo = Arc::new(FakeRepository::new().commit("root", local_tree()));

        let report = HistoryScanner::new(repo).scan_commits(&target).await.unwrap();

        match report.result {
            MatchResult::Matched {
                revision,
                timestamp,
            } => {
                assert_eq!(revision.id, "root");
                assert_eq!(revision.kind, ScanKind::Commits);
                assert!(timestamp.contains("root"));
            }
            MatchResult::NoMatch => panic!("expected a match"),
        }
    }

    #[tokio::test]
    async fn test_first_match_wins_and_scan_stops() {
        let (_local, target) = target_for(local_tree());
        let repo = Arc::new(
            FakeRepository::new()
                .commit("newest", vec![("a.txt", "changed")])
                .commit("middle", local_tree())
                .commit("oldest", local_tree()),
        );

        let report = HistoryScanner::new(repo.clone())
            .scan_commits(&target)
            .await
            .unwrap();

        assert_eq!(report.result.revision(), Some(&Revision::commit("middle")));
        assert_eq!(report.examined, 2);
        assert_eq!(repo.checked_out(), vec!["newest", "middle"]);
    }

    #[tokio::test]
    async fn test_checkout_failure_does_not_hide_later_match() {
        let (_local, target) = target_for(local_tree());
        let mut repo = FakeRepository::new()
            .commit("broken", local_tree())
            .commit("good", local_tree());
        repo.broken_checkouts.insert("broken".to_string());
        let repo = Arc::new(repo);

        let report = HistoryScanner::new(repo).scan_commits(&target).await.unwrap();

        assert_eq!(report.result.revision(), Some(&Revision::commit("good")));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].revision.id, "broken");
        assert!(report.failures[0].error.contains("unable to unpack tree"));
    }

    #[tokio::test]
    async fn test_timestamp_failure_skips_revision() {
        let (_local, target) = target_for(local_tree());
        let mut repo = FakeRepository::new()
            .commit("undated", local_tree())
            .commit("dated", local_tree());
        repo.broken_timestamps.insert("undated".to_string());
        let repo = Arc::new(repo);

        let report = HistoryScanner::new(repo).scan_commits(&target).await.unwrap();

        assert_eq!(report.result.revision(), Some(&Revision::commit("dated")));
        assert_eq!(report.failures.len(), 1);
    }

    #[tokio::test]
    async fn test_fingerprint_failure_does_not_hide_later_match() {
        let (_local, target) = target_for(local_tree());
        let mut repo = FakeRepository::new()
            .commit("vanished", local_tree())
            .commit("intact", local_tree());
        repo.vanishing_checkouts.insert("vanished".to_string());
        let repo = Arc::new(repo);

        let report = HistoryScanner::new(repo).scan_commits(&target).await.unwrap();

        assert_eq!(report.result.revision(), Some(&Revision::commit("intact")));
        assert_eq!(report.examined, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].revision.id, "vanished");
        assert!(report.failures[0].error.starts_with("Fingerprint failed"));
    }

    #[test]
    fn test_fingerprint_error_converts_to_revision_error() {
        let err: RevisionError =
            FingerprintError::NotADirectory(std::path::PathBuf::from("/gone")).into();

        assert!(matches!(err, RevisionError::Fingerprint(_)));
        assert!(err.to_string().contains("Not a directory"));
    }

    #[tokio::test]
    async fn test_tag_scan_skips_blank_names() {
        let (_local, target) = target_for(local_tree());
        let mut repo = FakeRepository::new()
            .tag("v0.1.0", vec![("a.txt", "old")])
            .tag("v1.0.0", local_tree());
        repo.tags.insert(1, String::new());
        repo.tags.push("   ".to_string());
        let repo = Arc::new(repo);

        let report = HistoryScanner::new(repo.clone())
            .scan(ScanKind::Tags, &target)
            .await
            .unwrap();

        assert_eq!(report.result.revision(), Some(&Revision::tag("v1.0.0")));
        assert!(report.failures.is_empty());
        assert_eq!(repo.checked_out(), vec!["v0.1.0", "v1.0.0"]);
    }

    #[tokio::test]
    async fn test_no_match_examines_everything() {
        let (_local, target) = target_for(local_tree());
        let repo = Arc::new(
            FakeRepository::new()
                .tag("v1", vec![("a.txt", "one")])
                .tag("v2", vec![("a.txt", "two")]),
        );

        let report = HistoryScanner::new(repo).scan_tags(&target).await.unwrap();

        assert_eq!(report.kind, ScanKind::Tags);
        assert_eq!(report.result, MatchResult::NoMatch);
        assert_eq!(report.examined, 2);
    }

    #[tokio::test]
    async fn test_enumeration_failure_is_fatal() {
        let (_local, target) = target_for(local_tree());
        let repo = Arc::new(FakeRepository {
            listing_fails: true,
            ..FakeRepository::new()
        });

        let result = HistoryScanner::new(repo).scan_commits(&target).await;

        assert!(matches!(
            result,
            Err(ScanError::Enumerate {
                kind: ScanKind::Commits,
                ..
            })
        ));
    }
}
