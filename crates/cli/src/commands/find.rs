//! Find command - clone a repository and scan its history for the local tree

use anyhow::{Context, Result};
use gitmatch_adapters::{git::GitCli, workspace::ScratchWorkspace};
use gitmatch_domain::{
    MatchResult, RepoLocator, ScanKind, ScanReport,
    usecases::{HistoryScanner, fingerprint_dir},
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::FindArgs;
use crate::config::AppConfig;

pub async fn execute(args: FindArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let locator = RepoLocator::parse(&args.repository);
    let kinds = ScanKind::selected(args.commits, args.tags);

    let target = fingerprint_dir(&args.local_dir).with_context(|| {
        format!(
            "Failed to hash local directory {}",
            args.local_dir.display()
        )
    })?;

    tracing::info!(
        local_dir = %args.local_dir.display(),
        fingerprint = %target,
        kinds = ?kinds,
        "Hashed local directory"
    );

    let workspace_root = args.workspace.as_deref().or(config.workspace.root.as_deref());
    let keep = args.keep_workspace || config.workspace.keep;
    let workspace = ScratchWorkspace::create(workspace_root, &locator.repo_name(), keep)
        .context("Failed to prepare workspace")?;

    let git = GitCli::new(config.git.binary.as_str());
    let repo = git
        .clone_repository(&locator, workspace.clone_dir())
        .await
        .context("Error cloning repo")?;

    let scanner = HistoryScanner::new(Arc::new(repo));

    let mut reports = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let report = scanner.scan(kind, &target).await?;
        if !args.json {
            print_report(&report);
        }
        reports.push(report);
    }

    if args.json {
        let output = serde_json::json!({
            "repository": locator.url,
            "branch": locator.branch,
            "local_dir": args.local_dir.display().to_string(),
            "fingerprint": target,
            "scans": reports.iter().map(report_json).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

fn print_report(report: &ScanReport) {
    if let MatchResult::Matched {
        revision,
        timestamp,
    } = &report.result
    {
        println!(
            "Found matching {}: {} Date: {}",
            report.kind.noun(),
            revision.id,
            timestamp
        );
    }
}

fn report_json(report: &ScanReport) -> serde_json::Value {
    let (revision, timestamp) = match &report.result {
        MatchResult::Matched {
            revision,
            timestamp,
        } => (Some(revision.id.as_str()), Some(timestamp.as_str())),
        MatchResult::NoMatch => (None, None),
    };

    serde_json::json!({
        "kind": report.kind,
        "matched": report.result.is_match(),
        "revision": revision,
        "timestamp": timestamp,
        "examined": report.examined,
        "failures": report.failures,
    })
}
