//! Doctor command - validate configuration and show status

use anyhow::Result;
use gitmatch_adapters::git::GitCli;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    git: CheckResult,
    workspace: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        git: CheckResult::error("Not checked"),
        workspace: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    match AppConfig::load(config_path.as_deref()) {
        Ok(config) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            report.git = check_git(&config.git.binary).await;
            report.workspace = check_workspace(config.workspace.root.as_deref());
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
        }
    }

    let checks = [&report.config, &report.git, &report.workspace];
    report.overall = if checks.iter().any(|c| c.is_error()) {
        "error".to_string()
    } else if checks.iter().all(|c| c.is_ok()) {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

async fn check_git(binary: &str) -> CheckResult {
    if binary.trim().is_empty() {
        return CheckResult::error("git binary is empty");
    }

    match GitCli::new(binary).version().await {
        Ok(version) => CheckResult::ok(format!("{} ({})", version, binary)),
        Err(e) => CheckResult::error(e.to_string()),
    }
}

fn check_workspace(root: Option<&Path>) -> CheckResult {
    let Some(root) = root else {
        return CheckResult::ok(format!(
            "Temporary directory under {}",
            std::env::temp_dir().display()
        ));
    };

    if root.is_dir() {
        CheckResult::ok(format!("Workspace root: {}", root.display()))
    } else if root.exists() {
        CheckResult::error(format!(
            "Workspace root is not a directory: {}",
            root.display()
        ))
    } else {
        CheckResult::warn(format!(
            "Workspace root does not exist yet and will be created: {}",
            root.display()
        ))
    }
}

fn print_report(report: &DoctorReport) {
    println!("gitmatch Doctor Report");
    println!("======================");
    println!();

    print_check("Config", &report.config);
    print_check("Git", &report.git);
    print_check("Workspace", &report.workspace);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
