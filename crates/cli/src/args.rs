//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gitmatch: find the commit or tag of a remote repository that matches a local directory
#[derive(Parser, Debug)]
#[command(name = "gitmatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a repository's history for a revision matching a local directory
    Find(FindArgs),

    /// Print the content fingerprint of a directory
    Fingerprint(FingerprintArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Compare with commits (default: commits and tags)
    #[arg(long)]
    pub commits: bool,

    /// Compare with tags (default: commits and tags)
    #[arg(long)]
    pub tags: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Directory to clone into (overrides workspace.root)
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Keep the scratch clone after the scan
    #[arg(long)]
    pub keep_workspace: bool,

    /// Repository URL, optionally pinned to a branch as <url>#<branch>
    pub repository: String,

    /// Local directory to identify
    pub local_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct FingerprintArgs {
    /// Directory to fingerprint
    pub dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./gitmatch.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
