//! Fingerprint command - print the content hash of a directory

use anyhow::{Context, Result};
use gitmatch_domain::usecases::fingerprint_dir;

use crate::args::FingerprintArgs;

pub async fn execute(args: FingerprintArgs) -> Result<()> {
    let fingerprint = fingerprint_dir(&args.dir)
        .with_context(|| format!("Failed to hash directory {}", args.dir.display()))?;

    println!("{}", fingerprint);

    Ok(())
}
