//! `checksum` - hash a file the way the ledger does

use crate::checksum::{ChecksumAlgorithm, LegacyChecksum, Sha256Checksum};
use crate::Result;
use anyhow::Context;
use std::path::Path;

pub fn run(file: &Path, legacy: bool) -> Result<()> {
    let algorithm: Box<dyn ChecksumAlgorithm> = if legacy {
        Box::new(LegacyChecksum)
    } else {
        Box::new(Sha256Checksum)
    };

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    println!(
        "{}:{}  {}",
        algorithm.name(),
        algorithm.checksum(&content),
        file.display()
    );
    Ok(())
}
