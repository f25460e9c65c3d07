//! Checksum command: compute SHA-256 of a file.

use anyhow::{Context, Result};
use bootsum_core::fs::HostFs;
use bootsum_core::Verifier;
use std::path::Path;

use crate::layout::utf8;

/// Compute and print SHA-256 of the given file.
pub fn run_checksum(path: &Path) -> Result<()> {
    let mut fs = HostFs::new();
    let digest = Verifier::new(&mut fs)
        .digest_file(utf8(path)?)
        .with_context(|| format!("checksum {}", path.display()))?;
    println!("{}  {}", digest, path.display());
    Ok(())
}
