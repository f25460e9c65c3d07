//! Seal command: digest the boot images and write `checksums.dat`.
//!
//! Sealing the whole set starts from an empty table and writes nothing
//! unless every image could be read. Resealing one artifact needs an
//! existing, well-formed table; a partly zero table is never persisted.

use anyhow::{bail, Context, Result};
use bootsum_core::fs::HostFs;
use bootsum_core::{ArtifactId, ChecksumTable, SealError, Verifier, VerifyError};
use std::fs;

use crate::layout::{utf8, BootLayout};

pub fn run_seal(layout: &BootLayout, artifact: Option<ArtifactId>) -> Result<()> {
    let mut host = HostFs::new();
    let mut verifier = Verifier::new(&mut host);
    let table_path = layout.checksums_path();
    let paths = layout.artifact_paths()?;

    let (table, sealed): (ChecksumTable, Vec<ArtifactId>) = match artifact {
        None => {
            let table = verifier
                .seal_all(ChecksumTable::zeroed(), |id| paths[id.index()].as_str())
                .map_err(|err| match err {
                    SealError::Artifact { artifact, source } => anyhow::Error::new(source)
                        .context(format!(
                            "failed to update checksums: {} ({}) not found or inaccessible",
                            artifact.description(),
                            paths[artifact.index()]
                        )),
                    other => other.into(),
                })?;
            (table, ArtifactId::ALL.to_vec())
        }
        Some(id) => {
            let base = match verifier.load_table(utf8(&table_path)?) {
                Ok(table) => table,
                Err(VerifyError::Io(e)) if e.is_not_found() => {
                    bail!(
                        "no checksum table at {} (run `bootsum seal` without --artifact first)",
                        table_path.display()
                    )
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("refusing to reseal over {}", table_path.display())
                    })
                }
            };
            let table = verifier
                .seal(id, &paths[id.index()], base)
                .with_context(|| format!("seal {} ({})", id.description(), paths[id.index()]))?;
            (table, vec![id])
        }
    };

    for id in sealed {
        let digest = table.get(id);
        tracing::info!(artifact = %id, path = %paths[id.index()], %digest, "sealed");
        println!("sealed  {:<20} {}", id.description(), digest);
    }

    fs::create_dir_all(&layout.boot_dir)
        .with_context(|| format!("create dir: {}", layout.boot_dir.display()))?;
    verifier
        .save_table(utf8(&table_path)?, &table)
        .with_context(|| format!("write checksum table {}", table_path.display()))?;
    tracing::info!(path = %table_path.display(), "checksum table written");
    println!("checksums written to {}", table_path.display());
    Ok(())
}
