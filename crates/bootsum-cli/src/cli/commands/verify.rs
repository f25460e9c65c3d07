//! Verify command: check the boot images against `checksums.dat`.

use anyhow::{bail, Result};
use bootsum_core::fs::HostFs;
use bootsum_core::{ArtifactId, Verdict, Verifier, VerifyError};

use super::load_stored_table;
use crate::layout::BootLayout;

fn status_label(outcome: &Result<Verdict, VerifyError>) -> &'static str {
    match outcome {
        Ok(Verdict::Match) => "ok",
        Ok(Verdict::Mismatch) => "MISMATCH",
        Ok(Verdict::Absent) => "unsealed",
        Err(_) => "ERROR",
    }
}

pub fn run_verify(layout: &BootLayout, artifact: Option<ArtifactId>) -> Result<()> {
    let mut host = HostFs::new();
    let mut verifier = Verifier::new(&mut host);
    let table = load_stored_table(&mut verifier, &layout.checksums_path())?;
    let paths = layout.artifact_paths()?;

    let outcomes: Vec<(ArtifactId, Result<Verdict, VerifyError>)> = match artifact {
        Some(id) => vec![(id, verifier.verify(id, &paths[id.index()], &table))],
        None => verifier
            .verify_all(&table, |id| paths[id.index()].as_str())
            .iter()
            .collect(),
    };

    let mut failed = 0usize;
    for (id, outcome) in &outcomes {
        let path = &paths[id.index()];
        match outcome {
            Ok(Verdict::Match) => tracing::info!(artifact = %id, %path, "checksum valid"),
            Ok(Verdict::Mismatch) => tracing::warn!(artifact = %id, %path, "checksum mismatch"),
            Ok(Verdict::Absent) => tracing::warn!(artifact = %id, %path, "artifact never sealed"),
            Err(e) => tracing::error!(artifact = %id, %path, error = %e, "cannot verify"),
        }
        let detail = match outcome {
            Err(e) => format!("{path}: {e}"),
            Ok(_) => path.clone(),
        };
        println!("{:<9} {:<11} {}", status_label(outcome), id.file_name(), detail);
        if !matches!(outcome, Ok(Verdict::Match)) {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!(
            "checksum verification failed for {} of {} artifact(s)",
            failed,
            outcomes.len()
        );
    }
    println!("all checksums valid");
    Ok(())
}
