//! Show command: print the stored digests.

use anyhow::Result;
use bootsum_core::fs::HostFs;
use bootsum_core::Verifier;

use super::load_stored_table;
use crate::layout::BootLayout;

pub fn run_show(layout: &BootLayout) -> Result<()> {
    let mut fs = HostFs::new();
    let table_path = layout.checksums_path();
    let table = load_stored_table(&mut Verifier::new(&mut fs), &table_path)?;

    println!("{}", table_path.display());
    for (id, digest) in table.iter() {
        let shown = if digest.is_zero() {
            "(unsealed)".to_string()
        } else {
            digest.to_string()
        };
        println!("{:<64}  {}", shown, id.file_name());
    }
    Ok(())
}
