//! CLI command handlers, one file per subcommand.

mod checksum;
mod completions;
mod seal;
mod show;
mod verify;

pub use checksum::run_checksum;
pub use completions::run_completions;
pub use seal::run_seal;
pub use show::run_show;
pub use verify::run_verify;

use anyhow::{bail, Context, Result};
use bootsum_core::{ChecksumTable, FileAccess, Verifier, VerifyError};
use std::path::Path;

use crate::layout::utf8;

/// Load the persisted table, turning "not there yet" into a hint to seal first.
fn load_stored_table<F: FileAccess>(
    verifier: &mut Verifier<'_, F>,
    table_path: &Path,
) -> Result<ChecksumTable> {
    match verifier.load_table(utf8(table_path)?) {
        Ok(table) => Ok(table),
        Err(VerifyError::Io(e)) if e.is_not_found() => bail!(
            "no checksum table at {} (run `bootsum seal` first)",
            table_path.display()
        ),
        Err(e) => Err(e).with_context(|| format!("load checksum table {}", table_path.display())),
    }
}
