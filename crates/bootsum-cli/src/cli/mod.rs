//! CLI for the bootsum checksum tool.

mod commands;

use anyhow::Result;
use bootsum_core::ArtifactId;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config;
use crate::layout::BootLayout;
use commands::{run_checksum, run_completions, run_seal, run_show, run_verify};

/// Top-level CLI for the bootsum tool.
#[derive(Debug, Parser)]
#[command(name = "bootsum")]
#[command(about = "bootsum: seal and verify boot image checksums", long_about = None)]
pub struct Cli {
    /// Installed boot directory (overrides EFI_BOOT_PATH and config).
    #[arg(long, global = true, value_name = "DIR")]
    pub boot_dir: Option<PathBuf>,

    /// Source tree searched first for boot images.
    #[arg(long, global = true, value_name = "DIR")]
    pub src_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Compute digests of the boot images and write the checksum table.
    Seal {
        /// Reseal a single artifact, keeping the other stored digests.
        #[arg(long, value_name = "ARTIFACT")]
        artifact: Option<ArtifactId>,
    },

    /// Check the boot images against the stored checksum table.
    Verify {
        /// Verify a single artifact instead of the whole boot set.
        #[arg(long, value_name = "ARTIFACT")]
        artifact: Option<ArtifactId>,
    },

    /// Print the stored digests.
    Show,

    /// Compute SHA-256 of an arbitrary file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Print a shell completion script.
    Completions {
        shell: Shell,
    },
}

fn load_layout(boot_dir: Option<PathBuf>, src_dir: Option<PathBuf>) -> Result<BootLayout> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    let layout = BootLayout::resolve(&cfg, boot_dir, src_dir);
    tracing::debug!("boot layout: {:?}", layout);
    Ok(layout)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let Cli {
            boot_dir,
            src_dir,
            command,
        } = Cli::parse();

        match command {
            CliCommand::Seal { artifact } => run_seal(&load_layout(boot_dir, src_dir)?, artifact)?,
            CliCommand::Verify { artifact } => {
                run_verify(&load_layout(boot_dir, src_dir)?, artifact)?
            }
            CliCommand::Show => run_show(&load_layout(boot_dir, src_dir)?)?,
            CliCommand::Checksum { path } => run_checksum(&path)?,
            CliCommand::Completions { shell } => run_completions(shell)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
