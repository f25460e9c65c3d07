//! Where the boot images and `checksums.dat` live on the host.
//!
//! Precedence for the boot dir: `--boot-dir`, then `EFI_BOOT_PATH`, then
//! config. Each image is looked up in the source tree first and falls back
//! to the installed boot dir.

use anyhow::{anyhow, Result};
use bootsum_core::ArtifactId;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::BootsumConfig;

pub const BOOT_PATH_ENV: &str = "EFI_BOOT_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootLayout {
    pub boot_dir: PathBuf,
    pub src_dir: PathBuf,
    pub checksum_file: String,
}

impl BootLayout {
    pub fn resolve(
        cfg: &BootsumConfig,
        boot_dir: Option<PathBuf>,
        src_dir: Option<PathBuf>,
    ) -> Self {
        Self::from_parts(cfg, boot_dir, src_dir, std::env::var_os(BOOT_PATH_ENV))
    }

    fn from_parts(
        cfg: &BootsumConfig,
        boot_dir: Option<PathBuf>,
        src_dir: Option<PathBuf>,
        env_boot_dir: Option<OsString>,
    ) -> Self {
        let boot_dir = boot_dir
            .or_else(|| env_boot_dir.filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| cfg.efi_boot_path.clone());
        Self {
            boot_dir,
            src_dir: src_dir.unwrap_or_else(|| cfg.src_path.clone()),
            checksum_file: cfg.checksum_file.clone(),
        }
    }

    pub fn checksums_path(&self) -> PathBuf {
        self.boot_dir.join(&self.checksum_file)
    }

    /// Source tree copy if present, otherwise the installed one.
    pub fn artifact_path(&self, id: ArtifactId) -> PathBuf {
        let src = self.src_dir.join(id.file_name());
        if src.exists() {
            return src;
        }
        self.boot_dir.join(id.file_name())
    }

    /// Every artifact path as UTF-8, in table slot order.
    pub fn artifact_paths(&self) -> Result<[String; ArtifactId::COUNT]> {
        let mut out: [String; ArtifactId::COUNT] = Default::default();
        for id in ArtifactId::ALL {
            out[id.index()] = utf8(&self.artifact_path(id))?.to_string();
        }
        Ok(out)
    }
}

/// The core addresses files by `&str`; reject paths that are not UTF-8.
pub fn utf8(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow!("path is not valid UTF-8: {}", path.display()))
}
