use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_efi_boot_path() -> PathBuf {
    PathBuf::from("EFI").join("BOOT")
}

fn default_src_path() -> PathBuf {
    PathBuf::from("src")
}

fn default_checksum_file() -> String {
    bootsum_core::CHECKSUMS_FILE_NAME.to_string()
}

/// Global configuration loaded from `~/.config/bootsum/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootsumConfig {
    /// Installed boot directory holding the images and the checksum table.
    #[serde(default = "default_efi_boot_path")]
    pub efi_boot_path: PathBuf,
    /// Development tree searched first for each boot image.
    #[serde(default = "default_src_path")]
    pub src_path: PathBuf,
    /// File name of the checksum table inside `efi_boot_path`.
    #[serde(default = "default_checksum_file")]
    pub checksum_file: String,
}

impl Default for BootsumConfig {
    fn default() -> Self {
        Self {
            efi_boot_path: default_efi_boot_path(),
            src_path: default_src_path(),
            checksum_file: default_checksum_file(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bootsum")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BootsumConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

pub fn load_or_init_at(path: &Path) -> Result<BootsumConfig> {
    if !path.exists() {
        let default_cfg = BootsumConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: BootsumConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
