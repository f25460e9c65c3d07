//! The closed set of protected boot artifacts.
//!
//! Declaration order is the on-disk slot order in `checksums.dat`; never
//! reorder variants without moving to a new table layout.

use core::fmt;
use core::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactId {
    /// Kernel boot logo (`boot1.png`).
    Boot1Image,
    /// Setup mode logo (`boot2.png`).
    Boot2Image,
    /// Boot configuration file (`config.cfg`).
    ConfigFile,
}

impl ArtifactId {
    /// Every artifact, in table slot order.
    pub const ALL: [ArtifactId; 3] = [
        ArtifactId::Boot1Image,
        ArtifactId::Boot2Image,
        ArtifactId::ConfigFile,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Slot position in the checksum table.
    pub const fn index(self) -> usize {
        match self {
            ArtifactId::Boot1Image => 0,
            ArtifactId::Boot2Image => 1,
            ArtifactId::ConfigFile => 2,
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            ArtifactId::Boot1Image => "boot1.png",
            ArtifactId::Boot2Image => "boot2.png",
            ArtifactId::ConfigFile => "config.cfg",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ArtifactId::Boot1Image => "Kernel boot logo",
            ArtifactId::Boot2Image => "Setup mode logo",
            ArtifactId::ConfigFile => "Configuration file",
        }
    }

    /// Path of the artifact on the EFI system partition.
    pub const fn boot_path(self) -> &'static str {
        match self {
            ArtifactId::Boot1Image => "\\EFI\\BOOT\\boot1.png",
            ArtifactId::Boot2Image => "\\EFI\\BOOT\\boot2.png",
            ArtifactId::ConfigFile => "\\EFI\\BOOT\\config.cfg",
        }
    }

    /// Kebab-case name used on the command line and in logs.
    pub const fn name(self) -> &'static str {
        match self {
            ArtifactId::Boot1Image => "boot1-image",
            ArtifactId::Boot2Image => "boot2-image",
            ArtifactId::ConfigFile => "config-file",
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name did not match any known artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown boot artifact (expected boot1-image, boot2-image or config-file)")]
pub struct UnknownArtifact;

impl FromStr for ArtifactId {
    type Err = UnknownArtifact;

    /// Accepts the kebab-case name or the file name, ASCII case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ArtifactId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s) || id.file_name().eq_ignore_ascii_case(s))
            .ok_or(UnknownArtifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_declaration_order() {
        for (i, id) in ArtifactId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
        assert_eq!(ArtifactId::COUNT, 3);
    }

    #[test]
    fn parse_names_and_file_names() {
        assert_eq!("boot1-image".parse::<ArtifactId>(), Ok(ArtifactId::Boot1Image));
        assert_eq!("BOOT2.PNG".parse::<ArtifactId>(), Ok(ArtifactId::Boot2Image));
        assert_eq!(" config.cfg ".parse::<ArtifactId>(), Ok(ArtifactId::ConfigFile));
        assert_eq!("kernel".parse::<ArtifactId>(), Err(UnknownArtifact));
        assert_eq!("".parse::<ArtifactId>(), Err(UnknownArtifact));
    }

    #[test]
    fn boot_paths_live_under_efi_boot() {
        for id in ArtifactId::ALL {
            assert!(id.boot_path().starts_with(crate::BOOT_DIR));
            assert!(id.boot_path().ends_with(id.file_name()));
        }
    }
}
