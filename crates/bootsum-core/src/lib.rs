//! Boot image integrity: a persisted table of SHA-256 digests for the fixed
//! set of boot artifacts, and the logic to check live files against it.
//!
//! The crate builds without `std` so the same code runs inside the boot
//! loader. Nothing here allocates; every buffer lives on the stack or is
//! supplied by the caller. File access goes through [`fs::FileAccess`],
//! which the firmware (or, with the `std` feature, [`fs::HostFs`]) provides.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

pub mod artifact;
pub mod digest;
pub mod fs;
pub mod store;
pub mod verifier;

pub use artifact::{ArtifactId, UnknownArtifact};
pub use digest::{compute, DigestValue, Hasher, DIGEST_LEN};
pub use fs::{FileAccess, IoError, IoOp, IoStatus, OpenMode};
pub use store::{load_table, save_table, ChecksumTable, FormatError, TABLE_LEN};
pub use verifier::{Report, SealError, Verdict, Verifier, VerifyError};

/// Directory on the EFI system partition holding the boot images.
pub const BOOT_DIR: &str = "\\EFI\\BOOT";

/// Firmware path of the persisted checksum table.
pub const CHECKSUMS_PATH: &str = "\\EFI\\BOOT\\checksums.dat";

/// File name of the persisted checksum table.
pub const CHECKSUMS_FILE_NAME: &str = "checksums.dat";
