//! File-access capability consumed by the verifier.
//!
//! The boot loader implements [`FileAccess`] over the firmware's simple file
//! system protocol; host tools use [`HostFs`] (feature `std`). The core only
//! ever calls these synchronously and maps any failure to [`IoError`].

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    /// Create the file if needed and discard existing contents.
    CreateTruncate,
}

/// Failure class reported by the platform's file services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStatus {
    NotFound,
    AccessDenied,
    DeviceError,
    VolumeFull,
    /// Platform-specific status code with no closer mapping.
    Other(usize),
}

impl fmt::Display for IoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoStatus::NotFound => f.write_str("not found"),
            IoStatus::AccessDenied => f.write_str("access denied"),
            IoStatus::DeviceError => f.write_str("device error"),
            IoStatus::VolumeFull => f.write_str("volume full"),
            IoStatus::Other(code) => write!(f, "status {code:#x}"),
        }
    }
}

/// Which step of a file operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Read,
    Write,
    /// Write accepted zero bytes before the buffer was drained.
    ShortWrite,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoOp::Open => "open",
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::ShortWrite => "short write",
        })
    }
}

/// Environment fault while touching a file. Not a security event by itself,
/// but never treated as a successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{op} failed: {status}")]
pub struct IoError {
    pub op: IoOp,
    pub status: IoStatus,
}

impl IoError {
    pub const fn new(op: IoOp, status: IoStatus) -> Self {
        Self { op, status }
    }

    pub fn is_not_found(&self) -> bool {
        self.op == IoOp::Open && self.status == IoStatus::NotFound
    }
}

/// Minimal open/read/write/close surface of the platform's file services.
pub trait FileAccess {
    type Handle;

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<Self::Handle, IoStatus>;

    /// Fill as much of `buf` as is available; `Ok(0)` means end of file.
    fn read(&mut self, handle: &mut Self::Handle, buf: &mut [u8]) -> Result<usize, IoStatus>;

    /// Write some prefix of `bytes`, returning how many were accepted.
    fn write(&mut self, handle: &mut Self::Handle, bytes: &[u8]) -> Result<usize, IoStatus>;

    fn close(&mut self, handle: Self::Handle);
}

#[cfg(feature = "std")]
pub use host::{HostFs, HostHandle};

#[cfg(feature = "std")]
mod host {
    use std::fs::File;
    use std::io::{self, Read, Write};
    use std::path::PathBuf;

    use super::{FileAccess, IoStatus, OpenMode};

    /// [`FileAccess`] over the host file system.
    ///
    /// Without a root, paths are used as given. With [`HostFs::rooted`],
    /// firmware-style paths (`\EFI\BOOT\boot1.png`) resolve beneath a
    /// mounted or staged EFI system partition.
    #[derive(Debug, Clone, Default)]
    pub struct HostFs {
        root: Option<PathBuf>,
    }

    impl HostFs {
        pub fn new() -> Self {
            Self { root: None }
        }

        pub fn rooted(root: impl Into<PathBuf>) -> Self {
            Self {
                root: Some(root.into()),
            }
        }

        /// Host path that `path` refers to.
        pub fn resolve(&self, path: &str) -> PathBuf {
            match &self.root {
                None => PathBuf::from(path),
                Some(root) => path
                    .split(['\\', '/'])
                    .filter(|c| !c.is_empty())
                    .fold(root.clone(), |acc, c| acc.join(c)),
            }
        }

        /// Whether `path` exists on the host (after root resolution).
        pub fn exists(&self, path: &str) -> bool {
            self.resolve(path).exists()
        }
    }

    fn status_of(err: &io::Error) -> IoStatus {
        match err.kind() {
            io::ErrorKind::NotFound => IoStatus::NotFound,
            io::ErrorKind::PermissionDenied => IoStatus::AccessDenied,
            io::ErrorKind::WriteZero => IoStatus::VolumeFull,
            _ => match err.raw_os_error() {
                Some(code) => IoStatus::Other(code as usize),
                None => IoStatus::DeviceError,
            },
        }
    }

    /// Open host file plus whether it was opened for writing.
    #[derive(Debug)]
    pub struct HostHandle {
        file: File,
        writable: bool,
    }

    impl FileAccess for HostFs {
        type Handle = HostHandle;

        fn open(&mut self, path: &str, mode: OpenMode) -> Result<HostHandle, IoStatus> {
            let host_path = self.resolve(path);
            let result = match mode {
                OpenMode::Read => File::open(&host_path),
                OpenMode::CreateTruncate => File::options()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&host_path),
            };
            match result {
                Ok(file) => {
                    tracing::debug!(path = %host_path.display(), ?mode, "opened");
                    Ok(HostHandle {
                        file,
                        writable: mode == OpenMode::CreateTruncate,
                    })
                }
                Err(e) => {
                    tracing::debug!(path = %host_path.display(), ?mode, error = %e, "open failed");
                    Err(status_of(&e))
                }
            }
        }

        fn read(&mut self, handle: &mut HostHandle, buf: &mut [u8]) -> Result<usize, IoStatus> {
            loop {
                match handle.file.read(buf) {
                    Ok(n) => return Ok(n),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(status_of(&e)),
                }
            }
        }

        fn write(&mut self, handle: &mut HostHandle, bytes: &[u8]) -> Result<usize, IoStatus> {
            if !handle.writable {
                return Err(IoStatus::AccessDenied);
            }
            let n = handle.file.write(bytes).map_err(|e| status_of(&e))?;
            // Sync once the caller's buffer is drained; a failed sync is a
            // failed write.
            if n == bytes.len() {
                handle.file.sync_all().map_err(|e| {
                    tracing::warn!(error = %e, "sync after write failed");
                    status_of(&e)
                })?;
            }
            Ok(n)
        }

        fn close(&mut self, handle: HostHandle) {
            drop(handle);
        }
    }

}
