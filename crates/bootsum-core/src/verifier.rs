//! Verification and sealing of boot artifacts against the checksum table.
//!
//! Per call: read baseline, read live file, compute, compare. Only the two
//! read steps touch the file-access capability, and their failures are
//! always returned to the caller; nothing here falls back to success.

use crate::artifact::ArtifactId;
use crate::digest::{DigestValue, Hasher};
use crate::fs::{FileAccess, IoError, IoOp, IoStatus, OpenMode};
use crate::store::{ChecksumTable, FormatError, TABLE_LEN};
use crate::CHECKSUMS_PATH;

/// Stack buffer size for streaming file contents into the hasher.
pub const READ_CHUNK: usize = 4096;

/// Outcome of comparing a live file against its baseline entry.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Live digest equals the stored digest.
    Match,
    /// Live digest differs: tampering or corruption.
    Mismatch,
    /// Baseline slot holds the zero sentinel; the artifact was never sealed.
    Absent,
}

impl Verdict {
    pub fn is_match(self) -> bool {
        self == Verdict::Match
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SealError {
    /// Sealing stopped at `artifact`; no table is returned.
    #[error("sealing {artifact}: {source}")]
    Artifact {
        artifact: ArtifactId,
        #[source]
        source: IoError,
    },
    #[error("writing checksum table: {0}")]
    Persist(#[source] IoError),
}

/// One verification outcome per artifact, in table slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    outcomes: [Result<Verdict, VerifyError>; ArtifactId::COUNT],
}

impl Report {
    pub fn get(&self, id: ArtifactId) -> Result<Verdict, VerifyError> {
        self.outcomes[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArtifactId, Result<Verdict, VerifyError>)> + '_ {
        ArtifactId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }

    /// True only when every artifact verified as [`Verdict::Match`].
    pub fn all_match(&self) -> bool {
        self.outcomes.iter().all(|o| matches!(o, Ok(Verdict::Match)))
    }

    /// True when at least one artifact shows a digest mismatch.
    pub fn any_mismatch(&self) -> bool {
        self.outcomes.iter().any(|o| matches!(o, Ok(Verdict::Mismatch)))
    }
}

fn compare(stored: &DigestValue, live: &DigestValue) -> Verdict {
    if stored.is_zero() {
        Verdict::Absent
    } else if stored == live {
        Verdict::Match
    } else {
        Verdict::Mismatch
    }
}

/// A verification session over a borrowed file-access capability.
///
/// Tables are passed in and returned by value; the verifier keeps no state
/// between calls, so each session decides when to load and persist.
pub struct Verifier<'fs, F: FileAccess> {
    fs: &'fs mut F,
}

impl<'fs, F: FileAccess> Verifier<'fs, F> {
    pub fn new(fs: &'fs mut F) -> Self {
        Self { fs }
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<F::Handle, IoError> {
        self.fs
            .open(path, mode)
            .map_err(|s| IoError::new(IoOp::Open, s))
    }

    /// Read up to `buf.len()` bytes, stopping early only at end of file.
    fn read_full(&mut self, handle: &mut F::Handle, buf: &mut [u8]) -> Result<usize, IoError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self
                .fs
                .read(handle, &mut buf[filled..])
                .map_err(|s| IoError::new(IoOp::Read, s))?;
            if n == 0 {
                break;
            }
            if n > buf.len() - filled {
                return Err(IoError::new(IoOp::Read, IoStatus::DeviceError));
            }
            filled += n;
        }
        Ok(filled)
    }

    /// Stream the whole file at `path` through the digest engine.
    pub fn digest_file(&mut self, path: &str) -> Result<DigestValue, IoError> {
        let mut handle = self.open(path, OpenMode::Read)?;
        let mut hasher = Hasher::new();
        let mut buf = [0u8; READ_CHUNK];
        let result = loop {
            match self.read_full(&mut handle, &mut buf) {
                Ok(0) => break Ok(hasher.finalize()),
                Ok(n) => hasher.update(&buf[..n]),
                Err(e) => break Err(e),
            }
        };
        self.fs.close(handle);
        result
    }

    /// Compare the file at `path` against the baseline entry for `id`.
    ///
    /// The live file is read before the baseline slot is inspected, so an
    /// unreadable file is an error even when the slot is unsealed.
    pub fn verify(
        &mut self,
        id: ArtifactId,
        path: &str,
        table: &ChecksumTable,
    ) -> Result<Verdict, VerifyError> {
        let live = self.digest_file(path)?;
        Ok(compare(&table.get(id), &live))
    }

    /// Like [`Verifier::verify`], decoding the baseline from raw table bytes.
    pub fn verify_bytes(
        &mut self,
        id: ArtifactId,
        path: &str,
        baseline: &[u8],
    ) -> Result<Verdict, VerifyError> {
        let table = ChecksumTable::decode(baseline)?;
        self.verify(id, path, &table)
    }

    /// Record the current digest of the file at `path` as the baseline for `id`.
    ///
    /// Whether sealing is allowed at all is the caller's decision.
    pub fn seal(
        &mut self,
        id: ArtifactId,
        path: &str,
        mut table: ChecksumTable,
    ) -> Result<ChecksumTable, IoError> {
        let digest = self.digest_file(path)?;
        table.set(id, digest);
        Ok(table)
    }

    /// Read and decode the persisted table at `path`.
    pub fn load_table(&mut self, path: &str) -> Result<ChecksumTable, VerifyError> {
        let mut handle = self.open(path, OpenMode::Read)?;
        // One spare byte so an oversized file is caught as a length error.
        let mut buf = [0u8; TABLE_LEN + 1];
        let read = self.read_full(&mut handle, &mut buf);
        self.fs.close(handle);
        let n = read?;
        Ok(ChecksumTable::decode(&buf[..n])?)
    }

    /// Encode `table` and write it to `path`, replacing any previous contents.
    pub fn save_table(&mut self, path: &str, table: &ChecksumTable) -> Result<(), IoError> {
        let bytes = table.encode();
        let mut handle = self.open(path, OpenMode::CreateTruncate)?;
        let mut written = 0;
        let result = loop {
            if written == bytes.len() {
                break Ok(());
            }
            match self.fs.write(&mut handle, &bytes[written..]) {
                Ok(0) => break Err(IoError::new(IoOp::ShortWrite, IoStatus::VolumeFull)),
                Ok(n) if n > bytes.len() - written => {
                    break Err(IoError::new(IoOp::Write, IoStatus::DeviceError))
                }
                Ok(n) => written += n,
                Err(s) => break Err(IoError::new(IoOp::Write, s)),
            }
        };
        self.fs.close(handle);
        result
    }

    /// Verify every artifact, taking each one's path from `resolve`.
    pub fn verify_all<'p, R>(&mut self, table: &ChecksumTable, resolve: R) -> Report
    where
        R: Fn(ArtifactId) -> &'p str,
    {
        let outcomes = core::array::from_fn(|i| {
            let id = ArtifactId::ALL[i];
            self.verify(id, resolve(id), table)
        });
        Report { outcomes }
    }

    /// Seal every artifact into `table`. Stops at the first failure and
    /// returns no table, so a partially sealed table cannot be persisted.
    pub fn seal_all<'p, R>(
        &mut self,
        mut table: ChecksumTable,
        resolve: R,
    ) -> Result<ChecksumTable, SealError>
    where
        R: Fn(ArtifactId) -> &'p str,
    {
        for id in ArtifactId::ALL {
            table = self
                .seal(id, resolve(id), table)
                .map_err(|source| SealError::Artifact { artifact: id, source })?;
        }
        Ok(table)
    }

    /// Boot-time check: load `\EFI\BOOT\checksums.dat` and verify every
    /// artifact at its standard location.
    pub fn verify_boot_set(&mut self) -> Result<Report, VerifyError> {
        let table = self.load_table(CHECKSUMS_PATH)?;
        Ok(self.verify_all(&table, ArtifactId::boot_path))
    }

    /// Provisioning: seal every artifact at its standard location and
    /// persist the resulting table. Nothing is written if any seal fails.
    pub fn seal_boot_set(&mut self) -> Result<ChecksumTable, SealError> {
        let table = self.seal_all(ChecksumTable::zeroed(), ArtifactId::boot_path)?;
        self.save_table(CHECKSUMS_PATH, &table)
            .map_err(SealError::Persist)?;
        Ok(table)
    }
}
