//! In-memory checksum table and its on-disk encoding.
//!
//! Layout of `checksums.dat`: one 32-byte digest per [`ArtifactId`], in
//! declaration order. No header, no length prefix, no version field; the
//! length is implied by the artifact set, so any other length is corrupt.

use crate::artifact::ArtifactId;
use crate::digest::{DigestValue, DIGEST_LEN};

/// Exact byte length of an encoded table.
pub const TABLE_LEN: usize = DIGEST_LEN * ArtifactId::COUNT;

/// Persisted table had the wrong length (corruption or layout skew).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("checksum table is {found} bytes, expected {}", TABLE_LEN)]
pub struct FormatError {
    pub found: usize,
}

/// One digest per boot artifact. Slots are overwritten, never added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChecksumTable {
    entries: [DigestValue; ArtifactId::COUNT],
}

impl ChecksumTable {
    /// Staging table with every slot set to the unsealed sentinel.
    pub const fn zeroed() -> Self {
        Self {
            entries: [DigestValue::ZERO; ArtifactId::COUNT],
        }
    }

    /// Parse a persisted table. Rejects any length other than [`TABLE_LEN`].
    pub fn decode(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() != TABLE_LEN {
            return Err(FormatError { found: bytes.len() });
        }
        let mut table = Self::zeroed();
        for (slot, chunk) in table.entries.iter_mut().zip(bytes.chunks_exact(DIGEST_LEN)) {
            let mut raw = [0u8; DIGEST_LEN];
            raw.copy_from_slice(chunk);
            *slot = DigestValue::from_bytes(raw);
        }
        Ok(table)
    }

    pub fn encode(&self) -> [u8; TABLE_LEN] {
        let mut out = [0u8; TABLE_LEN];
        for (chunk, digest) in out.chunks_exact_mut(DIGEST_LEN).zip(self.entries.iter()) {
            chunk.copy_from_slice(digest.as_bytes());
        }
        out
    }

    pub fn get(&self, id: ArtifactId) -> DigestValue {
        self.entries[id.index()]
    }

    pub fn set(&mut self, id: ArtifactId, value: DigestValue) {
        self.entries[id.index()] = value;
    }

    /// Entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ArtifactId, DigestValue)> + '_ {
        ArtifactId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }

    /// Artifacts whose slot still holds the unsealed sentinel.
    pub fn unsealed(&self) -> impl Iterator<Item = ArtifactId> + '_ {
        self.iter().filter(|(_, d)| d.is_zero()).map(|(id, _)| id)
    }

    pub fn is_fully_sealed(&self) -> bool {
        self.unsealed().next().is_none()
    }
}

/// Decode a persisted table; see [`ChecksumTable::decode`].
pub fn load_table(bytes: &[u8]) -> Result<ChecksumTable, FormatError> {
    ChecksumTable::decode(bytes)
}

/// Encode a table for persistence; see [`ChecksumTable::encode`].
pub fn save_table(table: &ChecksumTable) -> [u8; TABLE_LEN] {
    table.encode()
}
