//! SHA-256 digest engine.
//!
//! Pure and allocation-free: [`compute`] hashes a whole buffer, [`Hasher`]
//! hashes a stream fed in chunks (used for files read through a fixed
//! stack buffer).

use core::fmt;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length in bytes of every digest in the checksum table.
pub const DIGEST_LEN: usize = 32;

/// A 32-byte SHA-256 digest.
///
/// The all-zero value is reserved as the "never sealed" marker in a
/// checksum table; see [`DigestValue::ZERO`].
#[derive(Clone, Copy)]
pub struct DigestValue([u8; DIGEST_LEN]);

impl DigestValue {
    /// Sentinel stored in slots that have not been sealed yet.
    pub const ZERO: DigestValue = DigestValue([0u8; DIGEST_LEN]);

    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.ct_eq(&Self::ZERO).into()
    }

    /// Parse 64 hex characters (either case).
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut out = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s.trim(), &mut out)?;
        Ok(Self(out))
    }
}

impl ConstantTimeEq for DigestValue {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

// Comparison never short-circuits on the first differing byte.
impl PartialEq for DigestValue {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for DigestValue {}

impl Default for DigestValue {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[u8; DIGEST_LEN]> for DigestValue {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for DigestValue {
    type Error = core::array::TryFromSliceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; DIGEST_LEN]>::try_from(bytes).map(Self)
    }
}

impl AsRef<[u8]> for DigestValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for DigestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; DIGEST_LEN * 2];
        hex::encode_to_slice(self.0, &mut buf).map_err(|_| fmt::Error)?;
        // hex output is always ASCII
        let s = core::str::from_utf8(&buf).map_err(|_| fmt::Error)?;
        f.write_str(s)
    }
}

impl fmt::Debug for DigestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigestValue({})", self)
    }
}

/// Incremental SHA-256 over a byte stream.
#[derive(Clone, Default)]
pub struct Hasher {
    inner: Sha256,
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
    }

    pub fn finalize(self) -> DigestValue {
        DigestValue(self.inner.finalize().into())
    }
}

/// Compute the SHA-256 digest of `bytes`. Deterministic; cannot fail.
pub fn compute(bytes: &[u8]) -> DigestValue {
    DigestValue(Sha256::digest(bytes).into())
}
