use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Multihash code for sha2-256.
const SHA2_256_CODE: u8 = 0x12;

/// Length in bytes of a sha2-256 digest.
const SHA2_256_LEN: u8 = 0x20;

const KEY_LEN: usize = 2 + SHA2_256_LEN as usize;

#[derive(Debug, Error, PartialEq)]
pub enum ContentKeyError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Unsupported multihash prefix: {0:#04x} {1:#04x}")]
    UnsupportedPrefix(u8, u8),
}

/// Content address of a payload: the sha2-256 multihash of its exact bytes.
///
/// Equal payloads always map to equal keys. The canonical string form (used as
/// the storage key) is the lowercase hex encoding of the multihash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey([u8; KEY_LEN]);

impl ContentKey {
    /// Computes the key of `data`. No normalization is applied.
    pub fn digest(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);

        let mut key = [0u8; KEY_LEN];
        key[0] = SHA2_256_CODE;
        key[1] = SHA2_256_LEN;
        key[2..].copy_from_slice(&digest);
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The raw 32-byte digest without the multihash prefix.
    pub fn digest_bytes(&self) -> &[u8] {
        &self.0[2..]
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey({})", self)
    }
}

impl FromStr for ContentKey {
    type Err = ContentKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        if bytes.len() != KEY_LEN {
            return Err(ContentKeyError::InvalidLength {
                expected: KEY_LEN,
                actual: bytes.len(),
            });
        }
        if bytes[0] != SHA2_256_CODE || bytes[1] != SHA2_256_LEN {
            return Err(ContentKeyError::UnsupportedPrefix(bytes[0], bytes[1]));
        }

        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&bytes);
        Ok(Self(key))
    }
}
