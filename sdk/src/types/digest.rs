//! 32-byte digests, printed as base58.
//!
//! Object digests and transaction digests share the same shape: a fixed
//! 32-byte hash that the RPC layer exchanges as a base58 string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::bcs::{BcsDecode, BcsEncode, Reader, Writer};
use crate::error::CodecError;

/// Length of a digest in bytes.
pub const DIGEST_LENGTH: usize = 32;

/// Errors from parsing a base58 digest string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestParseError {
    /// The string is not valid base58.
    #[error("digest is not valid base58: {0}")]
    InvalidBase58(String),

    /// The decoded payload is not exactly 32 bytes.
    #[error("digest decodes to {0} bytes, expected {DIGEST_LENGTH}")]
    WrongLength(usize),
}

/// A 32-byte hash digest (object digest, transaction digest).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl Digest {
    /// The all-zero digest. Seen on freshly created objects in dry runs.
    pub const ZERO: Digest = Digest([0; DIGEST_LENGTH]);

    /// Wraps raw bytes as a digest.
    pub const fn new(bytes: [u8; DIGEST_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses the base58 spelling used by the RPC layer.
    pub fn from_base58(s: &str) -> Result<Self, DigestParseError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| DigestParseError::InvalidBase58(e.to_string()))?;
        let arr: [u8; DIGEST_LENGTH] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| DigestParseError::WrongLength(v.len()))?;
        Ok(Self(arr))
    }

    /// Base58 spelling of the digest.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }

    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LENGTH] {
        &self.0
    }
}

impl FromStr for Digest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_base58())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}

// Fixed-width on the wire, like an address.
impl BcsEncode for Digest {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        w.write_bytes(&self.0);
        Ok(())
    }
}

impl BcsDecode for Digest {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let bytes = r.read_bytes(DIGEST_LENGTH)?;
        let mut arr = [0u8; DIGEST_LENGTH];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcs;

    fn sample() -> Digest {
        let mut bytes = [0u8; DIGEST_LENGTH];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i % 10) as u8;
        }
        Digest::new(bytes)
    }

    #[test]
    fn base58_roundtrip() {
        let d = sample();
        let s = d.to_base58();
        assert_eq!(Digest::from_base58(&s).unwrap(), d);
    }

    #[test]
    fn rejects_wrong_length() {
        let short = bs58::encode([1u8; 16]).into_string();
        assert!(matches!(
            Digest::from_base58(&short),
            Err(DigestParseError::WrongLength(16))
        ));
    }

    #[test]
    fn rejects_non_base58() {
        assert!(matches!(
            Digest::from_base58("0OIl"),
            Err(DigestParseError::InvalidBase58(_))
        ));
    }

    #[test]
    fn bcs_is_fixed_width() {
        let d = sample();
        let bytes = bcs::to_bytes(&d).unwrap();
        assert_eq!(bytes.len(), DIGEST_LENGTH);
        assert_eq!(bcs::from_bytes::<Digest>(&bytes).unwrap(), d);
    }
}
