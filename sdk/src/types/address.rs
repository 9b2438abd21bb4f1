//! 32-byte account and object addresses.
//!
//! Addresses appear in user input in wildly inconsistent spellings:
//! `0x2`, `0x02`, a full 64-hex-digit string, upper-case, no prefix.
//! All of them denote the same 32 bytes, so parsing normalizes
//! aggressively and printing has exactly one canonical form:
//! `0x` + 64 lower-case hex digits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::bcs::{BcsDecode, BcsEncode, Reader, Writer};
use crate::error::CodecError;

/// Length of an address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// Errors from parsing an address string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    /// The string contains a character outside `[0-9a-fA-F]`.
    #[error("address contains a non-hex character: {0:?}")]
    NonHexCharacter(char),

    /// More than 64 hex digits; the value cannot fit in 32 bytes.
    #[error("address has {0} hex digits, maximum is 64")]
    TooLong(usize),

    /// The empty string (or a bare `0x`) is not an address.
    #[error("address string is empty")]
    Empty,
}

/// A 32-byte Lumen address, used for accounts, objects, and packages.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0; ADDRESS_LENGTH]);

    /// `0x1`, home of the Move standard library.
    pub const STDLIB: Address = Address::from_suffix(0x1);

    /// `0x2`, home of the Lumen framework (coin, kiosk, transfer_policy).
    pub const FRAMEWORK: Address = Address::from_suffix(0x2);

    /// Builds an address whose last byte is `suffix` and the rest zero.
    /// Handy for the well-known low addresses.
    pub const fn from_suffix(suffix: u8) -> Self {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = suffix;
        Self(bytes)
    }

    /// Wraps raw bytes as an address.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses a hex string, with or without a `0x` prefix, in any case,
    /// zero-padding short forms on the left. `"0x2"`, `"0x02"`, and the
    /// fully padded 64-digit spelling all parse to the same value.
    pub fn from_hex(s: &str) -> Result<Self, AddressParseError> {
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        if digits.is_empty() {
            return Err(AddressParseError::Empty);
        }
        if digits.len() > ADDRESS_LENGTH * 2 {
            return Err(AddressParseError::TooLong(digits.len()));
        }

        let mut bytes = [0u8; ADDRESS_LENGTH];
        // Right-align: the string is the low end of the 32-byte value.
        let mut nibble_index = ADDRESS_LENGTH * 2 - digits.len();
        for c in digits.chars() {
            let nibble = c
                .to_digit(16)
                .ok_or(AddressParseError::NonHexCharacter(c))? as u8;
            let byte = &mut bytes[nibble_index / 2];
            if nibble_index % 2 == 0 {
                *byte |= nibble << 4;
            } else {
                *byte |= nibble;
            }
            nibble_index += 1;
        }
        Ok(Self(bytes))
    }

    /// Canonical printed form: `0x` + 64 lower-case hex digits.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Consumes the address into its raw bytes.
    pub fn into_bytes(self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// On the wire an address is a bare 32-byte array, no length prefix.
impl BcsEncode for Address {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        w.write_bytes(&self.0);
        Ok(())
    }
}

impl BcsDecode for Address {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let bytes = r.read_bytes(ADDRESS_LENGTH)?;
        let mut arr = [0u8; ADDRESS_LENGTH];
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

    #[test]
    fn short_and_padded_forms_are_equal() {
        let short = Address::from_hex("0x2").unwrap();
        let padded = Address::from_hex(
            "0x0000000000000000000000000000000000000000000000000000000000000002",
        )
        .unwrap();
        assert_eq!(short, padded);
        assert_eq!(short, Address::FRAMEWORK);
    }

    #[test]
    fn parsing_is_case_insensitive() {
        let lower = Address::from_hex("0xabcdef").unwrap();
        let upper = Address::from_hex("0xABCDEF").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn prefix_is_optional() {
        assert_eq!(
            Address::from_hex("2").unwrap(),
            Address::from_hex("0x2").unwrap()
        );
    }

    #[test]
    fn display_is_canonical() {
        let addr = Address::from_hex("0xBAD").unwrap();
        let printed = addr.to_string();
        assert_eq!(printed.len(), 2 + 64);
        assert!(printed.starts_with("0x"));
        assert!(printed.ends_with("bad"));
        assert_eq!(printed, printed.to_lowercase());
        // printing then re-parsing is the identity
        assert_eq!(Address::from_hex(&printed).unwrap(), addr);
    }

    #[test]
    fn odd_digit_count_is_right_aligned() {
        // "0x123" means ...0123, not 123 followed by a stray nibble.
        let a = Address::from_hex("0x123").unwrap();
        let b = Address::from_hex("0x0123").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes()[31], 0x23);
        assert_eq!(a.as_bytes()[30], 0x01);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Address::from_hex("0xzz"),
            Err(AddressParseError::NonHexCharacter('z'))
        ));
        assert!(matches!(
            Address::from_hex(&"f".repeat(65)),
            Err(AddressParseError::TooLong(65))
        ));
        assert!(matches!(Address::from_hex("0x"), Err(AddressParseError::Empty)));
        assert!(matches!(Address::from_hex(""), Err(AddressParseError::Empty)));
    }

    #[test]
    fn bcs_is_fixed_width() {
        let addr = Address::from_hex("0x2").unwrap();
        let bytes = bcs::to_bytes(&addr).unwrap();
        assert_eq!(bytes.len(), ADDRESS_LENGTH);
        assert_eq!(bytes[31], 0x02);
        assert_eq!(bcs::from_bytes::<Address>(&bytes).unwrap(), addr);
    }

    #[test]
    fn serde_uses_canonical_string() {
        let addr = Address::from_hex("0x2").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert!(json.contains("0x00000000"));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
