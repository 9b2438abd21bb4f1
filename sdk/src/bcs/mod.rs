//! # BCS Primitives
//!
//! The canonical binary format every Lumen transaction is serialized
//! into. The rules are few and rigid:
//!
//! - Integers are fixed-width little-endian.
//! - Sequences and strings carry a ULEB128 length prefix.
//! - Tagged unions encode a ULEB128 discriminant, then the payload.
//! - `Option<T>` is a single presence byte (0 or 1), then the payload.
//! - Fixed-size byte arrays (addresses, digests) have no length prefix.
//! - No padding, no alignment, no field names on the wire.
//!
//! Field order in a struct *is* the wire contract. Reordering fields is
//! a breaking protocol change, which is why every `encode`/`decode` pair
//! in this crate lives side by side in the same file.
//!
//! ## Untrusted input
//!
//! [`Reader`] decodes bytes that may come from a network peer, so it
//! fails closed: a configurable input-size cap, a recursion depth cap,
//! minimal-form ULEB128 enforcement, and the rule that a claimed
//! sequence length may never exceed the bytes remaining in the buffer
//! (every element occupies at least one byte, so a larger claim cannot
//! be honest and is rejected before any allocation happens).

mod reader;
mod writer;

pub use reader::{Limits, Reader};
pub use writer::Writer;

use crate::error::CodecError;

/// A value that can be written to the BCS wire format.
pub trait BcsEncode {
    /// Appends the canonical encoding of `self` to the writer.
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError>;
}

/// A value that can be read back from the BCS wire format.
pub trait BcsDecode: Sized {
    /// Reads one value from the current reader position.
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError>;
}

/// Serializes a value into a fresh byte buffer.
pub fn to_bytes<T: BcsEncode>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut w = Writer::new();
    value.encode(&mut w)?;
    Ok(w.into_bytes())
}

/// Deserializes a value from `bytes` using [`Limits::default`].
///
/// The entire buffer must be consumed: trailing bytes after the root
/// value are a [`CodecError::TruncatedOrOverlongInput`], same as a
/// buffer that ends mid-value.
pub fn from_bytes<T: BcsDecode>(bytes: &[u8]) -> Result<T, CodecError> {
    from_bytes_with_limits(bytes, Limits::default())
}

/// Same as [`from_bytes`], with caller-chosen hardening limits.
pub fn from_bytes_with_limits<T: BcsDecode>(
    bytes: &[u8],
    limits: Limits,
) -> Result<T, CodecError> {
    let mut r = Reader::new(bytes, limits)?;
    let value = T::decode(&mut r)?;
    r.finish()?;
    Ok(value)
}

// ---------------------------------------------------------------------------
// Blanket impls for the primitive vocabulary
// ---------------------------------------------------------------------------

macro_rules! impl_bcs_uint {
    ($($ty:ty => $write:ident, $read:ident);* $(;)?) => {
        $(
            impl BcsEncode for $ty {
                fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
                    w.$write(*self);
                    Ok(())
                }
            }

            impl BcsDecode for $ty {
                fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
                    r.$read()
                }
            }
        )*
    };
}

impl_bcs_uint! {
    u8   => write_u8,   read_u8;
    u16  => write_u16,  read_u16;
    u32  => write_u32,  read_u32;
    u64  => write_u64,  read_u64;
    u128 => write_u128, read_u128;
}

impl BcsEncode for bool {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        w.write_bool(*self);
        Ok(())
    }
}

impl BcsDecode for bool {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        r.read_bool()
    }
}

impl<T: BcsEncode> BcsEncode for Vec<T> {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        w.write_len(self.len())?;
        for item in self {
            item.encode(w)?;
        }
        Ok(())
    }
}

impl<T: BcsDecode> BcsDecode for Vec<T> {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let len = r.read_len()?;
        r.descend()?;
        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(T::decode(r)?);
        }
        r.ascend();
        Ok(items)
    }
}

impl<T: BcsEncode> BcsEncode for Option<T> {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        match self {
            None => {
                w.write_u8(0);
                Ok(())
            }
            Some(value) => {
                w.write_u8(1);
                value.encode(w)
            }
        }
    }
}

impl<T: BcsDecode> BcsDecode for Option<T> {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        match r.read_u8()? {
            0 => Ok(None),
            1 => Ok(Some(T::decode(r)?)),
            other => Err(CodecError::malformed(format!(
                "option flag must be 0 or 1, got {other}"
            ))),
        }
    }
}

impl BcsEncode for String {
    fn encode(&self, w: &mut Writer) -> Result<(), CodecError> {
        w.write_string(self)
    }
}

impl BcsDecode for String {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        r.read_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint_little_endian() {
        assert_eq!(to_bytes(&0x0102u16).unwrap(), vec![0x02, 0x01]);
        assert_eq!(to_bytes(&1u64).unwrap(), vec![1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn uint_roundtrip() {
        for v in [0u64, 1, 255, 256, u64::MAX] {
            let bytes = to_bytes(&v).unwrap();
            assert_eq!(from_bytes::<u64>(&bytes).unwrap(), v);
        }
        let v = u128::MAX - 7;
        assert_eq!(from_bytes::<u128>(&to_bytes(&v).unwrap()).unwrap(), v);
    }

    #[test]
    fn vec_is_length_prefixed() {
        let v: Vec<u8> = vec![0xAA, 0xBB, 0xCC];
        assert_eq!(to_bytes(&v).unwrap(), vec![3, 0xAA, 0xBB, 0xCC]);
        assert_eq!(from_bytes::<Vec<u8>>(&[3, 0xAA, 0xBB, 0xCC]).unwrap(), v);
    }

    #[test]
    fn empty_vec_roundtrip() {
        let v: Vec<u64> = vec![];
        let bytes = to_bytes(&v).unwrap();
        assert_eq!(bytes, vec![0]);
        assert_eq!(from_bytes::<Vec<u64>>(&bytes).unwrap(), v);
    }

    #[test]
    fn option_presence_byte() {
        assert_eq!(to_bytes(&None::<u64>).unwrap(), vec![0]);
        assert_eq!(
            to_bytes(&Some(5u64)).unwrap(),
            vec![1, 5, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(from_bytes::<Option<u64>>(&[0]).unwrap(), None);
    }

    #[test]
    fn option_flag_out_of_range_is_malformed() {
        let err = from_bytes::<Option<u64>>(&[2]).unwrap_err();
        assert!(matches!(err, CodecError::MalformedEncoding(_)));
    }

    #[test]
    fn string_roundtrip() {
        let s = "coin::Coin".to_string();
        let bytes = to_bytes(&s).unwrap();
        assert_eq!(bytes[0] as usize, s.len());
        assert_eq!(from_bytes::<String>(&bytes).unwrap(), s);
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        // length 2, then an invalid UTF-8 sequence
        let err = from_bytes::<String>(&[2, 0xC0, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::MalformedEncoding(_)));
    }

    #[test]
    fn trailing_bytes_rejected() {
        let err = from_bytes::<u8>(&[1, 2]).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedOrOverlongInput(_)));
    }

    #[test]
    fn truncated_input_rejected() {
        let err = from_bytes::<u64>(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedOrOverlongInput(_)));
    }

    #[test]
    fn nested_vec_roundtrip() {
        let v: Vec<Vec<u16>> = vec![vec![1, 2], vec![], vec![65535]];
        let bytes = to_bytes(&v).unwrap();
        assert_eq!(from_bytes::<Vec<Vec<u16>>>(&bytes).unwrap(), v);
    }
}
