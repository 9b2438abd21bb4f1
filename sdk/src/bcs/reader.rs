//! The decoding half of the codec: a cursor over an untrusted byte
//! slice with hardening limits baked in.
//!
//! Every read checks the remaining length first, every length prefix is
//! bounded by the bytes actually present, and recursion is capped. A
//! hostile buffer gets a typed error back, never a panic and never a
//! multi-gigabyte allocation.

use crate::error::CodecError;

/// Hardening limits applied while decoding untrusted input.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Maximum accepted input size in bytes. Defaults to the protocol
    /// transaction-size cap.
    pub max_input_len: usize,
    /// Maximum nesting depth of sequences and recursive tags.
    pub max_depth: u32,
}

impl Limits {
    /// 128 KiB, the network-wide cap on a serialized transaction.
    pub const MAX_TRANSACTION_SIZE: usize = 128 * 1024;

    /// Deep enough for any honest value, shallow enough to keep a
    /// recursive type-tag bomb from exhausting the stack.
    pub const MAX_DEPTH: u32 = 128;
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_len: Self::MAX_TRANSACTION_SIZE,
            max_depth: Self::MAX_DEPTH,
        }
    }
}

/// Cursor over a byte slice being decoded.
///
/// The reader borrows the input for the duration of one decode call and
/// tracks exactly how many bytes were consumed; [`Reader::finish`]
/// enforces that the count equals the input length.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    depth: u32,
    limits: Limits,
}

impl<'a> Reader<'a> {
    /// Creates a reader over `buf`, rejecting inputs above the size cap
    /// before touching a single byte.
    pub fn new(buf: &'a [u8], limits: Limits) -> Result<Self, CodecError> {
        if buf.len() > limits.max_input_len {
            return Err(CodecError::malformed(format!(
                "input of {} bytes exceeds the {} byte cap",
                buf.len(),
                limits.max_input_len
            )));
        }
        Ok(Self {
            buf,
            pos: 0,
            depth: 0,
            limits,
        })
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Fails unless every input byte was consumed.
    pub fn finish(&self) -> Result<(), CodecError> {
        if self.pos != self.buf.len() {
            return Err(CodecError::TruncatedOrOverlongInput(format!(
                "{} trailing bytes after the root value",
                self.remaining()
            )));
        }
        Ok(())
    }

    /// Enters one level of nesting. Paired with [`Reader::ascend`].
    pub fn descend(&mut self) -> Result<(), CodecError> {
        if self.depth >= self.limits.max_depth {
            return Err(CodecError::malformed(format!(
                "nesting depth exceeds the {} level cap",
                self.limits.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves one level of nesting.
    pub fn ascend(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth = self.depth.saturating_sub(1);
    }

    /// Takes `n` raw bytes from the stream (fixed-size arrays).
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::TruncatedOrOverlongInput(format!(
                "needed {n} more bytes at offset {}, only {} left",
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        let b = self.read_bytes(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(u64::from_le_bytes(arr))
    }

    pub fn read_u128(&mut self) -> Result<u128, CodecError> {
        let b = self.read_bytes(16)?;
        let mut arr = [0u8; 16];
        arr.copy_from_slice(b);
        Ok(u128::from_le_bytes(arr))
    }

    /// Booleans must be exactly 0 or 1; anything else is malformed.
    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::malformed(format!(
                "boolean must be 0 or 1, got {other}"
            ))),
        }
    }

    /// Reads a ULEB128-encoded u32.
    ///
    /// Minimal form is required: a padded encoding (`0x80 0x00` for
    /// zero) denotes the same number but different bytes, which would
    /// break the bijectivity the round-trip law depends on.
    pub fn read_uleb128(&mut self) -> Result<u32, CodecError> {
        let mut value: u64 = 0;
        for shift in (0..35).step_by(7) {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                if byte == 0 && shift > 0 {
                    return Err(CodecError::malformed(
                        "ULEB128 value is not minimally encoded".to_string(),
                    ));
                }
                return u32::try_from(value).map_err(|_| {
                    CodecError::malformed("ULEB128 value exceeds u32 range".to_string())
                });
            }
        }
        Err(CodecError::malformed(
            "ULEB128 value exceeds u32 range".to_string(),
        ))
    }

    /// Reads a sequence length prefix.
    ///
    /// A claimed length larger than the remaining byte count cannot be
    /// honest (every element is at least one byte on the wire), so it is
    /// rejected here, before the caller allocates anything.
    pub fn read_len(&mut self) -> Result<usize, CodecError> {
        let len = self.read_uleb128()? as usize;
        if len > self.remaining() {
            return Err(CodecError::malformed(format!(
                "length prefix claims {len} elements with only {} bytes left",
                self.remaining()
            )));
        }
        Ok(len)
    }

    /// Reads a length-prefixed byte sequence.
    pub fn read_vec_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        let len = self.read_len()?;
        Ok(self.read_bytes(len)?.to_vec())
    }

    /// Reads a length-prefixed UTF-8 string. Invalid UTF-8 is a
    /// malformed encoding, not a lossy conversion.
    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let bytes = self.read_vec_bytes()?;
        String::from_utf8(bytes)
            .map_err(|e| CodecError::malformed(format!("string field is not valid UTF-8: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
