//! The encoding half of the codec: an append-only byte buffer with
//! helpers for every primitive the wire format knows about.
//!
//! Writing cannot produce malformed output by construction -- the only
//! failure mode is a sequence longer than the ULEB128 length space,
//! which no honest value ever reaches.

use crate::error::CodecError;

/// Append-only buffer for BCS encoding.
///
/// A `Writer` starts empty, accumulates one value, and is consumed by
/// [`Writer::into_bytes`]. It holds no state besides the buffer itself,
/// so serialization is a pure function of the input value.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer with a small pre-allocated buffer.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(256),
        }
    }

    /// Consumes the writer and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Current encoded length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u128(&mut self, v: u128) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Booleans are a single byte, 0 or 1.
    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    /// Writes a ULEB128-encoded unsigned integer. Seven value bits per
    /// byte, low group first, high bit set on every byte but the last.
    pub fn write_uleb128(&mut self, mut v: u32) {
        loop {
            let byte = (v & 0x7F) as u8;
            v >>= 7;
            if v == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    /// Writes a sequence length prefix. Lengths beyond `u32::MAX` do not
    /// fit the length space and are rejected.
    pub fn write_len(&mut self, len: usize) -> Result<(), CodecError> {
        let len = u32::try_from(len).map_err(|_| {
            CodecError::malformed(format!("sequence length {len} exceeds the wire format limit"))
        })?;
        self.write_uleb128(len);
        Ok(())
    }

    /// Writes raw bytes with no length prefix (fixed-size arrays:
    /// addresses, digests).
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a length-prefixed byte sequence.
    pub fn write_vec_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.write_len(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes a UTF-8 string as a length-prefixed byte sequence.
    pub fn write_string(&mut self, s: &str) -> Result<(), CodecError> {
        self.write_vec_bytes(s.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn uleb(v: u32) -> Vec<u8> {
        let mut w = Writer::new();
        w.write_uleb128(v);
        w.into_bytes()
    }

    #[test]
    fn uleb128_single_byte() {
        assert_eq!(uleb(0), vec![0x00]);
        assert_eq!(uleb(1), vec![0x01]);
        assert_eq!(uleb(127), vec![0x7F]);
    }

    #[test]
    fn uleb128_multi_byte() {
        assert_eq!(uleb(128), vec![0x80, 0x01]);
        assert_eq!(uleb(16384), vec![0x80, 0x80, 0x01]);
        assert_eq!(uleb(u32::MAX), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn integers_are_little_endian() {
        let mut w = Writer::new();
        w.write_u32(0x0A0B0C0D);
        assert_eq!(w.into_bytes(), vec![0x0D, 0x0C, 0x0B, 0x0A]);
    }

    #[test]
    fn fixed_bytes_have_no_prefix() {
        let mut w = Writer::new();
        w.write_bytes(&[9, 9, 9]);
        assert_eq!(w.into_bytes(), vec![9, 9, 9]);
    }

    #[test]
    fn vec_bytes_are_prefixed() {
        let mut w = Writer::new();
        w.write_vec_bytes(&[9, 9, 9]).unwrap();
        assert_eq!(w.into_bytes(), vec![3, 9, 9, 9]);
    }
}
