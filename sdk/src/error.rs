//! Error types for the transaction codec.
//!
//! Every decode path in this crate returns a [`CodecError`]. Decoding
//! untrusted bytes must never panic or abort -- a malformed buffer from a
//! network peer is an expected input, not an exceptional one, and the
//! caller gets a typed failure it can turn into an actionable message.

use thiserror::Error;

/// Errors produced by the BCS codec and the type-tag parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The byte stream does not describe a well-formed value: a union
    /// discriminant out of range, invalid UTF-8 in a string field, a
    /// non-minimal or oversized ULEB128 length, or a length prefix that
    /// claims more elements than the buffer could possibly hold.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    /// The consumed byte count does not match the input length: either
    /// the buffer ended mid-value, or bytes were left over after the
    /// root value was fully decoded.
    #[error("truncated or overlong input: {0}")]
    TruncatedOrOverlongInput(String),

    /// The type-tag parser encountered a string it cannot parse: missing
    /// `::` separators, unbalanced `<>` in generics, an invalid address,
    /// or an identifier that is not a legal Move identifier.
    #[error("unsupported type tag: {0}")]
    UnsupportedTypeTag(String),
}

impl CodecError {
    /// Shorthand for a [`CodecError::MalformedEncoding`] with a formatted
    /// message. Used throughout the decoder hot path.
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedEncoding(msg.into())
    }
}
