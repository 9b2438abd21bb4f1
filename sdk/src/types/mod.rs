//! # Value Types
//!
//! The small vocabulary everything else is built from:
//!
//! ```text
//! address.rs  — 32-byte addresses with canonical hex normalization
//! digest.rs   — 32-byte digests, printed as base58
//! type_tag.rs — Move type tags: parser, canonical printer, wire codec
//! ```

pub mod address;
pub mod digest;
pub mod type_tag;

pub use address::{Address, AddressParseError, ADDRESS_LENGTH};
pub use digest::{Digest, DigestParseError, DIGEST_LENGTH};
pub use type_tag::{is_valid_identifier, StructTag, TypeTag};
