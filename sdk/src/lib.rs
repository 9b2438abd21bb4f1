//! # Lumen SDK — Transaction Core
//!
//! The byte-exact heart of every Lumen client: a schema-driven BCS
//! codec for the programmable transaction data model, the value types
//! it is built from, and the builder that assembles transactions for
//! signing.
//!
//! Wallets, explorers, and dashboards all consume the same wire format;
//! the executor on the other end decodes our bytes with an independent
//! implementation. That makes bijectivity the single non-negotiable
//! property: for every structurally valid value `v`,
//! `from_bytes(to_bytes(v)) == v`, byte for byte, index for index.
//!
//! ## Architecture
//!
//! - **bcs** — Wire-format primitives: ULEB128 lengths, little-endian
//!   integers, positional union discriminants, hardened decoding.
//! - **types** — Addresses, digests, and Move type tags with canonical
//!   string forms.
//! - **transaction** — The `TransactionData` model, its codec, the
//!   append-only builder, and intent-scoped signing digests.
//!
//! ## Design Philosophy
//!
//! 1. Decoding is parsing of hostile input: typed errors, hard limits,
//!    no panics, no unbounded allocation.
//! 2. Schema order is a protocol contract. Encode and decode for a type
//!    live side by side so a drift is visible in one diff.
//! 3. If it can be an enum, it is an enum.

pub mod bcs;
pub mod error;
pub mod transaction;
pub mod types;

pub use error::CodecError;
