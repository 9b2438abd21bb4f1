//! # Transaction Module
//!
//! The programmable transaction data model, its canonical wire codec,
//! and the builder that assembles it.
//!
//! ## Architecture
//!
//! ```text
//! inputs.rs   — Pure and object inputs (CallArg, ObjectArg, ObjectRef)
//! commands.rs — Command steps and Argument references
//! data.rs     — TransactionData envelope, GasData, expiration, wire codec
//! builder.rs  — Append-only ProgrammableTransactionBuilder
//! intent.rs   — Intent-prefixed signing messages and digests
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build** — declare inputs and append commands on a
//!    [`ProgrammableTransactionBuilder`]; helpers (and policy
//!    resolvers) may keep appending.
//! 2. **Seal** — `build()` wraps the command list into a
//!    [`TransactionData`] envelope with sender, gas, and expiration.
//! 3. **Encode** — `to_bytes()` produces the canonical BCS bytes the
//!    network's validators independently decode.
//! 4. **Sign** — the signer hashes and signs the intent-prefixed bytes
//!    from `signing_message()`; key handling lives outside this crate.
//!
//! ## Design Decisions
//!
//! - Sum types everywhere: each wire discriminant is a real `enum`
//!   variant, so an unrepresentable state cannot be encoded.
//! - The codec validates structure, never semantics. Argument indices
//!   pass through untouched in both directions.
//! - The builder is append-only; composability of independent helpers
//!   depends on nobody being able to reorder history.

pub mod builder;
pub mod commands;
pub mod data;
pub mod inputs;
pub mod intent;

pub use builder::{BuildError, ProgrammableTransactionBuilder, PureKind};
pub use commands::{Argument, Command, ProgrammableMoveCall};
pub use data::{
    GasData, ProgrammableTransaction, TransactionData, TransactionDataV1, TransactionExpiration,
    TransactionKind, ValidationError,
};
pub use inputs::{CallArg, ObjectArg, ObjectRef};
pub use intent::{signing_message, AppId, Intent, IntentScope, IntentVersion};
