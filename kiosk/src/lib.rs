//! Kiosk transfer-policy rule resolution.
//!
//! Items sold through a kiosk are governed by a transfer policy: a list
//! of rules that must all be satisfied inside the purchase transaction,
//! or the chain aborts it. This crate builds those transactions. A
//! [`KioskClient`] holds a registry of [`rules::RuleResolver`]s and a
//! pluggable [`PolicyQuery`] backend for reading kiosk and policy state;
//! [`KioskClient::purchase_and_resolve`] appends a complete purchase to a
//! transaction builder, running each required rule's resolver in order.
//!
//! # Architecture
//!
//! - [`types`] -- views over on-chain kiosk and policy state.
//! - [`rules`] -- the resolver trait and the default rule resolvers.
//! - [`client`] -- the rule registry and query surface.
//! - [`resolve`] -- the purchase flow itself.
//!
//! # Design Decisions
//!
//! - Rules are matched by exact type-tag string. Unknown rules fail the
//!   purchase early, client-side, instead of letting the chain abort it.
//! - Resolution is append-only and sequential. On failure the partially
//!   built transaction is left as-is for the caller to discard.

pub mod client;
pub mod error;
pub mod resolve;
pub mod rules;
pub mod types;

pub use client::{KioskClient, PolicyQuery};
pub use error::KioskError;
pub use resolve::{PurchaseOutcome, PurchaseParams, ResolveStatus, RulesResolved};
pub use rules::{ResolveContext, RuleResolver, TransferPolicyRule};
pub use types::{
    DefaultRule, KioskData, KioskItem, KioskListing, OwnedKiosk, RulePackageIds, TransferPolicy,
    TransferPolicyCap,
};
