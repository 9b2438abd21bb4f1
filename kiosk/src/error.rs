//! Error types for kiosk transfer-policy resolution.
//!
//! The split matters for the caller's UI: a [`KioskError::UnresolvableRule`]
//! is actionable (register a resolver for that rule and retry), while most
//! of the rest indicate a misconfigured client or a kiosk in a state the
//! requested purchase cannot proceed from.

use lumen_sdk::transaction::BuildError;
use lumen_sdk::types::Address;
use thiserror::Error;

/// Errors from the kiosk client and the purchase resolution flow.
#[derive(Debug, Error)]
pub enum KioskError {
    /// A resolver is already registered for this rule identifier. The
    /// registry keeps the first registration.
    #[error("a resolver for rule '{0}' is already registered")]
    DuplicateRule(String),

    /// The policy requires a rule no registered resolver can satisfy.
    /// Register a custom resolver for the named rule and retry.
    #[error("no resolver registered for required rule '{0}'")]
    UnresolvableRule(String),

    /// A default rule is enabled but its package ID was never
    /// configured for this network.
    #[error("missing package ID for rule '{0}'")]
    MissingRulePackage(String),

    /// The item type is not a well-formed struct type tag.
    #[error("invalid item type '{0}'")]
    InvalidItemType(String),

    /// No transfer policy exists for the item type being purchased.
    #[error("no transfer policy found for type '{0}'")]
    PolicyNotFound(String),

    /// The item is not listed for sale in the seller's kiosk.
    #[error("item {item_id} is not listed in kiosk {kiosk_id}")]
    ItemNotListed {
        kiosk_id: Address,
        item_id: Address,
    },

    /// The policy requires a locking rule but the buyer has no kiosk to
    /// lock the purchased item into.
    #[error("rule '{0}' requires the buyer's kiosk, but none was provided")]
    MissingBuyerKiosk(String),

    /// The query backend failed.
    #[error("policy query failed: {0}")]
    Query(String),

    /// Appending commands to the transaction builder failed.
    #[error(transparent)]
    Build(#[from] BuildError),
}
