//! Data shapes returned by the policy query backend.
//!
//! These are plain views over on-chain state, deserialized from whatever
//! indexer or node the [`PolicyQuery`](crate::PolicyQuery) implementation
//! talks to. They carry exactly what the purchase flow needs: where the
//! policy and kiosk objects live (ID plus initial shared version, so they
//! can be passed as shared inputs) and which rules the policy enforces.

use lumen_sdk::types::Address;
use serde::{Deserialize, Serialize};

/// A transfer policy attached to an item type.
///
/// `required_rules` holds the fully-qualified type tags of the policy's
/// rules, in the order the chain reports them. Resolution walks this list
/// in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPolicy {
    /// Object ID of the shared `TransferPolicy<T>` object.
    pub policy_id: Address,
    /// Version at which the policy object was shared.
    pub initial_shared_version: u64,
    /// The item type `T` the policy governs, as a canonical type tag.
    pub item_type: String,
    /// Rule type tags the policy enforces, in on-chain order.
    pub required_rules: Vec<String>,
}

/// Capability object proving authority over a transfer policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPolicyCap {
    pub cap_id: Address,
    pub policy_id: Address,
    pub item_type: String,
}

/// An item placed in a kiosk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KioskItem {
    pub item_id: Address,
    pub item_type: String,
    /// Locked items can only leave the kiosk through a purchase that
    /// satisfies the transfer policy.
    pub is_locked: bool,
}

/// An active listing inside a kiosk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KioskListing {
    pub item_id: Address,
    /// Asking price in base units.
    pub price: u64,
}

/// A kiosk's contents as reported by the query backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KioskData {
    /// Object ID of the shared `Kiosk` object.
    pub kiosk_id: Address,
    /// Version at which the kiosk object was shared.
    pub initial_shared_version: u64,
    pub items: Vec<KioskItem>,
    pub listings: Vec<KioskListing>,
}

impl KioskData {
    /// Looks up the active listing for an item, if any.
    pub fn listing(&self, item_id: &Address) -> Option<&KioskListing> {
        self.listings.iter().find(|l| &l.item_id == item_id)
    }

    /// Looks up an item held by the kiosk, if present.
    pub fn item(&self, item_id: &Address) -> Option<&KioskItem> {
        self.items.iter().find(|i| &i.item_id == item_id)
    }
}

/// The buyer's own kiosk, needed when a policy carries a locking or
/// personal-kiosk rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedKiosk {
    pub kiosk_id: Address,
    pub initial_shared_version: u64,
    /// `KioskOwnerCap` object reference fields.
    pub cap: lumen_sdk::transaction::ObjectRef,
}

/// Per-network package IDs for the default rule implementations.
///
/// Each field is optional: networks that never published a given rule
/// package simply leave it unset, and registering that default rule then
/// fails with [`KioskError::MissingRulePackage`](crate::KioskError).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RulePackageIds {
    pub royalty_rule_package_id: Option<Address>,
    pub kiosk_lock_rule_package_id: Option<Address>,
    pub personal_kiosk_rule_package_id: Option<Address>,
    pub floor_price_rule_package_id: Option<Address>,
}

/// The default rule implementations shipped with the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultRule {
    Royalty,
    KioskLock,
    PersonalKiosk,
    FloorPrice,
}

impl DefaultRule {
    /// Module name of the rule's Move implementation.
    pub fn module(self) -> &'static str {
        match self {
            DefaultRule::Royalty => "royalty_rule",
            DefaultRule::KioskLock => "kiosk_lock_rule",
            DefaultRule::PersonalKiosk => "personal_kiosk_rule",
            DefaultRule::FloorPrice => "floor_price_rule",
        }
    }
}

impl RulePackageIds {
    /// The configured package for a default rule, or
    /// [`KioskError::MissingRulePackage`](crate::KioskError) if the
    /// network never published it.
    pub fn require(&self, rule: DefaultRule) -> Result<Address, crate::KioskError> {
        let id = match rule {
            DefaultRule::Royalty => self.royalty_rule_package_id,
            DefaultRule::KioskLock => self.kiosk_lock_rule_package_id,
            DefaultRule::PersonalKiosk => self.personal_kiosk_rule_package_id,
            DefaultRule::FloorPrice => self.floor_price_rule_package_id,
        };
        id.ok_or_else(|| crate::KioskError::MissingRulePackage(rule.module().to_string()))
    }

    /// Canonical type tag of a default rule under its configured
    /// package, e.g. `0x..aa::royalty_rule::Rule`.
    pub fn rule_tag(&self, rule: DefaultRule) -> Result<String, crate::KioskError> {
        let package_id = self.require(rule)?;
        Ok(format!("{}::{}::Rule", package_id.to_hex(), rule.module()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        Address::new(bytes)
    }

    #[test]
    fn listing_lookup() {
        let kiosk = KioskData {
            kiosk_id: addr(1),
            initial_shared_version: 7,
            items: vec![KioskItem {
                item_id: addr(2),
                item_type: "0x9::nft::Nft".to_string(),
                is_locked: false,
            }],
            listings: vec![KioskListing {
                item_id: addr(2),
                price: 5_000,
            }],
        };
        assert_eq!(kiosk.listing(&addr(2)).map(|l| l.price), Some(5_000));
        assert!(kiosk.listing(&addr(3)).is_none());
        assert!(kiosk.item(&addr(2)).is_some());
    }

    #[test]
    fn unconfigured_rule_package_is_an_error() {
        let ids = RulePackageIds::default();
        let err = ids.require(DefaultRule::Royalty).unwrap_err();
        match err {
            crate::KioskError::MissingRulePackage(rule) => assert_eq!(rule, "royalty_rule"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(ids.rule_tag(DefaultRule::FloorPrice).is_err());
    }

    #[test]
    fn rule_tag_is_canonical() {
        let ids = RulePackageIds {
            kiosk_lock_rule_package_id: Some(addr(0xbb)),
            ..RulePackageIds::default()
        };
        assert_eq!(ids.require(DefaultRule::KioskLock).unwrap(), addr(0xbb));
        assert_eq!(
            ids.rule_tag(DefaultRule::KioskLock).unwrap(),
            format!("{}::kiosk_lock_rule::Rule", addr(0xbb).to_hex())
        );
    }

    #[test]
    fn policy_serde_roundtrip() {
        let policy = TransferPolicy {
            policy_id: addr(4),
            initial_shared_version: 12,
            item_type: "0x9::nft::Nft".to_string(),
            required_rules: vec!["0xa::royalty_rule::Rule".to_string()],
        };
        let json = serde_json::to_string(&policy).unwrap();
        let back: TransferPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, back);
    }
}
