//! The kiosk client: rule registry plus a pluggable query backend.
//!
//! The client itself is transport-agnostic. Whoever constructs it
//! supplies a [`PolicyQuery`] implementation (an RPC node, an indexer, an
//! in-memory fixture in tests) and the per-network package IDs of the
//! default rule implementations. The registry of rule resolvers is
//! append-only and first-registration-wins.

use std::sync::Arc;

use async_trait::async_trait;
use lumen_sdk::types::Address;
use tracing::debug;

use crate::error::KioskError;
use crate::rules::{
    FloorPriceRuleResolver, KioskLockRuleResolver, PersonalKioskRuleResolver, RoyaltyRuleResolver,
    RuleResolver, TransferPolicyRule,
};
use crate::types::{DefaultRule, KioskData, RulePackageIds, TransferPolicy};

// ---------------------------------------------------------------------------
// Query backend
// ---------------------------------------------------------------------------

/// Read access to on-chain kiosk and transfer-policy state.
#[async_trait]
pub trait PolicyQuery: Send + Sync {
    /// All transfer policies attached to an item type. Usually zero or
    /// one, but nothing on chain prevents several.
    async fn fetch_transfer_policies(
        &self,
        item_type: &str,
    ) -> Result<Vec<TransferPolicy>, KioskError>;

    /// A kiosk's contents and listings.
    async fn fetch_kiosk(&self, kiosk_id: &Address) -> Result<KioskData, KioskError>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Resolves transfer-policy rules during purchases.
pub struct KioskClient {
    query: Arc<dyn PolicyQuery>,
    package_ids: RulePackageIds,
    rules: Vec<TransferPolicyRule>,
}

impl KioskClient {
    /// Creates a client with the default rule resolvers registered for
    /// every rule package the network has configured.
    pub fn new(
        query: Arc<dyn PolicyQuery>,
        package_ids: RulePackageIds,
    ) -> Result<Self, KioskError> {
        let mut client = Self::without_default_rules(query, package_ids);
        client.register_default_rules()?;
        Ok(client)
    }

    /// Creates a client with an empty rule registry. Every rule the
    /// caller expects to encounter must be registered explicitly.
    pub fn without_default_rules(query: Arc<dyn PolicyQuery>, package_ids: RulePackageIds) -> Self {
        Self {
            query,
            package_ids,
            rules: Vec::new(),
        }
    }

    /// Registers a resolver for a rule. Fails if a resolver for the
    /// exact same rule tag is already registered; the first registration
    /// is kept.
    pub fn add_rule_resolver(&mut self, rule: TransferPolicyRule) -> Result<(), KioskError> {
        if self.rules.iter().any(|r| r.rule == rule.rule) {
            return Err(KioskError::DuplicateRule(rule.rule));
        }
        debug!(rule = %rule.rule, package = %rule.package_id, "registered rule resolver");
        self.rules.push(rule);
        Ok(())
    }

    /// The registered resolver for a rule tag, if any. Matching is exact
    /// string comparison on the canonical type tag.
    pub fn rule_resolver(&self, rule: &str) -> Option<&TransferPolicyRule> {
        self.rules.iter().find(|r| r.rule == rule)
    }

    /// All registered rules, in registration order.
    pub fn rules(&self) -> &[TransferPolicyRule] {
        &self.rules
    }

    /// The configured rule package IDs.
    pub fn package_ids(&self) -> &RulePackageIds {
        &self.package_ids
    }

    /// Transfer policies attached to an item type.
    pub async fn get_transfer_policies(
        &self,
        item_type: &str,
    ) -> Result<Vec<TransferPolicy>, KioskError> {
        self.query.fetch_transfer_policies(item_type).await
    }

    /// A kiosk's contents and listings.
    pub async fn get_kiosk(&self, kiosk_id: &Address) -> Result<KioskData, KioskError> {
        self.query.fetch_kiosk(kiosk_id).await
    }

    pub(crate) fn query(&self) -> &dyn PolicyQuery {
        self.query.as_ref()
    }

    fn register_default_rules(&mut self) -> Result<(), KioskError> {
        let defaults: [(DefaultRule, Arc<dyn RuleResolver>); 4] = [
            (DefaultRule::Royalty, Arc::new(RoyaltyRuleResolver)),
            (DefaultRule::KioskLock, Arc::new(KioskLockRuleResolver)),
            (DefaultRule::PersonalKiosk, Arc::new(PersonalKioskRuleResolver)),
            (DefaultRule::FloorPrice, Arc::new(FloorPriceRuleResolver)),
        ];
        for (kind, resolver) in defaults {
            // Rules the network never published are simply not registered.
            let Ok(package_id) = self.package_ids.require(kind) else {
                continue;
            };
            let tag = format!("{}::{}::Rule", package_id.to_hex(), kind.module());
            self.add_rule_resolver(TransferPolicyRule::new(tag, package_id, resolver))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for KioskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KioskClient")
            .field("package_ids", &self.package_ids)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::FloorPriceRuleResolver;

    struct NoQuery;

    #[async_trait]
    impl PolicyQuery for NoQuery {
        async fn fetch_transfer_policies(
            &self,
            _item_type: &str,
        ) -> Result<Vec<TransferPolicy>, KioskError> {
            Ok(Vec::new())
        }

        async fn fetch_kiosk(&self, kiosk_id: &Address) -> Result<KioskData, KioskError> {
            Err(KioskError::Query(format!("unknown kiosk {kiosk_id}")))
        }
    }

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        Address::new(bytes)
    }

    #[test]
    fn default_rules_follow_configured_packages() {
        let ids = RulePackageIds {
            royalty_rule_package_id: Some(addr(0xaa)),
            kiosk_lock_rule_package_id: Some(addr(0xbb)),
            personal_kiosk_rule_package_id: None,
            floor_price_rule_package_id: None,
        };
        let client = KioskClient::new(Arc::new(NoQuery), ids).unwrap();
        assert_eq!(client.rules().len(), 2);
        let rule = format!("{}::royalty_rule::Rule", addr(0xaa).to_hex());
        assert!(client.rule_resolver(&rule).is_some());
    }

    #[test]
    fn duplicate_registration_keeps_first() {
        let mut client =
            KioskClient::without_default_rules(Arc::new(NoQuery), RulePackageIds::default());
        let first = TransferPolicyRule::new(
            "0x1::m::Rule".to_string(),
            addr(1),
            Arc::new(FloorPriceRuleResolver),
        );
        let second = TransferPolicyRule::new(
            "0x1::m::Rule".to_string(),
            addr(2),
            Arc::new(FloorPriceRuleResolver),
        );
        client.add_rule_resolver(first).unwrap();
        let err = client.add_rule_resolver(second).unwrap_err();
        assert!(matches!(err, KioskError::DuplicateRule(_)));
        assert_eq!(client.rules().len(), 1);
        assert_eq!(client.rule_resolver("0x1::m::Rule").unwrap().package_id, addr(1));
    }

    #[test]
    fn lookup_is_exact_match() {
        let mut client =
            KioskClient::without_default_rules(Arc::new(NoQuery), RulePackageIds::default());
        client
            .add_rule_resolver(TransferPolicyRule::new(
                "0x1::m::Rule".to_string(),
                addr(1),
                Arc::new(FloorPriceRuleResolver),
            ))
            .unwrap();
        assert!(client.rule_resolver("0x1::m::rule").is_none());
        assert!(client.rule_resolver("0x2::m::Rule").is_none());
    }
}
