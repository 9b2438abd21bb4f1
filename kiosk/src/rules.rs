//! Transfer-policy rules and their resolvers.
//!
//! A transfer policy on chain carries a list of rule type tags. Every one
//! of them must be satisfied inside the purchase transaction itself, or
//! `confirm_request` aborts and the whole purchase fails. A
//! [`RuleResolver`] knows how to satisfy one rule: it appends whatever
//! commands the rule's Move module requires to the transaction under
//! construction.
//!
//! # Design Decisions
//!
//! - Resolvers only ever append. A resolver that cannot satisfy its rule
//!   returns an error and the caller discards the whole builder; there is
//!   no rollback of partially-appended commands.
//! - Resolvers are matched to rules by exact type-tag string comparison.
//!   A rule published under a different package is a different rule, even
//!   if the module source is identical.
//! - The default resolvers mirror the canonical rule packages. Markets
//!   with bespoke rules register their own [`TransferPolicyRule`] next to
//!   the defaults.

use std::sync::Arc;

use async_trait::async_trait;
use lumen_sdk::transaction::{Argument, ProgrammableTransactionBuilder};
use lumen_sdk::types::{Address, TypeTag};

use crate::error::KioskError;

// ---------------------------------------------------------------------------
// Resolver interface
// ---------------------------------------------------------------------------

/// Everything a resolver may need while satisfying its rule.
///
/// `policy`, `transfer_request` and `item` point at values already present
/// in the transaction: the shared policy input, the `TransferRequest`
/// produced by `kiosk::purchase`, and the purchased item itself.
pub struct ResolveContext<'a> {
    /// The transaction under construction. Resolvers append to it.
    pub builder: &'a mut ProgrammableTransactionBuilder,
    /// Type of the item being purchased.
    pub item_type: TypeTag,
    /// Object ID of the item being purchased.
    pub item_id: Address,
    /// Listing price in base units.
    pub price: u64,
    /// Package the rule being resolved was published under. Set by the
    /// purchase flow before each resolver runs.
    pub package_id: Address,
    /// The shared transfer-policy object input.
    pub policy: Argument,
    /// The `TransferRequest` hot potato from `kiosk::purchase`.
    pub transfer_request: Argument,
    /// The purchased item.
    pub item: Argument,
    /// The buyer's own kiosk, if one was provided.
    pub buyer_kiosk: Option<Argument>,
    /// The buyer's `KioskOwnerCap`, if one was provided.
    pub buyer_kiosk_cap: Option<Argument>,
}

impl ResolveContext<'_> {
    /// The buyer's kiosk and cap, or an error naming the rule that
    /// needs them.
    fn buyer_kiosk_pair(&self, rule: &str) -> Result<(Argument, Argument), KioskError> {
        match (self.buyer_kiosk, self.buyer_kiosk_cap) {
            (Some(kiosk), Some(cap)) => Ok((kiosk, cap)),
            _ => Err(KioskError::MissingBuyerKiosk(rule.to_string())),
        }
    }
}

/// Satisfies one transfer-policy rule by appending commands.
#[async_trait]
pub trait RuleResolver: Send + Sync {
    /// Appends the commands that satisfy this rule.
    async fn resolve(&self, ctx: &mut ResolveContext<'_>) -> Result<(), KioskError>;

    /// Whether this rule leaves the purchased item locked in the buyer's
    /// kiosk. A locked item must not be transferred out after purchase.
    fn locks_item(&self) -> bool {
        false
    }
}

/// A rule registry entry: the rule's exact type tag, the package its
/// Move implementation lives in, and the resolver that satisfies it.
#[derive(Clone)]
pub struct TransferPolicyRule {
    pub rule: String,
    pub package_id: Address,
    pub resolver: Arc<dyn RuleResolver>,
}

impl TransferPolicyRule {
    pub fn new(
        rule: impl Into<String>,
        package_id: Address,
        resolver: Arc<dyn RuleResolver>,
    ) -> Self {
        Self {
            rule: rule.into(),
            package_id,
            resolver,
        }
    }
}

impl std::fmt::Debug for TransferPolicyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferPolicyRule")
            .field("rule", &self.rule)
            .field("package_id", &self.package_id)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Default resolvers
// ---------------------------------------------------------------------------

/// Pays the creator royalty out of the gas coin.
///
/// Computes the fee on chain (`royalty_rule::fee_amount`), splits exactly
/// that amount off the gas coin and hands it to `royalty_rule::pay`.
pub struct RoyaltyRuleResolver;

#[async_trait]
impl RuleResolver for RoyaltyRuleResolver {
    async fn resolve(&self, ctx: &mut ResolveContext<'_>) -> Result<(), KioskError> {
        let price = ctx.builder.pure(&ctx.price)?;
        let fee = ctx.builder.move_call(
            ctx.package_id,
            "royalty_rule",
            "fee_amount",
            vec![ctx.item_type.clone()],
            vec![ctx.policy, price],
        )?;
        let gas = ctx.builder.gas();
        let fee_coin = ctx.builder.split_coins(gas, vec![fee])?.nested(0);
        ctx.builder.move_call(
            ctx.package_id,
            "royalty_rule",
            "pay",
            vec![ctx.item_type.clone()],
            vec![ctx.policy, ctx.transfer_request, fee_coin],
        )?;
        Ok(())
    }
}

/// Locks the purchased item in the buyer's kiosk and proves the lock.
pub struct KioskLockRuleResolver;

#[async_trait]
impl RuleResolver for KioskLockRuleResolver {
    async fn resolve(&self, ctx: &mut ResolveContext<'_>) -> Result<(), KioskError> {
        let (kiosk, cap) = ctx.buyer_kiosk_pair("kiosk_lock_rule")?;
        ctx.builder.move_call(
            Address::FRAMEWORK,
            "kiosk",
            "lock",
            vec![ctx.item_type.clone()],
            vec![kiosk, cap, ctx.policy, ctx.item],
        )?;
        ctx.builder.move_call(
            ctx.package_id,
            "kiosk_lock_rule",
            "prove",
            vec![ctx.item_type.clone()],
            vec![ctx.transfer_request, kiosk],
        )?;
        Ok(())
    }

    fn locks_item(&self) -> bool {
        true
    }
}

/// Proves the buyer's kiosk is a personal (soul-bound) kiosk.
pub struct PersonalKioskRuleResolver;

#[async_trait]
impl RuleResolver for PersonalKioskRuleResolver {
    async fn resolve(&self, ctx: &mut ResolveContext<'_>) -> Result<(), KioskError> {
        let (kiosk, _cap) = ctx.buyer_kiosk_pair("personal_kiosk_rule")?;
        ctx.builder.move_call(
            ctx.package_id,
            "personal_kiosk_rule",
            "prove",
            vec![ctx.item_type.clone()],
            vec![kiosk, ctx.transfer_request],
        )?;
        Ok(())
    }
}

/// Floor-price rule: enforced by the Move module at listing time, so
/// there is nothing to append at purchase time.
pub struct FloorPriceRuleResolver;

#[async_trait]
impl RuleResolver for FloorPriceRuleResolver {
    async fn resolve(&self, _ctx: &mut ResolveContext<'_>) -> Result<(), KioskError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn addr(n: u8) -> Address {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        Address::new(bytes)
    }

    fn ctx_args(builder: &mut ProgrammableTransactionBuilder) -> (Argument, Argument, Argument) {
        let policy = builder.shared_object(addr(10), 1, true).unwrap();
        // Stand-ins for the purchase command's outputs.
        (policy, Argument::NestedResult(0, 1), Argument::NestedResult(0, 0))
    }

    #[tokio::test]
    async fn royalty_rule_appends_fee_payment() {
        let mut builder = ProgrammableTransactionBuilder::new();
        let (policy, transfer_request, item) = ctx_args(&mut builder);
        let mut ctx = ResolveContext {
            builder: &mut builder,
            item_type: TypeTag::from_str("0x9::nft::Nft").unwrap(),
            item_id: addr(2),
            price: 10_000,
            package_id: addr(0xaa),
            policy,
            transfer_request,
            item,
            buyer_kiosk: None,
            buyer_kiosk_cap: None,
        };
        RoyaltyRuleResolver.resolve(&mut ctx).await.unwrap();
        // fee_amount, split, pay.
        assert_eq!(builder.commands().len(), 3);
    }

    #[tokio::test]
    async fn lock_rule_requires_buyer_kiosk() {
        let mut builder = ProgrammableTransactionBuilder::new();
        let (policy, transfer_request, item) = ctx_args(&mut builder);
        let mut ctx = ResolveContext {
            builder: &mut builder,
            item_type: TypeTag::from_str("0x9::nft::Nft").unwrap(),
            item_id: addr(2),
            price: 10_000,
            package_id: addr(0xbb),
            policy,
            transfer_request,
            item,
            buyer_kiosk: None,
            buyer_kiosk_cap: None,
        };
        let err = KioskLockRuleResolver.resolve(&mut ctx).await.unwrap_err();
        assert!(matches!(err, KioskError::MissingBuyerKiosk(_)));
        assert!(KioskLockRuleResolver.locks_item());
    }

    #[tokio::test]
    async fn floor_price_rule_appends_nothing() {
        let mut builder = ProgrammableTransactionBuilder::new();
        let (policy, transfer_request, item) = ctx_args(&mut builder);
        let before = builder.commands().len();
        let mut ctx = ResolveContext {
            builder: &mut builder,
            item_type: TypeTag::from_str("0x9::nft::Nft").unwrap(),
            item_id: addr(2),
            price: 10_000,
            package_id: addr(0xcc),
            policy,
            transfer_request,
            item,
            buyer_kiosk: None,
            buyer_kiosk_cap: None,
        };
        FloorPriceRuleResolver.resolve(&mut ctx).await.unwrap();
        assert_eq!(builder.commands().len(), before);
    }
}
