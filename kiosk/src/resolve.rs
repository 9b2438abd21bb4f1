//! The purchase flow: buy a listed item and satisfy its transfer policy
//! inside a single transaction.
//!
//! # Lifecycle
//!
//! 1. Look up the listing and the item type's transfer policy.
//! 2. Append `kiosk::purchase`, producing the item and a
//!    `TransferRequest` hot potato.
//! 3. Walk the policy's required rules in on-chain order, awaiting each
//!    registered resolver in turn. Resolvers append commands; nothing is
//!    ever removed or reordered.
//! 4. Append `transfer_policy::confirm_request` to consume the request.
//! 5. Unless a locking rule already placed the item in the buyer's
//!    kiosk, transfer it to the buyer.
//!
//! A rule with no registered resolver aborts the walk with
//! [`KioskError::UnresolvableRule`]. Commands appended by earlier rules
//! stay in the builder; the caller decides whether to discard it.

use lumen_sdk::transaction::{Argument, ProgrammableTransactionBuilder};
use lumen_sdk::types::{Address, TypeTag};
use tracing::{debug, info, warn};

use crate::client::KioskClient;
use crate::error::KioskError;
use crate::rules::ResolveContext;
use crate::types::{OwnedKiosk, TransferPolicy};

// ---------------------------------------------------------------------------
// Status tracking
// ---------------------------------------------------------------------------

/// Progress of a rule-resolution walk.
///
/// Transitions: `Pending` -> `Resolving` (repeatedly, once per rule) ->
/// `Complete` or `Failed`. Terminal states never transition again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolveStatus {
    /// No rule has been looked at yet.
    #[default]
    Pending,
    /// The named rule's resolver is running.
    Resolving(String),
    /// Every required rule was satisfied.
    Complete,
    /// The named rule could not be satisfied.
    Failed(String),
}

impl ResolveStatus {
    /// Whether the walk has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResolveStatus::Complete | ResolveStatus::Failed(_))
    }

    fn start_rule(&mut self, rule: &str) {
        debug_assert!(!self.is_terminal());
        *self = ResolveStatus::Resolving(rule.to_string());
    }

    fn complete(&mut self) {
        debug_assert!(!self.is_terminal());
        *self = ResolveStatus::Complete;
    }

    fn fail(&mut self, rule: &str) {
        debug_assert!(!self.is_terminal());
        *self = ResolveStatus::Failed(rule.to_string());
    }
}

// ---------------------------------------------------------------------------
// Purchase parameters and outcome
// ---------------------------------------------------------------------------

/// What to buy, from where, for whom.
#[derive(Debug, Clone)]
pub struct PurchaseParams {
    /// Canonical type tag of the item, e.g. `0x9::nft::Nft`.
    pub item_type: String,
    /// Object ID of the listed item.
    pub item_id: Address,
    /// The seller's kiosk holding the listing.
    pub seller_kiosk: Address,
    /// Recipient of the purchased item.
    pub buyer: Address,
    /// The buyer's own kiosk, required when the policy carries a locking
    /// or personal-kiosk rule.
    pub buyer_kiosk: Option<OwnedKiosk>,
}

/// What the purchase flow appended and where the item ended up.
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    /// The purchased item, for further use in the same transaction.
    /// Meaningless if the item was locked.
    pub item: Argument,
    /// Rules satisfied, in resolution order.
    pub resolved_rules: Vec<String>,
    /// True when a locking rule placed the item in the buyer's kiosk
    /// instead of transferring it out.
    pub item_locked: bool,
    /// Listing price that was paid, in base units.
    pub price: u64,
    /// Terminal state of the rule walk. Always [`ResolveStatus::Complete`]
    /// on success; a failed walk surfaces its rule in the error instead.
    pub status: ResolveStatus,
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

impl KioskClient {
    /// Appends a complete purchase of a listed item to `builder`,
    /// satisfying every rule of the item type's transfer policy.
    ///
    /// On error the builder keeps everything appended so far; callers
    /// that cannot proceed should discard it rather than trying to
    /// salvage the partial command list.
    pub async fn purchase_and_resolve(
        &self,
        builder: &mut ProgrammableTransactionBuilder,
        params: &PurchaseParams,
    ) -> Result<PurchaseOutcome, KioskError> {
        let item_type: TypeTag = params
            .item_type
            .parse()
            .map_err(|_| KioskError::InvalidItemType(params.item_type.clone()))?;

        let kiosk = self.query().fetch_kiosk(&params.seller_kiosk).await?;
        let listing = kiosk
            .listing(&params.item_id)
            .ok_or(KioskError::ItemNotListed {
                kiosk_id: params.seller_kiosk,
                item_id: params.item_id,
            })?;
        let price = listing.price;

        let policies = self
            .query()
            .fetch_transfer_policies(&params.item_type)
            .await?;
        // Several policies per type are possible on chain; the first one
        // reported is the one enforced here.
        let policy = policies
            .first()
            .ok_or_else(|| KioskError::PolicyNotFound(params.item_type.clone()))?;

        info!(
            item = %params.item_id,
            kiosk = %params.seller_kiosk,
            price,
            rules = policy.required_rules.len(),
            "building kiosk purchase"
        );

        // The purchase itself: pay the listing price, receive the item
        // and the TransferRequest hot potato.
        let seller_kiosk = builder.shared_object(kiosk.kiosk_id, kiosk.initial_shared_version, true)?;
        let item_id = builder.pure(&params.item_id)?;
        let price_arg = builder.pure(&price)?;
        let gas = builder.gas();
        let payment = builder.split_coins(gas, vec![price_arg])?.nested(0);
        let purchase = builder.move_call(
            Address::FRAMEWORK,
            "kiosk",
            "purchase",
            vec![item_type.clone()],
            vec![seller_kiosk, item_id, payment],
        )?;
        let item = purchase.nested(0);
        let transfer_request = purchase.nested(1);

        let policy_arg =
            builder.shared_object(policy.policy_id, policy.initial_shared_version, true)?;

        let (buyer_kiosk, buyer_kiosk_cap) = match params.buyer_kiosk {
            Some(owned) => {
                let kiosk_arg =
                    builder.shared_object(owned.kiosk_id, owned.initial_shared_version, true)?;
                let cap_arg = builder.object(owned.cap)?;
                (Some(kiosk_arg), Some(cap_arg))
            }
            None => (None, None),
        };

        let mut ctx = ResolveContext {
            builder,
            item_type: item_type.clone(),
            item_id: params.item_id,
            price,
            package_id: Address::ZERO,
            policy: policy_arg,
            transfer_request,
            item,
            buyer_kiosk,
            buyer_kiosk_cap,
        };
        let resolution = self.resolve_rules(policy, &mut ctx).await?;

        builder.move_call(
            Address::FRAMEWORK,
            "transfer_policy",
            "confirm_request",
            vec![item_type],
            vec![policy_arg, transfer_request],
        )?;

        if !resolution.item_locked {
            let buyer = builder.pure(&params.buyer)?;
            builder.transfer_objects(vec![item], buyer)?;
        }

        Ok(PurchaseOutcome {
            item,
            resolved_rules: resolution.resolved,
            item_locked: resolution.item_locked,
            price,
            status: resolution.status,
        })
    }

    /// Walks a policy's required rules in order, awaiting each
    /// registered resolver sequentially.
    ///
    /// Strictly sequential: a later rule may reference commands an
    /// earlier one appended, so resolvers never run concurrently.
    pub async fn resolve_rules(
        &self,
        policy: &TransferPolicy,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<RulesResolved, KioskError> {
        let mut status = ResolveStatus::Pending;
        let mut resolved = Vec::with_capacity(policy.required_rules.len());
        let mut item_locked = false;

        for rule in &policy.required_rules {
            status.start_rule(rule);
            let Some(entry) = self.rule_resolver(rule) else {
                status.fail(rule);
                warn!(%rule, "no resolver registered for required rule");
                return Err(KioskError::UnresolvableRule(rule.clone()));
            };
            ctx.package_id = entry.package_id;
            if let Err(err) = entry.resolver.resolve(ctx).await {
                status.fail(rule);
                return Err(err);
            }
            item_locked |= entry.resolver.locks_item();
            resolved.push(rule.clone());
            debug!(%rule, "rule resolved");
        }

        status.complete();
        info!(rules = resolved.len(), item_locked, "transfer policy satisfied");
        Ok(RulesResolved {
            resolved,
            item_locked,
            status,
        })
    }
}

/// Result of a successful rule walk.
#[derive(Debug, Clone)]
pub struct RulesResolved {
    /// Rules satisfied, in resolution order.
    pub resolved: Vec<String>,
    /// Whether any satisfied rule locks the item.
    pub item_locked: bool,
    /// Terminal state of the walk.
    pub status: ResolveStatus,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
