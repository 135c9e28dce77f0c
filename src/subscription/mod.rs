//! Subscriptions, promo codes, the purchase ledger, and the entitlement
//! engine built on top of them.
//!
//! # How entitlements work
//!
//! Nothing stores "remaining quota". Every check re-derives it:
//!
//! ```text
//! effective quota = plan table base (by active subscription tier)
//!                 + ledger entries younger than the validity window
//! allowed         = owned/used count < effective quota
//! ```
//!
//! The plan table lives in [`plan`]; the ledger is the append-only
//! `on_demand_purchases` collection. A subscription past its `expires_at`
//! counts as free tier without anyone patching its status.
//!
//! # Operations
//!
//! - [`check_create_listing`](crate::IgniteDb::check_create_listing),
//!   [`check_mentorship_request`](crate::IgniteDb::check_mentorship_request)
//! - [`on_demand_price`](crate::IgniteDb::on_demand_price),
//!   [`purchase_on_demand`](crate::IgniteDb::purchase_on_demand)
//! - [`verify_promo`](crate::IgniteDb::verify_promo),
//!   [`subscribe`](crate::IgniteDb::subscribe)
//! - [`active_subscription`](crate::IgniteDb::active_subscription)

pub mod plan;
pub mod types;

pub use plan::{Plan, PlanTier, Quota, PURCHASE_VALIDITY_DAYS, SUBSCRIPTION_TERM_DAYS};
pub use types::{
    ListingEntitlement, MentorshipEntitlement, OnDemandPurchase, PromoCheck, PromoCode,
    PurchaseKind, SubscribeOutcome, Subscription, SubscriptionStatus,
};

use tracing::{debug, info, instrument};

use crate::db::{encode_typed, IgniteDb};
use crate::error::Result;
use crate::migrate;
use crate::storage::Collection;
use crate::types::{RecordId, Timestamp, UserId};

impl IgniteDb {
    /// Reads every subscription record.
    pub fn subscriptions(&self) -> Result<Vec<Subscription>> {
        self.read_typed(Collection::Subscriptions)
    }

    /// Replaces the subscriptions collection.
    pub fn save_subscriptions(&self, subscriptions: &[Subscription]) -> Result<()> {
        self.write_typed(Collection::Subscriptions, subscriptions)
    }

    /// Reads every promo code.
    pub fn promo_codes(&self) -> Result<Vec<PromoCode>> {
        self.read_typed(Collection::PromoCodes)
    }

    /// Replaces the promo codes collection.
    pub fn save_promo_codes(&self, codes: &[PromoCode]) -> Result<()> {
        self.write_typed(Collection::PromoCodes, codes)
    }

    /// Reads the purchase ledger.
    pub fn on_demand_purchases(&self) -> Result<Vec<OnDemandPurchase>> {
        self.read_typed(Collection::OnDemandPurchases)
    }

    /// Replaces the purchase ledger.
    ///
    /// The ledger is meant to be append-only; this accessor exists for
    /// bulk import tooling.
    pub fn save_on_demand_purchases(&self, purchases: &[OnDemandPurchase]) -> Result<()> {
        self.write_typed(Collection::OnDemandPurchases, purchases)
    }

    /// Returns the user's subscription currently in force, if any.
    ///
    /// A record must be `active` and inside its term to count; expired
    /// records are ignored here (and therefore price as free tier) even
    /// though their stored status is never rewritten. When several
    /// qualify, the most recently started wins.
    pub fn active_subscription(&self, user: &UserId) -> Result<Option<Subscription>> {
        let now = Timestamp::now();
        Ok(self
            .subscriptions()?
            .into_iter()
            .filter(|s| s.user_id == *user && s.in_force(now))
            .max_by_key(|s| s.started_at))
    }

    /// Resolves the user's plan table row.
    fn plan_for(&self, user: &UserId) -> Result<&'static Plan> {
        let tier = self
            .active_subscription(user)?
            .map(|s| s.tier)
            .unwrap_or_default();
        Ok(tier.plan())
    }

    /// Counts the user's still-valid ledger entries of one kind.
    fn valid_purchase_count(
        &self,
        user: &UserId,
        kind: PurchaseKind,
        now: Timestamp,
    ) -> Result<u32> {
        let count = self
            .on_demand_purchases()?
            .iter()
            .filter(|p| {
                p.user_id == *user
                    && p.kind == kind
                    && now.is_before(p.purchased_at.plus_days(PURCHASE_VALIDITY_DAYS))
            })
            .count();
        Ok(count as u32)
    }

    // =========================================================================
    // Entitlement checks
    // =========================================================================

    /// Checks whether a user may create one more startup listing.
    ///
    /// Pure derivation: plan base plus valid listing top-ups versus owned
    /// listings. Never writes.
    pub fn check_create_listing(&self, user: &UserId) -> Result<ListingEntitlement> {
        let plan = self.plan_for(user)?;
        let now = Timestamp::now();

        let used = self
            .startups()?
            .iter()
            .filter(|s| s.owner_id == *user)
            .count() as u32;
        let top_ups = self.valid_purchase_count(user, PurchaseKind::StartupListing, now)?;
        let limit = plan.startup_listings.plus(top_ups);
        let allowed = limit.allows(used);

        let reason = if allowed {
            None
        } else {
            let mut reason = format!(
                "Your {} plan allows {} startup listing(s) and you already have {}.",
                plan.tier, limit, used
            );
            match plan.on_demand_listing_price {
                Some(price) => reason.push_str(&format!(
                    " Purchase an extra listing slot for {} or upgrade your plan.",
                    price
                )),
                None => reason.push_str(" Upgrade your plan to list more."),
            }
            Some(reason)
        };

        Ok(ListingEntitlement {
            allowed,
            reason,
            used,
            limit,
            can_purchase: plan.on_demand_listing_price.is_some(),
            purchase_price: plan.on_demand_listing_price,
        })
    }

    /// Checks whether a user may send one more mentorship request.
    ///
    /// A premium mentor short-circuits the quota: the request is allowed,
    /// flagged as paid, and carries the mentor's price. For free mentors,
    /// a token is consumed by every request whose stored payment flag is
    /// false, whatever its review status; pending and rejected requests
    /// count too.
    pub fn check_mentorship_request(
        &self,
        user: &UserId,
        mentor_requires_payment: bool,
        mentor_price: Option<u32>,
    ) -> Result<MentorshipEntitlement> {
        if mentor_requires_payment {
            return Ok(MentorshipEntitlement {
                allowed: true,
                reason: None,
                tokens_remaining: None,
                can_purchase: false,
                purchase_price: None,
                requires_payment: true,
                payment_amount: mentor_price,
            });
        }

        let plan = self.plan_for(user)?;
        let now = Timestamp::now();

        let used = self
            .mentorship_requests()?
            .iter()
            .filter(|r| r.innovator_id == *user && !r.requires_payment)
            .count() as u32;
        let top_ups = self.valid_purchase_count(user, PurchaseKind::MentorshipToken, now)?;
        let limit = plan.mentorship_tokens.plus(top_ups);
        let allowed = limit.allows(used);

        let tokens_remaining = limit.limit().map(|n| n.saturating_sub(used));
        let reason = if allowed {
            None
        } else {
            let mut reason = format!(
                "Your {} plan includes {} mentorship token(s) and all are used.",
                plan.tier, limit
            );
            match plan.on_demand_token_price {
                Some(price) => reason.push_str(&format!(
                    " Purchase another token for {} or upgrade your plan.",
                    price
                )),
                None => reason.push_str(" Upgrade your plan to request more."),
            }
            Some(reason)
        };

        Ok(MentorshipEntitlement {
            allowed,
            reason,
            tokens_remaining,
            can_purchase: plan.on_demand_token_price.is_some(),
            purchase_price: plan.on_demand_token_price,
            requires_payment: false,
            payment_amount: None,
        })
    }

    // =========================================================================
    // On-demand purchases
    // =========================================================================

    /// Quotes the on-demand price of one top-up for this user's tier.
    ///
    /// `None` means the tier never needs to buy this (unlimited).
    pub fn on_demand_price(&self, user: &UserId, kind: PurchaseKind) -> Result<Option<u32>> {
        let plan = self.plan_for(user)?;
        Ok(match kind {
            PurchaseKind::StartupListing => plan.on_demand_listing_price,
            PurchaseKind::MentorshipToken => plan.on_demand_token_price,
        })
    }

    /// Appends a top-up purchase to the ledger.
    ///
    /// Nothing else changes: the entry raises the user's effective quota
    /// on every subsequent entitlement check until it ages out of the
    /// validity window. Payment itself is settled outside the data core;
    /// `price` records what was quoted.
    #[instrument(skip(self), fields(user = %user))]
    pub fn purchase_on_demand(
        &self,
        user: &UserId,
        kind: PurchaseKind,
        price: u32,
    ) -> Result<OnDemandPurchase> {
        let purchase = OnDemandPurchase {
            id: RecordId::generate(),
            user_id: user.clone(),
            kind,
            price,
            purchased_at: Timestamp::now(),
            schema_version: migrate::current_version(Collection::OnDemandPurchases),
        };

        let mut purchases = self.on_demand_purchases()?;
        purchases.push(purchase.clone());
        self.write_typed(Collection::OnDemandPurchases, &purchases)?;

        self.log_activity(user, "purchased_on_demand", Some(&purchase.id))?;

        info!(purchase_id = %purchase.id, ?kind, price, "On-demand purchase recorded");
        Ok(purchase)
    }

    // =========================================================================
    // Promo codes and subscribing
    // =========================================================================

    /// Verifies a promo code without redeeming it.
    ///
    /// Valid iff the code exists, is active, is inside its expiry window,
    /// and has uses left when capped. Matching ignores case and
    /// surrounding whitespace. Never increments `used_count`.
    pub fn verify_promo(&self, code: &str) -> Result<PromoCheck> {
        let wanted = code.trim();
        let promo = self
            .promo_codes()?
            .into_iter()
            .find(|p| p.code.eq_ignore_ascii_case(wanted));

        let promo = match promo {
            Some(promo) => promo,
            None => return Ok(PromoCheck::rejected("Unknown promo code.", None)),
        };

        if !promo.active {
            return Ok(PromoCheck::rejected(
                "This promo code is no longer active.",
                Some(promo),
            ));
        }

        if let Some(expiry) = promo.expires_at {
            if !Timestamp::now().is_before(expiry) {
                return Ok(PromoCheck::rejected(
                    "This promo code has expired.",
                    Some(promo),
                ));
            }
        }

        if let Some(max_uses) = promo.max_uses {
            if promo.used_count >= max_uses {
                return Ok(PromoCheck::rejected(
                    "This promo code has reached its usage limit.",
                    Some(promo),
                ));
            }
        }

        Ok(PromoCheck {
            valid: true,
            reason: None,
            promo: Some(promo),
        })
    }

    /// Subscribes a user to a tier.
    ///
    /// The `pro` tier requires a valid promo code targeting pro; other
    /// tiers take an optional code, validated when given. Prior active
    /// subscriptions are cancelled, and the new record plus the promo
    /// usage increment are committed in one atomic storage write.
    ///
    /// # Errors
    ///
    /// Returns an error only if storage fails; promo problems are
    /// outcomes.
    #[instrument(skip(self), fields(user = %user, tier = %tier))]
    pub fn subscribe(
        &self,
        user: &UserId,
        tier: PlanTier,
        promo_code: Option<&str>,
    ) -> Result<SubscribeOutcome> {
        let promo = match promo_code {
            Some(code) => {
                let check = self.verify_promo(code)?;
                if !check.valid {
                    debug!("Promo code rejected");
                    return Ok(SubscribeOutcome::PromoRejected(check));
                }
                // verify_promo only returns valid with the record present.
                let promo = match check.promo {
                    Some(promo) => promo,
                    None => return Ok(SubscribeOutcome::PromoRejected(check)),
                };
                if promo.tier != tier {
                    let reason = format!("This promo code applies to the {} plan.", promo.tier);
                    return Ok(SubscribeOutcome::PromoRejected(PromoCheck::rejected(
                        reason,
                        Some(promo),
                    )));
                }
                Some(promo)
            }
            None if tier == PlanTier::Pro => {
                debug!("Pro subscription attempted without a promo code");
                return Ok(SubscribeOutcome::PromoRequired);
            }
            None => None,
        };

        let now = Timestamp::now();
        let subscription = Subscription {
            id: RecordId::generate(),
            user_id: user.clone(),
            tier,
            status: SubscriptionStatus::Active,
            started_at: now,
            expires_at: Some(now.plus_days(SUBSCRIPTION_TERM_DAYS)),
            promo_code: promo.as_ref().map(|p| p.code.clone()),
            institution: promo.as_ref().and_then(|p| p.institution.clone()),
            schema_version: migrate::current_version(Collection::Subscriptions),
        };

        let mut subscriptions = self.subscriptions()?;
        for existing in subscriptions.iter_mut() {
            if existing.user_id == *user && existing.status == SubscriptionStatus::Active {
                existing.status = SubscriptionStatus::Cancelled;
            }
        }
        subscriptions.push(subscription.clone());

        // New subscription and promo redemption commit or fail together.
        let mut batches = vec![(Collection::Subscriptions, encode_typed(&subscriptions)?)];
        if let Some(ref redeemed) = promo {
            let mut codes = self.promo_codes()?;
            if let Some(stored) = codes.iter_mut().find(|c| c.id == redeemed.id) {
                stored.used_count = stored.used_count.saturating_add(1);
            }
            batches.push((Collection::PromoCodes, encode_typed(&codes)?));
        }
        self.write_batches(&batches)?;

        self.log_activity(user, "subscribed", Some(&subscription.id))?;

        info!(subscription_id = %subscription.id, "Subscribed");
        Ok(SubscribeOutcome::Subscribed(subscription))
    }
}
