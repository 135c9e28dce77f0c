//! Type definitions for subscriptions, promo codes and the purchase ledger.

use serde::{Deserialize, Serialize};

use super::plan::{PlanTier, Quota};
use crate::types::{RecordId, Timestamp, UserId};

// ============================================================================
// Subscription
// ============================================================================

/// Lifecycle status of a subscription record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Currently in force (until `expires_at`).
    #[default]
    Active,
    /// Replaced by a newer subscription or cancelled by the user.
    Cancelled,
    /// Marked as past its term.
    Expired,
}

/// A stored subscription record.
///
/// At most one per user is active; [`subscribe`](crate::IgniteDb::subscribe)
/// cancels prior active records in the same write. A record whose
/// `expires_at` has passed counts as free tier even while its stored
/// status still says `active`; expiry is re-derived on every entitlement
/// check rather than patched in place.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Unique identifier.
    pub id: RecordId,

    /// The subscribed user.
    pub user_id: UserId,

    /// Plan tier this subscription grants.
    #[serde(default)]
    pub tier: PlanTier,

    /// Lifecycle status.
    #[serde(default)]
    pub status: SubscriptionStatus,

    /// When the term started.
    #[serde(default)]
    pub started_at: Timestamp,

    /// When the term ends. `None` means it never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,

    /// The promo code redeemed at subscribe time, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,

    /// Institution carried over from the promo code, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

impl Subscription {
    /// Returns true if this record is in force at `now`.
    pub fn in_force(&self, now: Timestamp) -> bool {
        self.status == SubscriptionStatus::Active
            && self.expires_at.map_or(true, |expiry| now.is_before(expiry))
    }
}

// ============================================================================
// PromoCode
// ============================================================================

/// A stored promo code.
///
/// Codes gate the `pro` tier: subscribing to pro requires a valid code
/// targeting pro. `used_count` moves only inside
/// [`subscribe`](crate::IgniteDb::subscribe); verification never burns a
/// use.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    /// Unique identifier.
    pub id: RecordId,

    /// The code users type in.
    pub code: String,

    /// Institution the code belongs to, stamped onto subscriptions made
    /// with it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    /// The tier this code unlocks.
    #[serde(default)]
    pub tier: PlanTier,

    /// Whether the code can currently be redeemed.
    #[serde(default = "default_active")]
    pub active: bool,

    /// Redemption cap. `None` means uncapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,

    /// How many times the code has been redeemed.
    #[serde(default)]
    pub used_count: u32,

    /// When the code stops working. `None` means it never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

fn default_active() -> bool {
    true
}

// ============================================================================
// PromoCheck
// ============================================================================

/// Result of verifying a promo code.
///
/// Verification is read-only. An invalid check carries a human-readable
/// reason; a valid one carries the matched record so callers can show the
/// institution or tier before subscribing.
#[derive(Clone, Debug)]
pub struct PromoCheck {
    /// Whether the code can be redeemed right now.
    pub valid: bool,

    /// Why not, when invalid.
    pub reason: Option<String>,

    /// The matched code record, when one exists.
    pub promo: Option<PromoCode>,
}

impl PromoCheck {
    pub(crate) fn rejected(reason: impl Into<String>, promo: Option<PromoCode>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
            promo,
        }
    }
}

// ============================================================================
// On-demand purchase ledger
// ============================================================================

/// What an on-demand purchase buys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseKind {
    /// One extra startup listing slot.
    StartupListing,
    /// One extra mentorship token.
    MentorshipToken,
}

/// A stored purchase ledger entry.
///
/// The ledger is append-only. Nothing is ever marked consumed: effective
/// quota is re-derived as plan base plus the count of entries younger
/// than the validity window.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnDemandPurchase {
    /// Unique identifier.
    pub id: RecordId,

    /// The purchasing user.
    pub user_id: UserId,

    /// What was bought.
    pub kind: PurchaseKind,

    /// Price paid, in integer currency units.
    #[serde(default)]
    pub price: u32,

    /// When it was bought. Validity runs from here.
    #[serde(default)]
    pub purchased_at: Timestamp,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

// ============================================================================
// Entitlements
// ============================================================================

/// What the entitlement engine says about creating one more listing.
#[derive(Clone, Debug)]
pub struct ListingEntitlement {
    /// Whether a new listing is allowed right now.
    pub allowed: bool,

    /// Why not, when denied. Human-readable and names the next step.
    pub reason: Option<String>,

    /// Listings the user currently owns.
    pub used: u32,

    /// Effective quota: plan base plus valid purchased top-ups.
    pub limit: Quota,

    /// Whether buying a top-up would unblock the user.
    pub can_purchase: bool,

    /// Price of that top-up, when purchasable.
    pub purchase_price: Option<u32>,
}

/// What the entitlement engine says about one more mentorship request.
#[derive(Clone, Debug)]
pub struct MentorshipEntitlement {
    /// Whether the request is allowed right now.
    pub allowed: bool,

    /// Why not, when denied.
    pub reason: Option<String>,

    /// Tokens left after valid top-ups; `None` when the plan is unlimited
    /// or the mentor is premium (tokens don't apply).
    pub tokens_remaining: Option<u32>,

    /// Whether buying a token would unblock the user.
    pub can_purchase: bool,

    /// Price of that token, when purchasable.
    pub purchase_price: Option<u32>,

    /// True when the mentor is premium: the request bypasses tokens and
    /// must be paid.
    pub requires_payment: bool,

    /// The premium mentor's session price.
    pub payment_amount: Option<u32>,
}

// ============================================================================
// SubscribeOutcome
// ============================================================================

/// Result of a subscribe attempt.
#[derive(Clone, Debug)]
pub enum SubscribeOutcome {
    /// The subscription is active; prior active records were cancelled.
    Subscribed(Subscription),
    /// The supplied promo code was rejected.
    PromoRejected(PromoCheck),
    /// The tier needs a promo code and none was supplied.
    PromoRequired,
}

impl SubscribeOutcome {
    /// Returns true if a subscription was created.
    pub fn is_subscribed(&self) -> bool {
        matches!(self, Self::Subscribed(_))
    }

    /// Returns the new subscription, if any.
    pub fn subscription(&self) -> Option<&Subscription> {
        match self {
            Self::Subscribed(subscription) => Some(subscription),
            _ => None,
        }
    }
}
