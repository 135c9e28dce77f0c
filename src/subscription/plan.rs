//! The plan table: quotas and prices per subscription tier.
//!
//! Every entitlement number in the system lives here. The engine never
//! stores quotas on user or subscription records; it re-derives them from
//! this table plus owned-record counts on every check, so a plan change
//! ships as a table edit, not a data migration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How long a purchased top-up stays valid.
pub const PURCHASE_VALIDITY_DAYS: i64 = 365;

/// How long a subscription term runs before it expires.
pub const SUBSCRIPTION_TERM_DAYS: i64 = 365;

// ============================================================================
// PlanTier
// ============================================================================

/// Subscription tier.
///
/// Stored lowercase with a hyphen (`free`, `pro`, `pro-plus`). A tier
/// this build does not recognize reads as [`PlanTier::Free`], so records
/// from newer builds degrade safely instead of failing to decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanTier {
    /// Promo-gated paid tier.
    Pro,
    /// Unlimited tier.
    ProPlus,
    /// The implicit tier of every user without an active subscription.
    #[default]
    #[serde(other)]
    Free,
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanTier::Free => write!(f, "free"),
            PlanTier::Pro => write!(f, "pro"),
            PlanTier::ProPlus => write!(f, "pro-plus"),
        }
    }
}

// ============================================================================
// Quota
// ============================================================================

/// A quota from the plan table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quota {
    /// At most this many.
    Limited(u32),
    /// No cap.
    Unlimited,
}

impl Quota {
    /// Returns true if one more is allowed at the given usage.
    pub fn allows(&self, used: u32) -> bool {
        match self {
            Quota::Limited(limit) => used < *limit,
            Quota::Unlimited => true,
        }
    }

    /// Returns the numeric cap, or `None` when unlimited.
    pub fn limit(&self) -> Option<u32> {
        match self {
            Quota::Limited(limit) => Some(*limit),
            Quota::Unlimited => None,
        }
    }

    /// Returns this quota raised by `extra` (top-ups). Unlimited absorbs
    /// any raise.
    pub fn plus(&self, extra: u32) -> Quota {
        match self {
            Quota::Limited(limit) => Quota::Limited(limit.saturating_add(extra)),
            Quota::Unlimited => Quota::Unlimited,
        }
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quota::Limited(limit) => write!(f, "{}", limit),
            Quota::Unlimited => write!(f, "unlimited"),
        }
    }
}

// ============================================================================
// Plan
// ============================================================================

/// One row of the plan table.
#[derive(Clone, Copy, Debug)]
pub struct Plan {
    /// The tier this row describes.
    pub tier: PlanTier,
    /// How many startup listings the tier includes.
    pub startup_listings: Quota,
    /// How many mentorship tokens the tier includes.
    pub mentorship_tokens: Quota,
    /// Price of one extra listing slot, when the tier sells them.
    pub on_demand_listing_price: Option<u32>,
    /// Price of one extra mentorship token, when the tier sells them.
    pub on_demand_token_price: Option<u32>,
}

const FREE: Plan = Plan {
    tier: PlanTier::Free,
    startup_listings: Quota::Limited(1),
    mentorship_tokens: Quota::Limited(1),
    on_demand_listing_price: Some(499),
    on_demand_token_price: Some(299),
};

const PRO: Plan = Plan {
    tier: PlanTier::Pro,
    startup_listings: Quota::Limited(5),
    mentorship_tokens: Quota::Limited(5),
    on_demand_listing_price: Some(299),
    on_demand_token_price: Some(199),
};

const PRO_PLUS: Plan = Plan {
    tier: PlanTier::ProPlus,
    startup_listings: Quota::Unlimited,
    mentorship_tokens: Quota::Unlimited,
    on_demand_listing_price: None,
    on_demand_token_price: None,
};

impl PlanTier {
    /// Looks this tier up in the plan table.
    pub fn plan(&self) -> &'static Plan {
        match self {
            PlanTier::Free => &FREE,
            PlanTier::Pro => &PRO,
            PlanTier::ProPlus => &PRO_PLUS,
        }
    }
}
