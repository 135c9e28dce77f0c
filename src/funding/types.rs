//! Type definitions for funding opportunities and applications.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp, UserId};

// ============================================================================
// FundingOpportunity — The full stored record
// ============================================================================

/// A stored funding opportunity.
///
/// Authored by a provider account; founders apply against it with one
/// startup per application.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingOpportunity {
    /// Unique identifier. Demo opportunities use fixed ids like `fund-001`.
    pub id: RecordId,

    /// The account offering the funding.
    pub provider_id: UserId,

    /// Headline shown to applicants.
    #[serde(default)]
    pub title: String,

    /// Full description of the opportunity.
    #[serde(default)]
    pub description: String,

    /// Total amount on offer, in integer currency units.
    #[serde(default)]
    pub amount: u64,

    /// Application deadline. Informational; late applications are the
    /// provider's call to reject, not the data core's.
    #[serde(default)]
    pub deadline: Timestamp,

    /// Eligibility requirements, one entry per requirement.
    #[serde(default)]
    pub requirements: Vec<String>,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

// ============================================================================
// Application status
// ============================================================================

/// Review state of a funding application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Waiting for the provider's decision.
    #[default]
    Pending,
    /// Selected by the provider.
    Approved,
    /// Not selected. The applicant may apply again.
    Rejected,
}

// ============================================================================
// Application — The full stored record
// ============================================================================

/// A stored funding application.
///
/// At most one *pending* application may exist per (opportunity,
/// applicant) pair; a rejected application does not block a fresh
/// attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Unique identifier.
    pub id: RecordId,

    /// The opportunity being applied to.
    pub opportunity_id: RecordId,

    /// The startup being pitched.
    pub startup_id: RecordId,

    /// The applying user.
    pub applicant_id: UserId,

    /// The pitch text.
    #[serde(default)]
    pub pitch: String,

    /// Review state.
    #[serde(default)]
    pub status: ApplicationStatus,

    /// When the application was submitted.
    #[serde(default)]
    pub submitted_at: Timestamp,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

// ============================================================================
// NewApplication — Input for submit_application()
// ============================================================================

/// Input for applying to a funding opportunity via
/// [`IgniteDb::submit_application()`](crate::IgniteDb).
#[derive(Clone, Debug)]
pub struct NewApplication {
    /// The opportunity to apply to.
    pub opportunity_id: RecordId,

    /// The startup being pitched.
    pub startup_id: RecordId,

    /// The applying user.
    pub applicant_id: UserId,

    /// The pitch text (non-empty, max 4 KB).
    pub pitch: String,
}

// ============================================================================
// ApplicationOutcome
// ============================================================================

/// Result of a funding application attempt.
#[derive(Clone, Debug)]
pub enum ApplicationOutcome {
    /// The application was recorded and awaits review.
    Submitted(Application),
    /// A pending application from this user already exists for the
    /// opportunity.
    Duplicate {
        /// Human-readable explanation naming the conflict.
        reason: String,
    },
}

impl ApplicationOutcome {
    /// Returns true if an application was recorded.
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    /// Returns the recorded application, if any.
    pub fn submitted(&self) -> Option<&Application> {
        match self {
            Self::Submitted(application) => Some(application),
            Self::Duplicate { .. } => None,
        }
    }

    /// Returns the duplicate explanation, if the attempt was a duplicate.
    pub fn duplicate_reason(&self) -> Option<&str> {
        match self {
            Self::Submitted(_) => None,
            Self::Duplicate { reason } => Some(reason),
        }
    }
}
