//! Type definitions for mentors and mentorship requests.

use serde::{Deserialize, Serialize};

use crate::subscription::MentorshipEntitlement;
use crate::types::{RecordId, Timestamp, UserId};

// ============================================================================
// Availability
// ============================================================================

/// Whether a mentor is taking new requests.
///
/// Legacy records used `offline`, renamed to `unavailable` by the mentors
/// migration step; anything unrecognized reads as
/// [`Availability::Available`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Temporarily at capacity.
    Busy,
    /// Not taking requests.
    Unavailable,
    /// Open for new mentorship requests. The default.
    #[default]
    #[serde(other)]
    Available,
}

// ============================================================================
// Mentor — The full stored record
// ============================================================================

/// A stored mentor profile.
///
/// Premium mentors (`requires_payment`) bypass the token quota entirely:
/// requesting them is always allowed and carries their session price for
/// out-of-band settlement.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentor {
    /// Unique identifier. Demo mentors use fixed ids like `mentor-001`.
    pub id: RecordId,

    /// The platform account behind this profile, when linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Areas of expertise.
    #[serde(default)]
    pub expertise: Vec<String>,

    /// Whether the mentor is taking requests.
    #[serde(default)]
    pub availability: Availability,

    /// Whether sessions are paid.
    #[serde(default)]
    pub requires_payment: bool,

    /// Per-session price in integer currency units. The mentors migration
    /// step guarantees premium mentors carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_price: Option<u32>,

    /// Short biography.
    #[serde(default)]
    pub bio: String,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

// ============================================================================
// Request status and payment
// ============================================================================

/// Review state of a mentorship request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Waiting for the mentor's decision.
    #[default]
    Pending,
    /// Accepted by the mentor.
    Approved,
    /// Declined by the mentor.
    Rejected,
}

/// Settlement state of a paid session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment owed; settled outside the data core.
    Pending,
    /// Payment confirmed.
    Paid,
}

// ============================================================================
// MentorshipRequest — The full stored record
// ============================================================================

/// A stored mentorship request.
///
/// Payment terms are captured at creation time from the mentor's profile,
/// so a mentor later changing their price never rewrites history. A
/// request to a free mentor consumes one mentorship token whatever its
/// eventual status; pending and rejected requests count too.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipRequest {
    /// Unique identifier.
    pub id: RecordId,

    /// The requesting user.
    pub innovator_id: UserId,

    /// The mentor being requested.
    pub mentor_id: RecordId,

    /// Message to the mentor.
    #[serde(default)]
    pub message: String,

    /// Review state.
    #[serde(default)]
    pub status: RequestStatus,

    /// Whether this session is paid (captured from the mentor at creation).
    #[serde(default)]
    pub requires_payment: bool,

    /// Agreed price for a paid session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_amount: Option<u32>,

    /// Settlement state for a paid session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,

    /// When the request was made.
    #[serde(default)]
    pub created_at: Timestamp,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

// ============================================================================
// NewMentorshipRequest — Input for request_mentorship()
// ============================================================================

/// Input for requesting mentorship via
/// [`IgniteDb::request_mentorship()`](crate::IgniteDb).
///
/// Payment fields are filled in by the data core from the mentor's
/// profile; callers only say who, whom, and why.
#[derive(Clone, Debug)]
pub struct NewMentorshipRequest {
    /// The requesting user. Token quota is checked against this user.
    pub innovator_id: UserId,

    /// The mentor to request (must exist).
    pub mentor_id: RecordId,

    /// Message to the mentor (non-empty, max 2 KB).
    pub message: String,
}

// ============================================================================
// MentorshipOutcome
// ============================================================================

/// Result of a mentorship request attempt.
#[derive(Clone, Debug)]
pub enum MentorshipOutcome {
    /// The request was recorded and awaits the mentor's review.
    Submitted(MentorshipRequest),
    /// The user is out of mentorship tokens.
    Denied(MentorshipEntitlement),
}

impl MentorshipOutcome {
    /// Returns true if a request was recorded.
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    /// Returns the recorded request, if any.
    pub fn submitted(&self) -> Option<&MentorshipRequest> {
        match self {
            Self::Submitted(request) => Some(request),
            Self::Denied(_) => None,
        }
    }

    /// Returns the entitlement that denied the request, if any.
    pub fn denial(&self) -> Option<&MentorshipEntitlement> {
        match self {
            Self::Submitted(_) => None,
            Self::Denied(entitlement) => Some(entitlement),
        }
    }
}
