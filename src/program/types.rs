//! Type definitions for programs, events, and their registrations.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp, UserId};

// ============================================================================
// Program — The full stored record
// ============================================================================

/// A stored accelerator or incubator program.
///
/// `enrolled` counts registrations that currently hold a place (pending
/// or approved). It moves in the same storage transaction as the
/// registration write, so a single process never observes the counter
/// and the registration list disagreeing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// Unique identifier. Demo programs use fixed ids like `program-001`.
    pub id: RecordId,

    /// Program name.
    #[serde(default)]
    pub title: String,

    /// Full description.
    #[serde(default)]
    pub description: String,

    /// Application deadline. Registrations after this are closed.
    #[serde(default)]
    pub deadline: Timestamp,

    /// Maximum participants; `None` means uncapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,

    /// Registrations currently holding a place.
    #[serde(default)]
    pub enrolled: u32,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

// ============================================================================
// Event — The full stored record
// ============================================================================

/// A stored community event.
///
/// Events skip the review step: registering confirms a place
/// immediately, and `registered` moves atomically with the registration
/// write just like a program's `enrolled` counter.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier. Demo events use fixed ids like `event-001`.
    pub id: RecordId,

    /// Event name.
    #[serde(default)]
    pub title: String,

    /// Full description.
    #[serde(default)]
    pub description: String,

    /// When the event takes place. Registration closes at this moment.
    #[serde(default)]
    pub date: Timestamp,

    /// Venue or meeting link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Maximum attendees; `None` means uncapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,

    /// Confirmed attendees.
    #[serde(default)]
    pub registered: u32,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

// ============================================================================
// Registration status
// ============================================================================

/// Review state of a program or event registration.
///
/// Program registrations walk `pending → approved | rejected`; event
/// registrations are born `confirmed` and never change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Waiting for the organizer's decision.
    #[default]
    Pending,
    /// Accepted into the program.
    Approved,
    /// Turned down. The place is released.
    Rejected,
    /// Holding a confirmed place (events only).
    Confirmed,
}

impl RegistrationStatus {
    /// Whether a registration in this state holds a place against
    /// capacity.
    pub fn holds_place(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

// ============================================================================
// Registration records
// ============================================================================

/// A stored program registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRegistration {
    /// Unique identifier.
    pub id: RecordId,

    /// The program applied to.
    pub program_id: RecordId,

    /// The applying user.
    pub user_id: UserId,

    /// Review state.
    #[serde(default)]
    pub status: RegistrationStatus,

    /// When the registration was made.
    #[serde(default)]
    pub registered_at: Timestamp,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

/// A stored event registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistration {
    /// Unique identifier.
    pub id: RecordId,

    /// The event registered for.
    pub event_id: RecordId,

    /// The attending user.
    pub user_id: UserId,

    /// Always `confirmed` for records created by this crate.
    #[serde(default)]
    pub status: RegistrationStatus,

    /// When the registration was made.
    #[serde(default)]
    pub registered_at: Timestamp,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

// ============================================================================
// Inputs
// ============================================================================

/// Input for applying to a program via
/// [`IgniteDb::register_for_program()`](crate::IgniteDb).
#[derive(Clone, Debug)]
pub struct NewProgramRegistration {
    /// The program to apply to (must exist).
    pub program_id: RecordId,

    /// The applying user.
    pub user_id: UserId,
}

/// Input for registering for an event via
/// [`IgniteDb::register_for_event()`](crate::IgniteDb).
#[derive(Clone, Debug)]
pub struct NewEventRegistration {
    /// The event to attend (must exist).
    pub event_id: RecordId,

    /// The attending user.
    pub user_id: UserId,
}

// ============================================================================
// RegistrationOutcome
// ============================================================================

/// Result of a registration attempt, for programs and events alike.
///
/// Every refusal is data, not an error; the reasons are user-facing and
/// name the obstacle.
#[derive(Clone, Debug)]
pub enum RegistrationOutcome<R> {
    /// A place was taken and the offering's counter moved with it.
    Registered(R),
    /// The user already holds a live registration for this offering.
    Duplicate {
        /// Human-readable explanation.
        reason: String,
    },
    /// The offering is at capacity.
    Full {
        /// Human-readable explanation.
        reason: String,
    },
    /// The deadline has passed (or the event already happened).
    Closed {
        /// Human-readable explanation.
        reason: String,
    },
    /// No offering with the given id exists.
    NotFound,
}

impl<R> RegistrationOutcome<R> {
    /// Returns true if a registration was recorded.
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered(_))
    }

    /// Returns the recorded registration, if any.
    pub fn registered(&self) -> Option<&R> {
        match self {
            Self::Registered(registration) => Some(registration),
            _ => None,
        }
    }

    /// Returns the refusal explanation for duplicate, full, and closed
    /// outcomes.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Duplicate { reason } | Self::Full { reason } | Self::Closed { reason } => {
                Some(reason)
            }
            _ => None,
        }
    }
}
