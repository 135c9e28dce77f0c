//! Type definitions for notifications, comments and activities.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp, UserId};

// ============================================================================
// Notification
// ============================================================================

/// A stored in-app notification.
///
/// Notifications are pushed by review operations (mentorship, application
/// and program decisions) and can also be pushed directly. They stay in
/// the collection after being read; only the flag flips.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique identifier.
    pub id: RecordId,

    /// The user this notification is addressed to.
    pub user_id: UserId,

    /// Short headline.
    #[serde(default)]
    pub title: String,

    /// Full message body.
    #[serde(default)]
    pub body: String,

    /// Whether the user has seen it.
    #[serde(default)]
    pub read: bool,

    /// When it was pushed.
    #[serde(default)]
    pub created_at: Timestamp,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

// ============================================================================
// Comment
// ============================================================================

/// A stored comment on a startup listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique identifier.
    pub id: RecordId,

    /// The listing this comment is attached to.
    pub startup_id: RecordId,

    /// Who wrote it.
    pub author_id: UserId,

    /// Comment text.
    #[serde(default)]
    pub body: String,

    /// When it was posted.
    #[serde(default)]
    pub created_at: Timestamp,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

// ============================================================================
// Activity
// ============================================================================

/// A stored activity log entry.
///
/// The activities collection is append-only: notable operations (listing
/// creation, applications, registrations, subscriptions, purchases) each
/// append one entry for the acting user. Nothing ever rewrites or removes
/// entries.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Unique identifier.
    pub id: RecordId,

    /// The acting user.
    pub user_id: UserId,

    /// What happened, as a stable token (`created_startup`,
    /// `submitted_application`, ...).
    #[serde(default)]
    pub action: String,

    /// The record the action was about, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<RecordId>,

    /// When it happened.
    #[serde(default)]
    pub created_at: Timestamp,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}
