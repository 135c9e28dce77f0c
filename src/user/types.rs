//! Type definitions for marketplace users.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp, UserId};

// ============================================================================
// Role
// ============================================================================

/// What a user is on the platform.
///
/// The stored value is lowercase on the wire. `student` was renamed to
/// `innovator` when the platform opened beyond universities; the rename is
/// applied by the users migration step, and any value this build does not
/// recognize also reads as [`Role::Innovator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Offers mentorship sessions.
    Mentor,
    /// Posts programs, events and funding opportunities.
    Business,
    /// Browses and funds listings.
    Investor,
    /// Builds and lists startups. The default role.
    #[default]
    #[serde(other)]
    Innovator,
}

// ============================================================================
// User — The full stored record
// ============================================================================

/// A stored marketplace user.
///
/// Users are never hard-deleted; departures set the `retired` flag so that
/// records referencing the user (comments, applications, registrations)
/// keep resolving.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier. Generated ids are UUID v7; demo ids are fixed
    /// strings like `demo-user`.
    pub id: UserId,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Contact email.
    #[serde(default)]
    pub email: String,

    /// Platform role.
    #[serde(default)]
    pub role: Role,

    /// Affiliated institution, when the user signed up through one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    /// Id of the user's subscription record, when one was ever linked.
    ///
    /// Informational only: entitlement checks derive the active plan from
    /// the subscriptions collection, not from this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<RecordId>,

    /// When the account was created.
    #[serde(default)]
    pub created_at: Timestamp,

    /// Soft-retire flag.
    #[serde(default)]
    pub retired: bool,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

impl User {
    /// Creates a new user at the current schema version.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::generate(),
            name: name.into(),
            email: email.into(),
            role,
            institution: None,
            subscription_id: None,
            created_at: Timestamp::now(),
            retired: false,
            schema_version: crate::migrate::current_version(crate::storage::Collection::Users),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_wire_values() {
        assert_eq!(serde_json::to_value(Role::Innovator).unwrap(), json!("innovator"));
        assert_eq!(serde_json::to_value(Role::Mentor).unwrap(), json!("mentor"));
        assert_eq!(serde_json::to_value(Role::Business).unwrap(), json!("business"));
        assert_eq!(serde_json::to_value(Role::Investor).unwrap(), json!("investor"));
    }

    #[test]
    fn test_unknown_role_reads_as_innovator() {
        let role: Role = serde_json::from_value(json!("student")).unwrap();
        assert_eq!(role, Role::Innovator);
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let user = User::new("Ada", "ada@example.com", Role::Innovator);
        let value = serde_json::to_value(&user).unwrap();

        assert!(value.get("createdAt").is_some());
        assert!(value.get("schemaVersion").is_some());
        // None fields stay off the wire.
        assert!(value.get("institution").is_none());
    }

    #[test]
    fn test_legacy_record_decodes_with_defaults() {
        let user: User = serde_json::from_value(json!({
            "id": "user-legacy",
            "name": "Old Timer"
        }))
        .unwrap();

        assert_eq!(user.role, Role::Innovator);
        assert_eq!(user.email, "");
        assert!(!user.retired);
        assert_eq!(user.schema_version, 0);
    }

    #[test]
    fn test_new_user_is_current_version() {
        let user = User::new("Ada", "ada@example.com", Role::Mentor);
        assert_eq!(
            user.schema_version,
            crate::migrate::current_version(crate::storage::Collection::Users)
        );
        assert!(!user.id.as_str().is_empty());
    }
}
