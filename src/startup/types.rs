//! Type definitions for startup listings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::subscription::ListingEntitlement;
use crate::types::{RecordId, Timestamp, UserId};

// ============================================================================
// ProjectType
// ============================================================================

/// Whether a listing is run by one founder or a team.
///
/// Legacy records used a third value, `private`, retired by the startups
/// migration step; anything unrecognized reads as
/// [`ProjectType::Individual`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Founding team.
    Team,
    /// Single founder.
    #[default]
    #[serde(other)]
    Individual,
}

// ============================================================================
// StartupStatus
// ============================================================================

/// Lifecycle status of a listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupStatus {
    /// Reached its funding target.
    Funded,
    /// Wound down or exited.
    Completed,
    /// Listed and visible. The default.
    #[default]
    #[serde(other)]
    Active,
}

// ============================================================================
// Startup — The full stored record
// ============================================================================

/// A stored startup listing.
///
/// The nested `profile` / `team` / `financials` / `news` substructures are
/// carried opaquely: the data core stores and returns them but never
/// interprets their contents, so listings built by richer frontends
/// round-trip without this crate chasing their shapes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Startup {
    /// Unique identifier. Demo listings use fixed ids like `startup-001`.
    pub id: RecordId,

    /// The user who owns this listing.
    pub owner_id: UserId,

    /// Listing name.
    #[serde(default)]
    pub name: String,

    /// Pitch and description text.
    #[serde(default)]
    pub description: String,

    /// Individual founder or team.
    #[serde(default)]
    pub project_type: ProjectType,

    /// Marketplace category. Inferred by migration when legacy records
    /// miss it.
    #[serde(default = "default_category")]
    pub category: String,

    /// Free-form growth stage (`idea`, `growth`, `scaling`, ...).
    #[serde(default = "default_stage")]
    pub stage: String,

    /// Funding goal in integer currency units.
    #[serde(default)]
    pub funding_target: u64,

    /// Funding raised so far.
    #[serde(default)]
    pub funding_received: u64,

    /// Profile view counter.
    #[serde(default)]
    pub views: u64,

    /// Like counter. Unlikes saturate at zero.
    #[serde(default)]
    pub likes: u64,

    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Lifecycle status.
    #[serde(default)]
    pub status: StartupStatus,

    /// Cover image path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Extended profile page content (opaque).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Value>,

    /// Team member roster (opaque).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Value>,

    /// Financial summary (opaque).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financials: Option<Value>,

    /// News items (opaque).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news: Option<Value>,

    /// When the listing was created.
    #[serde(default)]
    pub created_at: Timestamp,

    /// Schema version stamp maintained by the migration layer.
    #[serde(default)]
    pub schema_version: u32,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_stage() -> String {
    "idea".to_string()
}

// ============================================================================
// NewStartup — Input for create_startup()
// ============================================================================

/// Input for creating a listing via [`IgniteDb::create_startup()`](crate::IgniteDb).
///
/// The `id`, counters, status and timestamp are set by the data core.
/// Category defaults to `general` and stage to `idea` when not given.
#[derive(Clone, Debug)]
pub struct NewStartup {
    /// The owning user. Listing quota is checked against this user.
    pub owner_id: UserId,

    /// Listing name (non-empty, max 120 chars).
    pub name: String,

    /// Pitch and description text (max 10 KB).
    pub description: String,

    /// Individual founder or team.
    pub project_type: ProjectType,

    /// Marketplace category; `general` when `None`.
    pub category: Option<String>,

    /// Growth stage; `idea` when `None`.
    pub stage: Option<String>,

    /// Funding goal in integer currency units.
    pub funding_target: u64,

    /// Search tags (max 10, each max 40 chars).
    pub tags: Vec<String>,

    /// Cover image path.
    pub image: Option<String>,
}

// ============================================================================
// StartupUpdate — Input for update_startup()
// ============================================================================

/// Partial update for a listing. Only `Some(...)` fields are applied.
///
/// Status changes go through
/// [`retire_startup()`](crate::IgniteDb::retire_startup) and the counters
/// through their dedicated operations; neither is updatable here.
#[derive(Clone, Debug, Default)]
pub struct StartupUpdate {
    /// New listing name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New stage.
    pub stage: Option<String>,
    /// New funding goal.
    pub funding_target: Option<u64>,
    /// New amount raised.
    pub funding_received: Option<u64>,
    /// New tag set (replaces, not merges).
    pub tags: Option<Vec<String>>,
    /// New cover image path.
    pub image: Option<String>,
}

// ============================================================================
// CreateStartupOutcome
// ============================================================================

/// Result of a listing creation attempt.
///
/// Quota denial is an expected condition, not an error: the caller gets
/// the full entitlement picture to render ("1 of 1 listings used,
/// purchase a slot for 499").
#[derive(Clone, Debug)]
pub enum CreateStartupOutcome {
    /// The listing was created and persisted.
    Created(Startup),
    /// The owner's plan does not allow another listing right now.
    Denied(ListingEntitlement),
}

impl CreateStartupOutcome {
    /// Returns true if a listing was created.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// Returns the created listing, if any.
    pub fn created(&self) -> Option<&Startup> {
        match self {
            Self::Created(startup) => Some(startup),
            Self::Denied(_) => None,
        }
    }

    /// Returns the entitlement that denied creation, if any.
    pub fn denial(&self) -> Option<&ListingEntitlement> {
        match self {
            Self::Created(_) => None,
            Self::Denied(entitlement) => Some(entitlement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_type_wire_values() {
        assert_eq!(
            serde_json::to_value(ProjectType::Individual).unwrap(),
            json!("individual")
        );
        assert_eq!(serde_json::to_value(ProjectType::Team).unwrap(), json!("team"));

        // Retired legacy value.
        let legacy: ProjectType = serde_json::from_value(json!("private")).unwrap();
        assert_eq!(legacy, ProjectType::Individual);
    }

    #[test]
    fn test_startup_decodes_with_defaults() {
        let startup: Startup = serde_json::from_value(json!({
            "id": "s-1",
            "ownerId": "u-1"
        }))
        .unwrap();

        assert_eq!(startup.category, "general");
        assert_eq!(startup.stage, "idea");
        assert_eq!(startup.status, StartupStatus::Active);
        assert_eq!(startup.views, 0);
        assert!(startup.tags.is_empty());
        assert!(startup.image.is_none());
    }

    #[test]
    fn test_opaque_substructures_roundtrip() {
        let value = json!({
            "id": "s-1",
            "ownerId": "u-1",
            "team": [{ "name": "Ada", "role": "CTO" }],
            "financials": { "revenue2025": 120000 }
        });

        let startup: Startup = serde_json::from_value(value).unwrap();
        let back = serde_json::to_value(&startup).unwrap();

        assert_eq!(back.get("team"), Some(&json!([{ "name": "Ada", "role": "CTO" }])));
        assert_eq!(back.get("financials"), Some(&json!({ "revenue2025": 120000 })));
        // Absent substructures stay off the wire.
        assert!(back.get("profile").is_none());
        assert!(back.get("news").is_none());
    }
}
