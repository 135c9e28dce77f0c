//! Store schema definitions and versioning.
//!
//! This module defines the table structure for the redb storage engine and
//! the set of known collections. All table definitions are compile-time
//! constants to ensure consistency.
//!
//! # Two Kinds of Versions
//!
//! The FORMAT version describes the on-disk container (tables, metadata
//! encoding). It is checked once at open and a mismatch is fatal.
//!
//! Each record additionally carries its own `schemaVersion` field describing
//! the shape of that record's payload. Those versions are migrated lazily at
//! read time and never block an open. See the `migrate` module.
//!
//! # Table Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ METADATA_TABLE                                               │
//! │   Key: &str                                                  │
//! │   Entries: "store_metadata" -> StoreMetadata (bincode)       │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ COLLECTIONS_TABLE                                            │
//! │   Key: &str (collection name, e.g. "startups")               │
//! │   Value: &[u8] (JSON array of records, stored verbatim)      │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ SESSION_TABLE                                                │
//! │   Key: &str                                                  │
//! │   Entries: "currentUser" -> UTF-8 user id                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use redb::TableDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Timestamp;

/// Current on-disk format version.
///
/// Increment this when making breaking changes to the container layout.
/// The store will refuse to open if versions don't match.
pub const FORMAT_VERSION: u32 = 1;

/// Maximum length of a name or title field.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum description size in bytes (10 KB).
pub const MAX_DESCRIPTION_SIZE: usize = 10 * 1024;

/// Maximum number of tags per record.
pub const MAX_TAGS: usize = 10;

/// Maximum length of a single tag.
pub const MAX_TAG_LENGTH: usize = 40;

/// Maximum mentorship request message size in bytes.
pub const MAX_MESSAGE_SIZE: usize = 2048;

/// Maximum application pitch size in bytes.
pub const MAX_PITCH_SIZE: usize = 4096;

// ============================================================================
// Table Definitions
// ============================================================================

/// Metadata table for store-level information.
///
/// Stores format version, creation time, and other store-wide settings.
/// Key is a string identifier, value is serialized data.
pub const METADATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

/// Collections table.
///
/// Key: collection name (see [`Collection::name`])
/// Value: JSON array of record objects, written back whole on every save
pub const COLLECTIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("collections");

/// Session table.
///
/// Key: session slot name
/// Value: UTF-8 user id bytes
pub const SESSION_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("session");

/// Metadata table key for the store metadata record.
pub const METADATA_KEY: &str = "store_metadata";

/// Session table key for the logged-in user slot.
pub const SESSION_KEY: &str = "currentUser";

// ============================================================================
// Collections
// ============================================================================

/// Every collection the store knows about.
///
/// Collections map one-to-one onto keys in the collections table. The
/// wire names are camelCase because the stored data predates this crate
/// and must keep its original keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Registered user accounts.
    Users,
    /// Startup listings (stored under "startups"; legacy stores used
    /// "prototypes", which [`Collection::parse`] still accepts).
    Startups,
    /// Mentor profiles.
    Mentors,
    /// Funding opportunities open for applications.
    FundingOpportunities,
    /// Funding applications submitted by founders.
    Applications,
    /// Mentorship session requests.
    MentorshipRequests,
    /// Accelerator and incubator programs.
    Programs,
    /// Community events.
    Events,
    /// Program registrations (pending review).
    ProgramRegistrations,
    /// Event registrations (confirmed on creation).
    EventRegistrations,
    /// Subscription records, one per checkout.
    Subscriptions,
    /// Promo codes redeemable at checkout.
    PromoCodes,
    /// On-demand purchases (extra listings, mentorship token packs).
    OnDemandPurchases,
    /// User notifications.
    Notifications,
    /// Comments on startup listings.
    Comments,
    /// Activity feed entries.
    Activities,
}

impl Collection {
    /// All known collections, in seed order.
    pub const ALL: [Collection; 16] = [
        Collection::Users,
        Collection::Startups,
        Collection::Mentors,
        Collection::FundingOpportunities,
        Collection::Applications,
        Collection::MentorshipRequests,
        Collection::Programs,
        Collection::Events,
        Collection::ProgramRegistrations,
        Collection::EventRegistrations,
        Collection::Subscriptions,
        Collection::PromoCodes,
        Collection::OnDemandPurchases,
        Collection::Notifications,
        Collection::Comments,
        Collection::Activities,
    ];

    /// Returns the storage key for this collection.
    pub const fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Startups => "startups",
            Collection::Mentors => "mentors",
            Collection::FundingOpportunities => "fundingOpportunities",
            Collection::Applications => "applications",
            Collection::MentorshipRequests => "mentorshipRequests",
            Collection::Programs => "programs",
            Collection::Events => "events",
            Collection::ProgramRegistrations => "programRegistrations",
            Collection::EventRegistrations => "eventRegistrations",
            Collection::Subscriptions => "subscriptions",
            Collection::PromoCodes => "promoCodes",
            Collection::OnDemandPurchases => "onDemandPurchases",
            Collection::Notifications => "notifications",
            Collection::Comments => "comments",
            Collection::Activities => "activities",
        }
    }

    /// Resolves a storage key back to a collection.
    ///
    /// Accepts every canonical name plus the legacy "prototypes" alias,
    /// which older stores used before startups got their current name.
    pub fn parse(name: &str) -> Option<Collection> {
        // Legacy alias kept so pre-rename stores remain readable.
        if name == "prototypes" {
            return Some(Collection::Startups);
        }
        Collection::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Store Metadata
// ============================================================================

/// Store metadata kept in the metadata table.
///
/// This is serialized with bincode and stored under the key "store_metadata".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Format version for compatibility checking.
    pub format_version: u32,

    /// Timestamp when the store was created.
    pub created_at: Timestamp,

    /// Last time the store was opened (updated on each open).
    pub last_opened_at: Timestamp,
}

impl StoreMetadata {
    /// Creates new metadata for a fresh store.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            format_version: FORMAT_VERSION,
            created_at: now,
            last_opened_at: now,
        }
    }

    /// Updates the last_opened_at timestamp.
    pub fn touch(&mut self) {
        self.last_opened_at = Timestamp::now();
    }

    /// Checks if this metadata is compatible with the current format.
    pub fn is_compatible(&self) -> bool {
        self.format_version == FORMAT_VERSION
    }
}

impl Default for StoreMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_version() {
        assert_eq!(FORMAT_VERSION, 1);
    }

    #[test]
    fn test_store_metadata_new() {
        let meta = StoreMetadata::new();
        assert_eq!(meta.format_version, FORMAT_VERSION);
        assert!(meta.is_compatible());
    }

    #[test]
    fn test_store_metadata_touch() {
        let mut meta = StoreMetadata::new();
        let original = meta.last_opened_at;
        std::thread::sleep(std::time::Duration::from_millis(1));
        meta.touch();
        assert!(meta.last_opened_at > original);
    }

    #[test]
    fn test_store_metadata_serialization() {
        let meta = StoreMetadata::new();
        let bytes = bincode::serialize(&meta).unwrap();
        let restored: StoreMetadata = bincode::deserialize(&bytes).unwrap();
        assert_eq!(meta.format_version, restored.format_version);
        assert_eq!(meta.created_at, restored.created_at);
    }

    #[test]
    fn test_collection_names_roundtrip() {
        for collection in Collection::ALL {
            let parsed = Collection::parse(collection.name());
            assert_eq!(parsed, Some(collection), "name: {}", collection.name());
        }
    }

    #[test]
    fn test_collection_legacy_alias() {
        assert_eq!(Collection::parse("prototypes"), Some(Collection::Startups));
    }

    #[test]
    fn test_collection_unknown_name() {
        assert_eq!(Collection::parse("widgets"), None);
        assert_eq!(Collection::parse(""), None);
        // Names are case-sensitive storage keys.
        assert_eq!(Collection::parse("Users"), None);
    }

    #[test]
    fn test_collection_display_matches_name() {
        assert_eq!(Collection::Startups.to_string(), "startups");
        assert_eq!(
            Collection::FundingOpportunities.to_string(),
            "fundingOpportunities"
        );
    }
}
