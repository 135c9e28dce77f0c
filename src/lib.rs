//! # IgniteDB
//!
//! Embedded data core for the IgniteHub startup marketplace.
//!
//! IgniteDB stores every marketplace collection (users, startup listings,
//! mentors, funding, programs, events, subscriptions and their supporting
//! records) in one embedded database, migrates legacy records lazily on
//! read, and enforces the plan quotas that gate listing creation and
//! mentorship requests.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ignitedb::{Config, IgniteDb, NewStartup, ProjectType};
//!
//! // Open or create a database (seeds demo content on first open)
//! let db = IgniteDb::open("./ignite.db", Config::with_demo_seed())?;
//!
//! // Log in as the demo identity
//! let founder = db.login_demo()?;
//!
//! // Create a listing, subject to the founder's plan quota
//! let outcome = db.create_startup(NewStartup {
//!     owner_id: founder.id.clone(),
//!     name: "SolarShare".to_string(),
//!     description: "Neighborhood solar co-ops".to_string(),
//!     project_type: ProjectType::Team,
//!     category: Some("sustainability".to_string()),
//!     stage: None,
//!     funding_target: 50_000,
//!     tags: vec!["solar".to_string()],
//!     image: None,
//! })?;
//!
//! if let Some(denial) = outcome.denial() {
//!     println!("Denied: {}", denial.reason.as_deref().unwrap_or("quota"));
//! }
//!
//! db.close()?;
//! ```
//!
//! ## Key Concepts
//!
//! ### Collections
//!
//! Every record lives in a named **collection** stored as one JSON array.
//! Typed accessors (`users()`, `startups()`, ...) decode records into
//! structs; the raw surface (`records(name)`) returns the JSON objects
//! untouched, including fields this build does not know about. The legacy
//! name `prototypes` still resolves to the startups collection.
//!
//! ### Lazy migration
//!
//! Each record carries a `schemaVersion`. Reading a registered collection
//! runs the migration steps a record still needs, stamps it, and writes
//! the collection back once per read pass. Already-migrated data passes
//! through untouched.
//!
//! ### Entitlements
//!
//! Plan quotas are never stored per user. Every check re-derives the
//! effective quota from the plan table, the user's active subscription,
//! and still-valid on-demand purchases, then counts actual usage.
//! Denials come back as data with a user-facing reason, never as errors.
//!
//! ### Watching for changes
//!
//! [`IgniteDb::watch`] subscribes to collection and session change
//! events; [`IgniteDb::revision`] is the coarse polling fallback.
//!
//! ## Thread Safety
//!
//! `IgniteDb` is `Send + Sync` and can be shared across threads using
//! `Arc`. The redb backend uses MVCC: many concurrent readers, one
//! writer.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod config;
mod db;
mod error;
mod types;
mod watch;

pub mod migrate;
pub mod storage;

// Domain modules
mod engagement;
mod funding;
mod mentorship;
mod program;
mod seed;
mod session;
mod startup;
mod subscription;
mod user;

// ============================================================================
// Public API re-exports
// ============================================================================

// Main database interface
pub use db::IgniteDb;

// Configuration
pub use config::Config;

// Error handling
pub use error::{IgniteError, NotFoundError, Result, StorageError, ValidationError};

// Core types
pub use types::{RawRecord, RecordId, Timestamp, UserId};

// Domain types
pub use engagement::{Activity, Comment, Notification};
pub use funding::{
    Application, ApplicationOutcome, ApplicationStatus, FundingOpportunity, NewApplication,
};
pub use mentorship::{
    Availability, Mentor, MentorshipOutcome, MentorshipRequest, NewMentorshipRequest,
    PaymentStatus, RequestStatus,
};
pub use program::{
    Event, EventRegistration, NewEventRegistration, NewProgramRegistration, Program,
    ProgramRegistration, RegistrationOutcome, RegistrationStatus,
};
pub use startup::{
    CreateStartupOutcome, NewStartup, ProjectType, Startup, StartupStatus, StartupUpdate,
};
pub use subscription::{
    ListingEntitlement, MentorshipEntitlement, OnDemandPurchase, Plan, PlanTier, PromoCheck,
    PromoCode, PurchaseKind, Quota, SubscribeOutcome, Subscription, SubscriptionStatus,
    PURCHASE_VALIDITY_DAYS, SUBSCRIPTION_TERM_DAYS,
};
pub use user::{Role, User};

// Seeding
pub use seed::{SeedReport, DEMO_USER_ID};

// Watch channel
pub use watch::{StoreEvent, WatchPoll, Watcher};

// Storage (for advanced users)
pub use storage::{Collection, StoreMetadata};

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common IgniteDB usage.
///
/// ```rust
/// use ignitedb::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::db::IgniteDb;
    pub use crate::error::{IgniteError, Result};
    pub use crate::startup::{NewStartup, Startup, StartupStatus};
    pub use crate::storage::Collection;
    pub use crate::types::{RecordId, Timestamp, UserId};
    pub use crate::user::{Role, User};
    pub use crate::watch::StoreEvent;
}
