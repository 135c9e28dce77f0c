//! Storage layer abstractions for the IgniteHub data core.
//!
//! This module provides a trait-based abstraction over the record store,
//! allowing different backends to be used (redb on disk, in-memory for
//! tests and ephemeral sessions).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      IgniteDb                                │
//! │                         │                                    │
//! │                         ▼                                    │
//! │              ┌─────────────────────┐                        │
//! │              │    RecordStore      │  ← Trait               │
//! │              └─────────────────────┘                        │
//! │                    ▲         ▲                              │
//! │                    │         │                              │
//! │         ┌─────────┴─┐   ┌───┴─────────┐                    │
//! │         │ RedbStore │   │ MemoryStore │                    │
//! │         └───────────┘   └─────────────┘                    │
//! │          (persistent)     (ephemeral)                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The unit of storage is the whole collection: `get` returns every record
//! in a collection and `set` replaces them all. That matches how the
//! marketplace data was originally kept (one serialized array per key) and
//! keeps last-writer-wins semantics per collection explicit.

pub mod memory;
pub mod redb;
pub mod schema;

pub use self::memory::MemoryStore;
pub use self::redb::RedbStore;
pub use schema::{Collection, StoreMetadata, FORMAT_VERSION};

use std::path::Path;

use tracing::warn;

use crate::error::{Result, StorageError};
use crate::types::{RawRecord, UserId};

/// Encodes a record array to its stored JSON byte form.
pub(crate) fn encode_records(records: &[RawRecord]) -> Result<Vec<u8>> {
    let bytes = serde_json::to_vec(records).map_err(StorageError::from)?;
    Ok(bytes)
}

/// Decodes stored bytes back into a record array.
///
/// Payloads that fail to parse read as empty. The original data layer
/// treated corrupt entries as absent and let the next write heal them;
/// erroring here would make one bad entry permanently brick a collection.
pub(crate) fn decode_records(collection: Collection, bytes: &[u8]) -> Vec<RawRecord> {
    match serde_json::from_slice::<Vec<RawRecord>>(bytes) {
        Ok(records) => records,
        Err(e) => {
            warn!(
                collection = %collection,
                error = %e,
                "Stored collection is not a valid record array, treating as empty"
            );
            Vec::new()
        }
    }
}

/// Record store trait.
///
/// This trait defines the contract that any storage backend must implement.
/// The primary implementation is [`RedbStore`]; [`MemoryStore`] backs tests
/// and ephemeral sessions.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow the store to be shared
/// across threads. The backend handles internal synchronization.
///
/// # Example
///
/// ```rust,ignore
/// use ignitedb::storage::{RecordStore, RedbStore};
///
/// let store = RedbStore::open("./ignite.db")?;
/// let startups = store.get(Collection::Startups)?;
/// ```
pub trait RecordStore: Send + Sync {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Returns the store metadata.
    ///
    /// The metadata includes format version and open/create timestamps.
    fn metadata(&self) -> &StoreMetadata;

    /// Closes the store, flushing any pending writes.
    ///
    /// This method consumes the store. After calling `close()`, the store
    /// cannot be used.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend supports reporting flush failures.
    /// Note: the redb backend flushes on drop (infallible), so this always
    /// returns `Ok(())` for [`RedbStore`].
    fn close(self: Box<Self>) -> Result<()>;

    /// Returns the path to the store file, if applicable.
    ///
    /// The in-memory backend has no path.
    fn path(&self) -> Option<&Path>;

    // =========================================================================
    // Collection Operations
    // =========================================================================

    /// Reads every record in a collection.
    ///
    /// A collection that has never been written reads as empty. Stored
    /// bytes that fail to parse as a JSON array also read as empty (and
    /// are logged); the next `set` overwrites them. This mirrors how the
    /// original data layer treated corrupt entries as absent.
    ///
    /// # Errors
    ///
    /// Returns an error only if the read transaction itself fails.
    fn get(&self, collection: Collection) -> Result<Vec<RawRecord>>;

    /// Replaces every record in a collection.
    ///
    /// The records are written verbatim as one JSON array; nothing is
    /// merged with existing contents. Concurrent writers race at
    /// collection granularity and the last commit wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or serialization fails.
    fn set(&self, collection: Collection, records: &[RawRecord]) -> Result<()>;

    /// Replaces several collections in one transaction.
    ///
    /// Either every batch is persisted or none is. Used wherever a record
    /// append and a counter update must not be torn apart (registration
    /// plus enrolled count, subscription plus promo usage).
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or serialization fails; no
    /// batch is persisted in that case.
    fn set_many(&self, batches: &[(Collection, Vec<RawRecord>)]) -> Result<()>;

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Reads the logged-in user slot.
    ///
    /// Returns `None` when nobody is logged in.
    fn get_session(&self) -> Result<Option<UserId>>;

    /// Writes the logged-in user slot.
    ///
    /// Passing `None` clears the slot (logout).
    fn set_session(&self, user: Option<&UserId>) -> Result<()>;
}

/// Opens a persistent record store at the given path.
///
/// This is a convenience function that creates a [`RedbStore`] instance.
/// For more control, use `RedbStore::open()` directly.
///
/// # Arguments
///
/// * `path` - Path to the store file (created if it doesn't exist)
///
/// # Errors
///
/// Returns an error if:
/// - The store file is corrupted
/// - The store is locked by another process
/// - The on-disk format version doesn't match this build
pub fn open_store(path: impl AsRef<Path>) -> Result<Box<dyn RecordStore>> {
    let store = RedbStore::open(path)?;
    Ok(Box::new(store))
}
