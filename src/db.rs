//! IgniteDb main struct and lifecycle operations.
//!
//! The [`IgniteDb`] struct is the primary interface for interacting with
//! the marketplace data core. It provides methods for:
//!
//! - Opening and closing the store
//! - Reading and writing collections (raw and typed)
//! - Managing the login session
//! - Watching for committed changes
//!
//! Domain operations (listings, mentorship, funding, programs,
//! subscriptions, engagement) are implemented in their own modules as
//! additional `impl IgniteDb` blocks.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ignitedb::{IgniteDb, Config};
//!
//! // Open or create a store
//! let db = IgniteDb::open("./ignite.db", Config::default())?;
//!
//! // Read a collection (migrated to current schema on the way out)
//! let startups = db.startups()?;
//!
//! // Watch for changes
//! let watcher = db.watch();
//!
//! // Close when done
//! db.close()?;
//! ```
//!
//! # Thread Safety
//!
//! `IgniteDb` is `Send + Sync` and can be shared across threads using `Arc`.
//! The underlying storage uses MVCC for concurrent reads with exclusive
//! write locking. Writes race at collection granularity: two threads that
//! rewrite the same collection commit in some order and the later commit
//! wins wholesale. Callers that need read-modify-write isolation should
//! serialize their own access.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ignitedb::{IgniteDb, Config};
//!
//! let db = Arc::new(IgniteDb::open("./ignite.db", Config::default())?);
//!
//! let db_clone = Arc::clone(&db);
//! std::thread::spawn(move || {
//!     // Safe to use db_clone here
//! });
//! ```

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{IgniteError, Result, StorageError};
use crate::migrate;
use crate::storage::{open_store, Collection, MemoryStore, RecordStore, StoreMetadata};
use crate::types::{RawRecord, UserId};
use crate::watch::{StoreEvent, Watcher, WatchHub};

/// The main IgniteDb database handle.
///
/// This is the primary interface for all data operations. Create an
/// instance with [`IgniteDb::open()`] (persistent) or
/// [`IgniteDb::open_in_memory()`] (ephemeral) and close it with
/// [`IgniteDb::close()`].
///
/// # Ownership
///
/// `IgniteDb` owns its storage. When you call `close()`, the database is
/// consumed and cannot be used afterward. Watchers outlive the handle but
/// disconnect once it is gone.
pub struct IgniteDb {
    /// Record store backend (redb on disk, or in-memory).
    storage: Box<dyn RecordStore>,

    /// Broadcast hub for committed-change events.
    watch: WatchHub,

    /// Monotonic write counter, bumped once per published event.
    revision: AtomicU64,

    /// Configuration used to open this database.
    config: Config,
}

impl std::fmt::Debug for IgniteDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IgniteDb")
            .field("config", &self.config)
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}

impl IgniteDb {
    /// Opens or creates a persistent store at the specified path.
    ///
    /// If the store doesn't exist, it is created. If it exists, the on-disk
    /// format version is checked against this build. When
    /// [`Config::seed_demo`] is set, empty collections are populated with
    /// demo marketplace data after opening.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the store file (created if it doesn't exist)
    /// * `config` - Configuration options for the database
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration is invalid (see [`Config::validate`])
    /// - The store file is corrupted
    /// - The store is locked by another process
    /// - The on-disk format version doesn't match this build
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use ignitedb::{IgniteDb, Config};
    ///
    /// // Open with default configuration
    /// let db = IgniteDb::open("./ignite.db", Config::default())?;
    ///
    /// // Open a demo sandbox with seeded data
    /// let db = IgniteDb::open("./demo.db", Config::with_demo_seed())?;
    /// ```
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        config.validate().map_err(IgniteError::from)?;

        info!("Opening IgniteDb");

        let storage = open_store(&path)?;
        let db = Self::assemble(storage, config)?;

        info!(revision = db.revision(), "IgniteDb opened successfully");
        Ok(db)
    }

    /// Opens an ephemeral in-memory store.
    ///
    /// Data lives only as long as the handle. Useful for tests and for
    /// sandboxed demo sessions that must not leave files behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or demo seeding
    /// fails.
    #[instrument(skip(config))]
    pub fn open_in_memory(config: Config) -> Result<Self> {
        config.validate().map_err(IgniteError::from)?;

        info!("Opening in-memory IgniteDb");
        Self::assemble(Box::new(MemoryStore::new()), config)
    }

    fn assemble(storage: Box<dyn RecordStore>, config: Config) -> Result<Self> {
        let watch = WatchHub::new(config.watch_capacity);
        let db = Self {
            storage,
            watch,
            revision: AtomicU64::new(0),
            config,
        };

        if db.config.seed_demo {
            db.seed_demo_data()?;
        }

        Ok(db)
    }

    /// Closes the database, flushing all pending writes.
    ///
    /// This method consumes the `IgniteDb` instance, ensuring it cannot be
    /// used after closing. Live watchers observe a disconnect once the hub
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend reports a flush failure.
    /// Note: the redb backend flushes durably on drop, so this always
    /// returns `Ok(())` in practice.
    #[instrument(skip(self))]
    pub fn close(self) -> Result<()> {
        info!("Closing IgniteDb");

        self.storage.close()?;

        info!("IgniteDb closed successfully");
        Ok(())
    }

    /// Returns a reference to the database configuration.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the store metadata.
    ///
    /// Metadata includes the on-disk format version and timestamps for when
    /// the store was created and last opened.
    #[inline]
    pub fn metadata(&self) -> &StoreMetadata {
        self.storage.metadata()
    }

    /// Returns the path to the store file, or `None` for in-memory stores.
    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.storage.path()
    }

    /// Returns the current store revision.
    ///
    /// The revision starts at 0 and increases by one for every committed
    /// write published through the watch hub. Comparing it against the
    /// revision carried by a [`StoreEvent`] tells a reconnecting watcher
    /// whether it missed anything.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Subscribes to committed-change events.
    ///
    /// Every write that commits after this call is delivered to the
    /// returned [`Watcher`] in commit order. A watcher that stops draining
    /// its channel is disconnected; see the [`watch`](crate::watch) module
    /// docs for the full delivery contract.
    pub fn watch(&self) -> Watcher {
        self.watch.subscribe()
    }

    // =========================================================================
    // Raw Collection Access
    // =========================================================================

    /// Reads a collection by its wire name.
    ///
    /// This is the untyped escape hatch for tooling that works with
    /// collection names from the outside (exports, admin consoles). The
    /// legacy name `prototypes` resolves to the startups collection.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `name` is not a known collection, or
    /// a storage error if the read fails.
    pub fn records(&self, name: &str) -> Result<Vec<RawRecord>> {
        let collection = Collection::parse(name)
            .ok_or_else(|| crate::error::ValidationError::unknown_collection(name))?;
        self.read_collection(collection)
    }

    /// Replaces a collection by its wire name.
    ///
    /// The records are written verbatim; the caller is responsible for
    /// their shape. Typed accessors are the safer path for anything but
    /// bulk import tooling.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `name` is not a known collection, or
    /// a storage error if the write fails.
    pub fn save_records(&self, name: &str, records: Vec<RawRecord>) -> Result<()> {
        let collection = Collection::parse(name)
            .ok_or_else(|| crate::error::ValidationError::unknown_collection(name))?;
        self.write_collection(collection, &records)
    }

    // =========================================================================
    // Internal Plumbing (for use by feature modules)
    // =========================================================================

    /// Returns a reference to the storage backend.
    #[inline]
    pub(crate) fn storage(&self) -> &dyn RecordStore {
        self.storage.as_ref()
    }

    /// Reads a collection, upgrading stale records on the way out.
    ///
    /// When [`Config::migrate_on_read`] is set and the collection has
    /// registered migration steps, any record below the current schema
    /// version is stepped forward and the upgraded array is written back
    /// once. Records already current pass through untouched, so repeat
    /// reads settle into a plain get.
    pub(crate) fn read_collection(&self, collection: Collection) -> Result<Vec<RawRecord>> {
        let mut records = self.storage.get(collection)?;

        if self.config.migrate_on_read && migrate::is_registered(collection) {
            let report = migrate::migrate_records(collection, &mut records);
            if report.changed() {
                self.storage.set(collection, &records)?;
                self.publish_collection(collection);
            }
        }

        Ok(records)
    }

    /// Replaces a collection and publishes the change.
    pub(crate) fn write_collection(
        &self,
        collection: Collection,
        records: &[RawRecord],
    ) -> Result<()> {
        self.storage.set(collection, records)?;
        self.publish_collection(collection);
        Ok(())
    }

    /// Replaces several collections in one transaction, then publishes one
    /// event per collection.
    ///
    /// The write is atomic; the events are not (each carries its own
    /// revision, in batch order). Watchers refreshing on any one of them
    /// see the fully committed batch.
    pub(crate) fn write_batches(&self, batches: &[(Collection, Vec<RawRecord>)]) -> Result<()> {
        self.storage.set_many(batches)?;
        for (collection, _) in batches {
            self.publish_collection(*collection);
        }
        Ok(())
    }

    /// Reads a collection into typed records.
    ///
    /// Records that no longer match the current shape are skipped with a
    /// warning rather than failing the whole read. Migration has already
    /// run by the time decoding happens, so skips indicate data written by
    /// a different build or tampered with externally.
    pub(crate) fn read_typed<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let raws = self.read_collection(collection)?;
        Ok(decode_typed(collection, raws))
    }

    /// Replaces a collection from typed records and publishes the change.
    pub(crate) fn write_typed<T: Serialize>(
        &self,
        collection: Collection,
        items: &[T],
    ) -> Result<()> {
        let raws = encode_typed(items)?;
        self.write_collection(collection, &raws)
    }

    /// Bumps the revision and broadcasts a collection change.
    pub(crate) fn publish_collection(&self, collection: Collection) {
        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(collection = %collection, revision, "Collection changed");
        self.watch
            .broadcast(StoreEvent::Collection { collection, revision });
    }

    /// Bumps the revision and broadcasts a session change.
    pub(crate) fn publish_session(&self, user: Option<UserId>) {
        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(revision, "Session changed");
        self.watch.broadcast(StoreEvent::Session { user, revision });
    }
}

// IgniteDb is auto Send + Sync: Box<dyn RecordStore + Send + Sync>, WatchHub,
// AtomicU64, and Config are all Send + Sync.

/// Decodes raw records into typed ones, skipping records that don't fit.
fn decode_typed<T: DeserializeOwned>(collection: Collection, raws: Vec<RawRecord>) -> Vec<T> {
    raws.into_iter()
        .filter_map(|raw| {
            let id = raw
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or("<no id>")
                .to_string();
            match serde_json::from_value(Value::Object(raw)) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(
                        collection = %collection,
                        record_id = %id,
                        error = %e,
                        "Skipping record that does not match the current schema"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Encodes typed records back into raw ones.
pub(crate) fn encode_typed<T: Serialize>(items: &[T]) -> Result<Vec<RawRecord>> {
    items
        .iter()
        .map(|item| {
            let value = serde_json::to_value(item).map_err(StorageError::from)?;
            match value {
                Value::Object(map) => Ok(map),
                other => Err(StorageError::serialization(format!(
                    "record serialized to non-object JSON ({})",
                    match other {
                        Value::Array(_) => "array",
                        Value::String(_) => "string",
                        Value::Number(_) => "number",
                        Value::Bool(_) => "bool",
                        Value::Null => "null",
                        Value::Object(_) => unreachable!(),
                    }
                ))
                .into()),
            }
        })
        .collect()
}
