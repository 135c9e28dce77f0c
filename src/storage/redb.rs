//! redb record store implementation.
//!
//! This module provides the primary storage backend using
//! [redb](https://docs.rs/redb), a pure Rust embedded key-value store.
//!
//! # Features
//!
//! - ACID transactions with MVCC
//! - Single-writer, multiple-reader concurrency
//! - Automatic crash recovery
//! - Zero external dependencies (pure Rust)
//!
//! # File Layout
//!
//! When you open a store at `./ignite.db`, redb creates:
//! - `./ignite.db` - Main store file
//! - `./ignite.db.lock` - Lock file for writer coordination (may not be visible)

use std::path::{Path, PathBuf};

use ::redb::Database;
use tracing::{debug, info, instrument, warn};

use super::schema::{
    Collection, StoreMetadata, COLLECTIONS_TABLE, FORMAT_VERSION, METADATA_KEY, METADATA_TABLE,
    SESSION_KEY, SESSION_TABLE,
};
use super::{decode_records, encode_records, RecordStore};
use crate::error::{IgniteError, Result, StorageError};
use crate::types::{RawRecord, UserId};

/// Collections table key used by pre-rename stores for startups.
const LEGACY_STARTUPS_KEY: &str = "prototypes";

/// redb record store wrapper.
///
/// This struct holds the redb database handle and cached metadata.
/// It implements [`RecordStore`] for use with `IgniteDb`.
///
/// # Thread Safety
///
/// `RedbStore` is `Send + Sync`. redb handles internal synchronization
/// using MVCC for readers and exclusive locking for writers.
#[derive(Debug)]
pub struct RedbStore {
    /// The redb database handle.
    db: Database,

    /// Cached store metadata.
    metadata: StoreMetadata,

    /// Path to the store file.
    path: PathBuf,
}

impl RedbStore {
    /// Opens or creates a store at the given path.
    ///
    /// If the store doesn't exist, it will be created and initialized.
    /// If it exists, the on-disk format version is validated against
    /// what this build understands.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The store file is corrupted
    /// - The store is locked by another process
    /// - The format version doesn't match
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use ignitedb::storage::RedbStore;
    ///
    /// let store = RedbStore::open("./ignite.db")?;
    /// ```
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let store_exists = path.exists();

        debug!(store_exists = store_exists, "Opening record store");

        let db = Self::create_database(path)?;

        if store_exists {
            Self::open_existing(db, path.to_path_buf())
        } else {
            Self::initialize_new(db, path.to_path_buf())
        }
    }

    /// Creates the redb database with appropriate settings.
    fn create_database(path: &Path) -> Result<Database> {
        let builder = Database::builder();

        // Note: redb doesn't expose a typed error variant for lock conflicts,
        // so we detect them via error message string matching. This may need
        // updating if redb changes its error messages in a future version.
        let db = builder.create(path).map_err(|e| {
            if e.to_string().contains("locked") {
                StorageError::StoreLocked
            } else {
                StorageError::Redb(e.to_string())
            }
        })?;

        debug!("Store file opened successfully");
        Ok(db)
    }

    /// Initializes a new store with tables and metadata.
    #[instrument(skip(db), fields(path = %path.display()))]
    fn initialize_new(db: Database, path: PathBuf) -> Result<Self> {
        info!("Initializing new record store");

        let metadata = StoreMetadata::new();

        // Create all tables and write metadata in a single transaction
        let write_txn = db.begin_write().map_err(StorageError::from)?;

        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)
                .map_err(|e| StorageError::serialization(e.to_string()))?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;

            // Create other tables (they're created on first access)
            let _ = write_txn.open_table(COLLECTIONS_TABLE)?;
            let _ = write_txn.open_table(SESSION_TABLE)?;
        }

        write_txn.commit().map_err(StorageError::from)?;

        info!(format_version = FORMAT_VERSION, "Record store initialized");

        Ok(Self { db, metadata, path })
    }

    /// Opens and validates an existing store.
    #[instrument(skip(db), fields(path = %path.display()))]
    fn open_existing(db: Database, path: PathBuf) -> Result<Self> {
        info!("Opening existing record store");

        // Read metadata from the store
        let read_txn = db.begin_read().map_err(StorageError::from)?;

        let metadata = {
            let meta_table = read_txn.open_table(METADATA_TABLE).map_err(|e| {
                StorageError::corrupted(format!("Cannot open metadata table: {}", e))
            })?;

            let metadata_bytes = meta_table
                .get(METADATA_KEY)
                .map_err(StorageError::from)?
                .ok_or_else(|| StorageError::corrupted("Missing store metadata"))?;

            bincode::deserialize::<StoreMetadata>(metadata_bytes.value())
                .map_err(|e| StorageError::corrupted(format!("Invalid metadata format: {}", e)))?
        };

        drop(read_txn);

        // Validate format version
        if metadata.format_version != FORMAT_VERSION {
            warn!(
                expected = FORMAT_VERSION,
                found = metadata.format_version,
                "Store format version mismatch"
            );
            return Err(IgniteError::Storage(StorageError::FormatVersionMismatch {
                expected: FORMAT_VERSION,
                found: metadata.format_version,
            }));
        }

        // Update last_opened_at timestamp
        let mut metadata = metadata;
        metadata.touch();

        let write_txn = db.begin_write().map_err(StorageError::from)?;
        {
            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata)
                .map_err(|e| StorageError::serialization(e.to_string()))?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;
        }
        write_txn.commit().map_err(StorageError::from)?;

        info!(
            format_version = metadata.format_version,
            "Record store opened successfully"
        );

        Ok(Self { db, metadata, path })
    }

    /// Returns a reference to the underlying redb database.
    #[cfg(test)]
    pub(crate) fn database(&self) -> &Database {
        &self.db
    }
}

impl RecordStore for RedbStore {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }

    #[instrument(skip(self))]
    fn close(self: Box<Self>) -> Result<()> {
        info!("Closing record store");

        // redb flushes all data durably on drop. Since `Database::drop` is
        // infallible, this method currently always returns Ok(()). The Result
        // return type is retained for backends that can report flush errors.
        drop(self.db);

        info!("Record store closed");
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    // =========================================================================
    // Collection Operations
    // =========================================================================

    fn get(&self, collection: Collection) -> Result<Vec<RawRecord>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(COLLECTIONS_TABLE)?;

        let bytes = match table.get(collection.name())? {
            Some(value) => value.value().to_vec(),
            // Pre-rename stores kept startups under "prototypes".
            None if collection == Collection::Startups => {
                match table.get(LEGACY_STARTUPS_KEY)? {
                    Some(value) => value.value().to_vec(),
                    None => return Ok(Vec::new()),
                }
            }
            None => return Ok(Vec::new()),
        };

        Ok(decode_records(collection, &bytes))
    }

    fn set(&self, collection: Collection, records: &[RawRecord]) -> Result<()> {
        let bytes = encode_records(records)?;

        let write_txn = self.db.begin_write().map_err(StorageError::from)?;
        {
            let mut table = write_txn.open_table(COLLECTIONS_TABLE)?;
            table.insert(collection.name(), bytes.as_slice())?;

            // Once startups are written under the canonical key, the legacy
            // key must not shadow future reads.
            if collection == Collection::Startups {
                table.remove(LEGACY_STARTUPS_KEY)?;
            }
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(collection = %collection, count = records.len(), "Collection saved");
        Ok(())
    }

    fn set_many(&self, batches: &[(Collection, Vec<RawRecord>)]) -> Result<()> {
        if batches.is_empty() {
            return Ok(());
        }

        // Serialize everything before opening the transaction so an encoding
        // failure cannot leave a partial commit.
        let mut encoded = Vec::with_capacity(batches.len());
        for (collection, records) in batches {
            encoded.push((*collection, encode_records(records)?));
        }

        let write_txn = self.db.begin_write().map_err(StorageError::from)?;
        {
            let mut table = write_txn.open_table(COLLECTIONS_TABLE)?;
            for (collection, bytes) in &encoded {
                table.insert(collection.name(), bytes.as_slice())?;
                if *collection == Collection::Startups {
                    table.remove(LEGACY_STARTUPS_KEY)?;
                }
            }
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(batches = batches.len(), "Collections saved atomically");
        Ok(())
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    fn get_session(&self) -> Result<Option<UserId>> {
        let read_txn = self.db.begin_read().map_err(StorageError::from)?;
        let table = read_txn.open_table(SESSION_TABLE)?;

        match table.get(SESSION_KEY)? {
            Some(value) => match std::str::from_utf8(value.value()) {
                Ok(id) => Ok(Some(UserId::new(id))),
                Err(e) => {
                    warn!(error = %e, "Session slot holds invalid UTF-8, treating as logged out");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn set_session(&self, user: Option<&UserId>) -> Result<()> {
        let write_txn = self.db.begin_write().map_err(StorageError::from)?;
        {
            let mut table = write_txn.open_table(SESSION_TABLE)?;
            match user {
                Some(id) => {
                    table.insert(SESSION_KEY, id.as_str().as_bytes())?;
                }
                None => {
                    table.remove(SESSION_KEY)?;
                }
            }
        }
        write_txn.commit().map_err(StorageError::from)?;

        debug!(logged_in = user.is_some(), "Session slot updated");
        Ok(())
    }
}

// RedbStore is auto Send + Sync: Database, StoreMetadata, and PathBuf
// are all Send + Sync.
