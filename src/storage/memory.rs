//! In-memory record store implementation.
//!
//! Backs tests and ephemeral sessions (demo sandboxes, previews) where
//! nothing should touch disk. Collections are held as the same JSON byte
//! payloads [`RedbStore`](super::RedbStore) would persist, so both
//! backends share encode/decode behavior exactly.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use super::schema::{Collection, StoreMetadata};
use super::{decode_records, encode_records, RecordStore};
use crate::error::Result;
use crate::types::{RawRecord, UserId};

#[derive(Debug, Default)]
struct MemoryInner {
    /// Collection payloads keyed by canonical collection name.
    collections: HashMap<&'static str, Vec<u8>>,

    /// Logged-in user slot.
    session: Option<UserId>,
}

/// Ephemeral record store.
///
/// All data lives on the heap and is dropped with the store. `close()` is
/// a no-op and `path()` returns `None`.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
    metadata: StoreMetadata,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner::default()),
            metadata: StoreMetadata::new(),
        }
    }

    fn read_inner(&self) -> std::sync::RwLockReadGuard<'_, MemoryInner> {
        // Writers replace whole values, so even a lock poisoned mid-panic
        // holds consistent data.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_inner(&self) -> std::sync::RwLockWriteGuard<'_, MemoryInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        None
    }

    fn get(&self, collection: Collection) -> Result<Vec<RawRecord>> {
        let inner = self.read_inner();
        match inner.collections.get(collection.name()) {
            Some(bytes) => Ok(decode_records(collection, bytes)),
            None => Ok(Vec::new()),
        }
    }

    fn set(&self, collection: Collection, records: &[RawRecord]) -> Result<()> {
        let bytes = encode_records(records)?;
        let mut inner = self.write_inner();
        inner.collections.insert(collection.name(), bytes);
        Ok(())
    }

    fn set_many(&self, batches: &[(Collection, Vec<RawRecord>)]) -> Result<()> {
        // Encode before taking the lock so a failure leaves nothing behind.
        let mut encoded = Vec::with_capacity(batches.len());
        for (collection, records) in batches {
            encoded.push((collection.name(), encode_records(records)?));
        }

        let mut inner = self.write_inner();
        for (name, bytes) in encoded {
            inner.collections.insert(name, bytes);
        }
        Ok(())
    }

    fn get_session(&self) -> Result<Option<UserId>> {
        Ok(self.read_inner().session.clone())
    }

    fn set_session(&self, user: Option<&UserId>) -> Result<()> {
        self.write_inner().session = user.cloned();
        Ok(())
    }
}
