//! Error types for IgniteHub's data core.
//!
//! The crate uses a hierarchical error system:
//! - `IgniteError` is the top-level error returned by all public APIs
//! - Specific error types (`StorageError`, `ValidationError`) provide detail
//!
//! Expected business conditions (quota exhausted, duplicate application,
//! sold-out event) are NOT errors: the relevant operations return outcome
//! enums instead. Errors are reserved for broken storage, bad input shapes,
//! and misconfiguration.
//!
//! # Error Handling Pattern
//! ```rust,ignore
//! use ignitedb::{IgniteDb, Config, Result};
//!
//! fn example() -> Result<()> {
//!     let db = IgniteDb::open("./ignite.db", Config::default())?;
//!     // ... operations that may fail ...
//!     db.close()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias for IgniteHub data operations.
pub type Result<T> = std::result::Result<T, IgniteError>;

/// Top-level error enum for all operations.
///
/// This is the only error type returned by public APIs.
/// Use pattern matching to handle specific error cases.
#[derive(Debug, Error)]
pub enum IgniteError {
    /// Storage layer error (I/O, corruption, transactions).
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of what's wrong with the configuration.
        reason: String,
    },

    /// Requested entity not found.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IgniteError {
    /// Creates a configuration error with the given reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns true if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

/// Storage-related errors.
///
/// These errors indicate problems with the underlying storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Store file or data is corrupted.
    #[error("Store corrupted: {0}")]
    Corrupted(String),

    /// Store is locked by another process.
    #[error("Store is locked by another writer")]
    StoreLocked,

    /// Transaction failed (commit, rollback, etc.).
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error from the redb storage engine.
    #[error("Storage engine error: {0}")]
    Redb(String),

    /// Store format version doesn't match what this build understands.
    ///
    /// This is the on-disk container format, not the per-record schema
    /// version (which migrates lazily and never produces an error).
    #[error("Store format version mismatch: expected {expected}, found {found}")]
    FormatVersionMismatch {
        /// Format version this build writes.
        expected: u32,
        /// Format version found in the store file.
        found: u32,
    },
}

impl StorageError {
    /// Creates a corruption error with the given message.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    /// Creates a transaction error with the given message.
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a serialization error with the given message.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a redb error with the given message.
    pub fn redb(msg: impl Into<String>) -> Self {
        Self::Redb(msg.into())
    }
}

// Conversions from redb error types
impl From<redb::Error> for StorageError {
    fn from(err: redb::Error) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(err: redb::DatabaseError) -> Self {
        StorageError::Redb(err.to_string())
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        StorageError::Transaction(err.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        StorageError::Transaction(format!("Commit failed: {}", err))
    }
}

impl From<redb::TableError> for StorageError {
    fn from(err: redb::TableError) -> Self {
        StorageError::Redb(format!("Table error: {}", err))
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(err: redb::StorageError) -> Self {
        StorageError::Redb(format!("Storage error: {}", err))
    }
}

// Convert serialization errors to StorageError
impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

// Also allow direct conversion to IgniteError for convenience
impl From<redb::Error> for IgniteError {
    fn from(err: redb::Error) -> Self {
        IgniteError::Storage(StorageError::from(err))
    }
}

impl From<redb::DatabaseError> for IgniteError {
    fn from(err: redb::DatabaseError) -> Self {
        IgniteError::Storage(StorageError::from(err))
    }
}

impl From<redb::TransactionError> for IgniteError {
    fn from(err: redb::TransactionError) -> Self {
        IgniteError::Storage(StorageError::from(err))
    }
}

impl From<redb::CommitError> for IgniteError {
    fn from(err: redb::CommitError) -> Self {
        IgniteError::Storage(StorageError::from(err))
    }
}

impl From<redb::TableError> for IgniteError {
    fn from(err: redb::TableError) -> Self {
        IgniteError::Storage(StorageError::from(err))
    }
}

impl From<redb::StorageError> for IgniteError {
    fn from(err: redb::StorageError) -> Self {
        IgniteError::Storage(StorageError::from(err))
    }
}

impl From<bincode::Error> for IgniteError {
    fn from(err: bincode::Error) -> Self {
        IgniteError::Storage(StorageError::from(err))
    }
}

impl From<serde_json::Error> for IgniteError {
    fn from(err: serde_json::Error) -> Self {
        IgniteError::Storage(StorageError::from(err))
    }
}

/// Validation errors for input data.
///
/// These errors indicate problems with data provided by the caller.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Collection name doesn't match any known collection.
    #[error("Unknown collection: '{0}'")]
    UnknownCollection(String),

    /// A field has an invalid value.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the invalid field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },

    /// Content exceeds maximum allowed size.
    #[error("Content too large: {size} bytes (max: {max} bytes)")]
    ContentTooLarge {
        /// Actual content size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max: usize,
    },

    /// A required field is missing or empty.
    #[error("Required field missing: {field}")]
    RequiredField {
        /// Name of the missing field.
        field: String,
    },

    /// Too many items in a collection field.
    #[error("Too many items in '{field}': {count} (max: {max})")]
    TooManyItems {
        /// Name of the field.
        field: String,
        /// Actual count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl ValidationError {
    /// Creates an unknown collection error.
    pub fn unknown_collection(name: impl Into<String>) -> Self {
        Self::UnknownCollection(name.into())
    }

    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a content too large error.
    pub fn content_too_large(size: usize, max: usize) -> Self {
        Self::ContentTooLarge { size, max }
    }

    /// Creates a required field error.
    pub fn required_field(field: impl Into<String>) -> Self {
        Self::RequiredField {
            field: field.into(),
        }
    }

    /// Creates a too many items error.
    pub fn too_many_items(field: impl Into<String>, count: usize, max: usize) -> Self {
        Self::TooManyItems {
            field: field.into(),
            count,
            max,
        }
    }
}

/// Not found errors for specific entity types.
///
/// Most lookups return `Option` or an outcome enum instead; these variants
/// cover paths where absence means the store itself is inconsistent (a seed
/// record vanished, a subscription references a missing user).
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// Record with given ID not found in the named collection.
    #[error("Record not found in '{collection}': {id}")]
    Record {
        /// Collection that was searched.
        collection: String,
        /// ID that was looked up.
        id: String,
    },

    /// User with given ID not found.
    #[error("User not found: {0}")]
    User(String),
}

impl NotFoundError {
    /// Creates a record not found error.
    pub fn record(collection: impl Into<String>, id: impl ToString) -> Self {
        Self::Record {
            collection: collection.into(),
            id: id.to_string(),
        }
    }

    /// Creates a user not found error.
    pub fn user(id: impl ToString) -> Self {
        Self::User(id.to_string())
    }
}
