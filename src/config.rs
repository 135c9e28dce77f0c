//! Configuration types for the IgniteHub data core.
//!
//! The [`Config`] struct controls database behavior including:
//! - Whether records are migrated to current schema versions at read time
//! - Whether an empty store gets demo marketplace data
//! - Watch channel capacity
//!
//! # Example
//! ```rust
//! use ignitedb::Config;
//!
//! // Use defaults (migrate on read, no demo data)
//! let config = Config::default();
//!
//! // Customize for a demo sandbox
//! let config = Config {
//!     seed_demo: true,
//!     watch_capacity: 1024,
//!     ..Default::default()
//! };
//! ```

use crate::error::ValidationError;

/// Database configuration options.
///
/// All fields have sensible defaults. Use struct update syntax to override
/// specific settings:
///
/// ```rust
/// use ignitedb::Config;
///
/// let config = Config {
///     watch_capacity: 1024,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Whether reads upgrade records to their current schema version.
    ///
    /// When enabled (the default), loading a collection applies any
    /// registered migration steps and writes the upgraded records back
    /// once. Disable only for read-only inspection of a store you must
    /// not modify.
    pub migrate_on_read: bool,

    /// Whether opening seeds demo marketplace data into empty collections.
    ///
    /// Only collections that are empty get seeded; existing data is never
    /// touched. Default: false.
    pub seed_demo: bool,

    /// Capacity of each watcher's event channel.
    ///
    /// A watcher that falls more than this many events behind is
    /// disconnected. Default: 256.
    pub watch_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrate_on_read: true,
            seed_demo: false,
            watch_capacity: 256,
        }
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Config that seeds demo marketplace data on open.
    ///
    /// # Example
    /// ```rust
    /// use ignitedb::Config;
    ///
    /// let config = Config::with_demo_seed();
    /// assert!(config.seed_demo);
    /// ```
    pub fn with_demo_seed() -> Self {
        Self {
            seed_demo: true,
            ..Default::default()
        }
    }

    /// Validates the configuration.
    ///
    /// Called automatically by `IgniteDb::open()`. You can also call this
    /// explicitly to check configuration before attempting to open.
    ///
    /// # Errors
    /// Returns `ValidationError` if:
    /// - `watch_capacity` is 0
    /// - `watch_capacity` exceeds 65536
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.watch_capacity == 0 {
            return Err(ValidationError::invalid_field(
                "watch_capacity",
                "must be greater than 0",
            ));
        }

        if self.watch_capacity > 65536 {
            return Err(ValidationError::invalid_field(
                "watch_capacity",
                "must not exceed 65536",
            ));
        }

        Ok(())
    }
}
