//! Lazy, versioned record migration.
//!
//! Stored records are never batch-migrated. Instead every record carries a
//! `schemaVersion` field (absent means 0, the legacy shape) and each
//! registered collection has an ordered table of [`MigrationStep`]s, one per
//! from-version. Reading a collection runs every step a record still needs,
//! stamps the final version, and lets the caller write the collection back
//! once if anything changed.
//!
//! Idempotence is structural: a record stamped at the current version
//! matches no step, so a second pass is a no-op by construction rather than
//! by convention.
//!
//! Corrective passes that must overwrite previously stored values (the
//! startup image heal) are ordinary steps with their own version number,
//! not unconditional rewrites: they run exactly once per record.
//!
//! # Registered Collections
//!
//! ```text
//! startups  v0 -> v1  legacy-normalize          (enum renames, backfills)
//! startups  v1 -> v2  image-heal                (forced canonical image paths)
//! mentors   v0 -> v1  availability-and-pricing  (availability, payment defaults)
//! users     v0 -> v1  role-rename               (role rename, default role)
//! ```
//!
//! Collections without registered steps pass through reads untouched.

mod mentors;
mod startups;
mod users;

use serde_json::Value;
use tracing::{debug, info};

use crate::storage::Collection;
use crate::types::RawRecord;

/// Record field holding the per-record schema version.
pub const SCHEMA_VERSION_FIELD: &str = "schemaVersion";

/// One migration step: upgrades a record from `from` to `from + 1`.
pub struct MigrationStep {
    /// Schema version this step applies to.
    pub from: u32,
    /// Short name used in logs.
    pub name: &'static str,
    /// Mutates the raw record in place. The runner stamps the version
    /// afterwards; steps never touch the version field themselves.
    pub apply: fn(&mut RawRecord),
}

/// Summary of one migration pass over a collection.
#[derive(Clone, Copy, Debug)]
pub struct MigrationReport {
    /// Collection the pass ran over.
    pub collection: Collection,
    /// How many records were upgraded (and therefore need a write-back).
    pub upgraded: usize,
}

impl MigrationReport {
    /// Returns true if the pass changed at least one record.
    pub fn changed(&self) -> bool {
        self.upgraded > 0
    }
}

/// Returns the migration steps registered for a collection.
///
/// The table is ordered: `steps[n].from == n`.
pub fn steps_for(collection: Collection) -> &'static [MigrationStep] {
    match collection {
        Collection::Startups => startups::STEPS,
        Collection::Mentors => mentors::STEPS,
        Collection::Users => users::STEPS,
        _ => &[],
    }
}

/// Returns the schema version current records of this collection carry.
pub fn current_version(collection: Collection) -> u32 {
    steps_for(collection).len() as u32
}

/// Returns true if reads of this collection run a migration pass.
pub fn is_registered(collection: Collection) -> bool {
    !steps_for(collection).is_empty()
}

/// Reads a record's schema version. Absent or malformed means 0 (legacy).
pub fn record_version(record: &RawRecord) -> u32 {
    record
        .get(SCHEMA_VERSION_FIELD)
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(0)
}

/// Stamps a record with the given schema version.
pub(crate) fn stamp_version(record: &mut RawRecord, version: u32) {
    record.insert(SCHEMA_VERSION_FIELD.to_string(), Value::from(version));
}

/// Runs every needed step over every record in place.
///
/// Records already at (or beyond) the current version are untouched;
/// beyond happens when a store written by a newer build is opened by this
/// one, and rewriting those records would destroy data this build cannot
/// understand.
pub fn migrate_records(collection: Collection, records: &mut [RawRecord]) -> MigrationReport {
    let steps = steps_for(collection);
    let target = steps.len() as u32;
    let mut upgraded = 0;

    if !steps.is_empty() {
        for record in records.iter_mut() {
            let mut version = record_version(record);
            if version >= target {
                continue;
            }

            while version < target {
                let step = &steps[version as usize];
                debug!(
                    collection = %collection,
                    step = step.name,
                    from = version,
                    "Applying migration step"
                );
                (step.apply)(record);
                version += 1;
                stamp_version(record, version);
            }
            upgraded += 1;
        }

        if upgraded > 0 {
            info!(
                collection = %collection,
                upgraded = upgraded,
                version = target,
                "Upgraded records to current schema"
            );
        }
    }

    MigrationReport {
        collection,
        upgraded,
    }
}

// ============================================================================
// Field Helpers (shared by step modules)
// ============================================================================

/// Reads a trimmed, non-empty string field.
pub(crate) fn non_empty_str<'a>(record: &'a RawRecord, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Coerces a field to a non-negative integer, writing the result back.
///
/// Handles numbers (negative clamps to 0), numeric strings, and anything
/// else (treated as 0). Returns the coerced value.
pub(crate) fn coerce_non_negative(record: &mut RawRecord, field: &str) -> u64 {
    let coerced = match record.get(field) {
        Some(Value::Number(n)) => n.as_f64().map(|f| f.max(0.0) as u64).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(|f| f.max(0.0) as u64).unwrap_or(0),
        _ => 0,
    };
    record.insert(field.to_string(), Value::from(coerced));
    coerced
}
