//! Migration steps for the users collection.
//!
//! The platform renamed the `student` role to `innovator` when it opened
//! beyond universities. v0 records may still carry the old value, or no
//! role at all.

use serde_json::Value;

use super::{non_empty_str, MigrationStep};
use crate::types::RawRecord;

pub(super) const STEPS: &[MigrationStep] = &[MigrationStep {
    from: 0,
    name: "role-rename",
    apply: rename_role,
}];

/// v0 -> v1: map the retired role name, default unknown roles.
fn rename_role(record: &mut RawRecord) {
    let role = match non_empty_str(record, "role") {
        Some("mentor") => "mentor",
        Some("business") => "business",
        Some("investor") => "investor",
        // "student" and anything unrecognized collapse to the default role.
        _ => "innovator",
    };
    record.insert("role".to_string(), Value::from(role));
}
