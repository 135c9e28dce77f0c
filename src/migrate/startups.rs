//! Migration steps for the startups collection.
//!
//! v0 records predate the schema version stamp: they may carry the retired
//! `private` project type, miss category/stage/engagement fields entirely,
//! or hold funding values as negative numbers or strings. v1 records predate
//! the canonical image table.

use rand::Rng;
use serde_json::Value;

use super::{coerce_non_negative, non_empty_str, MigrationStep};
use crate::types::RawRecord;

/// Canonical image paths for the original demo listings.
///
/// Early builds shipped these listings with paths that later moved; the
/// heal step rewrites them unconditionally so every store converges on the
/// same assets. Entries must match the ids used by the demo seed.
const CANONICAL_IMAGES: &[(&str, &str)] = &[
    ("startup-001", "/images/startups/solarshare.jpg"),
    ("startup-002", "/images/startups/medireach.jpg"),
    ("startup-003", "/images/startups/edubridge.jpg"),
    ("startup-004", "/images/startups/agrisense.jpg"),
    ("startup-005", "/images/startups/finlit.jpg"),
];

/// Category inference table, checked in order; first hit wins.
///
/// The order is the precedence: a listing that mentions both "health" and
/// "app" is healthcare, not technology.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("healthcare", &["health", "med", "care", "clinic"]),
    ("education", &["edu", "learn", "tutor", "school"]),
    ("sustainability", &["green", "solar", "eco", "recycl", "climate"]),
    ("fintech", &["fintech", "finance", "pay", "bank", "lend"]),
    ("agriculture", &["agri", "farm", "crop"]),
    ("technology", &["tech", "ai", "app", "robot", "software"]),
];

pub(super) const STEPS: &[MigrationStep] = &[
    MigrationStep {
        from: 0,
        name: "legacy-normalize",
        apply: legacy_normalize,
    },
    MigrationStep {
        from: 1,
        name: "image-heal",
        apply: heal_image,
    },
];

/// v0 -> v1: normalize enums, coerce numbers, backfill derived fields.
fn legacy_normalize(record: &mut RawRecord) {
    // Retired enum value "private" predates the individual/team split.
    let project_type = match non_empty_str(record, "projectType") {
        Some("team") => "team",
        _ => "individual",
    };
    record.insert("projectType".to_string(), Value::from(project_type));

    let status = match non_empty_str(record, "status") {
        Some("funded") => "funded",
        Some("completed") => "completed",
        _ => "active",
    };
    record.insert("status".to_string(), Value::from(status));

    // Tags must be a string array for inference and for the typed layer.
    let tags: Vec<Value> = match record.get("tags") {
        Some(Value::Array(items)) => items.iter().filter(|v| v.is_string()).cloned().collect(),
        _ => Vec::new(),
    };
    record.insert("tags".to_string(), Value::Array(tags));

    let target = coerce_non_negative(record, "fundingTarget");
    let received = coerce_non_negative(record, "fundingReceived");

    // Precedence: explicit stored value > inferred > default.
    if non_empty_str(record, "category").is_none() {
        let category = infer_category(record);
        record.insert("category".to_string(), Value::from(category));
    }

    if non_empty_str(record, "stage").is_none() {
        let stage = derive_stage(target, received);
        record.insert("stage".to_string(), Value::from(stage));
    }

    normalize_engagement(record, "views", 50, 500);
    normalize_engagement(record, "likes", 5, 50);
}

/// v1 -> v2: force the canonical image path for known listings.
fn heal_image(record: &mut RawRecord) {
    let id = match non_empty_str(record, "id") {
        Some(id) => id.to_string(),
        None => return,
    };

    if let Some(&(_, path)) = CANONICAL_IMAGES.iter().find(|(known, _)| *known == id) {
        record.insert("image".to_string(), Value::from(path));
    }
}

fn infer_category(record: &RawRecord) -> &'static str {
    let mut haystack = String::new();
    if let Some(Value::Array(tags)) = record.get("tags") {
        for tag in tags.iter().filter_map(Value::as_str) {
            haystack.push_str(&tag.to_lowercase());
            haystack.push(' ');
        }
    }
    if let Some(name) = non_empty_str(record, "name") {
        haystack.push_str(&name.to_lowercase());
    }

    for &(category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            return category;
        }
    }
    "general"
}

fn derive_stage(target: u64, received: u64) -> &'static str {
    if target > 0 && received >= target {
        "scaling"
    } else if received > 0 {
        "growth"
    } else {
        "idea"
    }
}

/// Keeps a parseable count (clamped non-negative), randomizes everything
/// else. Runs only inside the v0 step, so the randomization happens at most
/// once per record.
fn normalize_engagement(record: &mut RawRecord, field: &str, low: u64, high: u64) {
    let value = match parse_count(record.get(field)) {
        Some(n) => n,
        None => rand::thread_rng().gen_range(low..=high),
    };
    record.insert(field.to_string(), Value::from(value));
}

fn parse_count(value: Option<&Value>) -> Option<u64> {
    match value {
        Some(Value::Number(n)) => n.as_f64().map(|f| f.max(0.0) as u64),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(|f| f.max(0.0) as u64),
        _ => None,
    }
}
