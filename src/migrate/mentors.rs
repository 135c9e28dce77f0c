//! Migration steps for the mentors collection.
//!
//! v0 mentor records come from builds that used an `offline` availability
//! value and treated paid sessions as an afterthought: `requiresPayment`
//! was often absent and premium mentors could miss a price entirely.

use serde_json::Value;

use super::{coerce_non_negative, non_empty_str, MigrationStep};
use crate::types::RawRecord;

/// Price assigned to premium mentors whose legacy record never stored one.
const DEFAULT_SESSION_PRICE: u64 = 1500;

pub(super) const STEPS: &[MigrationStep] = &[MigrationStep {
    from: 0,
    name: "availability-and-pricing",
    apply: normalize_availability_and_pricing,
}];

/// v0 -> v1: rename retired availability value, pin down payment fields.
fn normalize_availability_and_pricing(record: &mut RawRecord) {
    let availability = match non_empty_str(record, "availability") {
        // "offline" was renamed when presence stopped being tracked live.
        Some("offline") | Some("unavailable") => "unavailable",
        Some("busy") => "busy",
        _ => "available",
    };
    record.insert("availability".to_string(), Value::from(availability));

    // Only a literal true counts; legacy truthy strings become free mentors.
    let requires_payment = matches!(record.get("requiresPayment"), Some(Value::Bool(true)));
    record.insert("requiresPayment".to_string(), Value::from(requires_payment));

    if requires_payment {
        let price = match record.get("sessionPrice") {
            Some(Value::Number(_)) | Some(Value::String(_)) => {
                coerce_non_negative(record, "sessionPrice")
            }
            _ => DEFAULT_SESSION_PRICE,
        };
        record.insert("sessionPrice".to_string(), Value::from(price));
    } else if record.contains_key("sessionPrice") {
        coerce_non_negative(record, "sessionPrice");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::{migrate_records, record_version};
    use crate::storage::Collection;
    use serde_json::json;

    fn migrate_one(value: serde_json::Value) -> RawRecord {
        let record = match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        };
        let mut records = vec![record];
        migrate_records(Collection::Mentors, &mut records);
        records.pop().unwrap()
    }

    #[test]
    fn test_offline_becomes_unavailable() {
        let record = migrate_one(json!({ "id": "m-1", "availability": "offline" }));
        assert_eq!(record.get("availability"), Some(&json!("unavailable")));
    }

    #[test]
    fn test_busy_preserved() {
        let record = migrate_one(json!({ "id": "m-1", "availability": "busy" }));
        assert_eq!(record.get("availability"), Some(&json!("busy")));
    }

    #[test]
    fn test_missing_availability_defaults_to_available() {
        let record = migrate_one(json!({ "id": "m-1" }));
        assert_eq!(record.get("availability"), Some(&json!("available")));
    }

    #[test]
    fn test_requires_payment_defaults_to_false() {
        let record = migrate_one(json!({ "id": "m-1" }));
        assert_eq!(record.get("requiresPayment"), Some(&json!(false)));

        let truthy_string = migrate_one(json!({ "id": "m-2", "requiresPayment": "true" }));
        assert_eq!(truthy_string.get("requiresPayment"), Some(&json!(false)));
    }

    #[test]
    fn test_premium_mentor_without_price_gets_default() {
        let record = migrate_one(json!({ "id": "m-1", "requiresPayment": true }));
        assert_eq!(
            record.get("sessionPrice"),
            Some(&json!(DEFAULT_SESSION_PRICE))
        );
    }

    #[test]
    fn test_premium_price_coerced() {
        let record = migrate_one(json!({
            "id": "m-1",
            "requiresPayment": true,
            "sessionPrice": "2500"
        }));
        assert_eq!(record.get("sessionPrice"), Some(&json!(2500)));

        let negative = migrate_one(json!({
            "id": "m-2",
            "requiresPayment": true,
            "sessionPrice": -900
        }));
        assert_eq!(negative.get("sessionPrice"), Some(&json!(0)));
    }

    #[test]
    fn test_free_mentor_price_left_absent() {
        let record = migrate_one(json!({ "id": "m-1", "requiresPayment": false }));
        assert!(!record.contains_key("sessionPrice"));
    }

    #[test]
    fn test_stamped_at_current_version() {
        let record = migrate_one(json!({ "id": "m-1" }));
        assert_eq!(record_version(&record), 1);
    }
}
