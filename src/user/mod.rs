//! User records.
//!
//! Users are referenced by nearly every other collection (startups carry an
//! owner, requests an innovator, subscriptions a holder), so this module
//! stays small: the typed record, the role enum, and the collection
//! accessors. Identity itself lives in the session module.

pub mod types;

pub use types::{Role, User};

use crate::db::IgniteDb;
use crate::error::Result;
use crate::storage::Collection;

impl IgniteDb {
    /// Reads every user.
    pub fn users(&self) -> Result<Vec<User>> {
        self.read_typed(Collection::Users)
    }

    /// Replaces the users collection.
    pub fn save_users(&self, users: &[User]) -> Result<()> {
        self.write_typed(Collection::Users, users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_users_roundtrip() {
        let db = IgniteDb::open_in_memory(Config::default()).unwrap();

        let users = vec![
            User::new("Ada", "ada@example.com", Role::Innovator),
            User::new("Grace", "grace@example.com", Role::Mentor),
        ];
        db.save_users(&users).unwrap();

        let loaded = db.users().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "Ada");
        assert_eq!(loaded[1].role, Role::Mentor);
    }

    #[test]
    fn test_malformed_user_skipped_not_fatal() {
        let db = IgniteDb::open_in_memory(Config::default()).unwrap();

        // One good record, one with a non-string id.
        let raws: Vec<crate::types::RawRecord> = vec![
            serde_json::from_value(serde_json::json!({
                "id": "u-1", "name": "Ada", "schemaVersion": 1
            }))
            .unwrap(),
            serde_json::from_value(serde_json::json!({
                "id": 42, "name": "Broken", "schemaVersion": 1
            }))
            .unwrap(),
        ];
        db.storage().set(Collection::Users, &raws).unwrap();

        let users = db.users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Ada");
    }
}
