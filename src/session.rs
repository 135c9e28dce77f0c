//! Login session management.
//!
//! The store keeps at most one logged-in identity, persisted in its own
//! table so it survives restarts. The session slot holds only the user id;
//! [`IgniteDb::session()`] resolves it against the users collection on
//! every call, so a retired or vanished user never yields a stale identity.
//!
//! Session changes are broadcast as [`StoreEvent::Session`](crate::watch::StoreEvent)
//! to every live watcher.
//!
//! # Races
//!
//! `save_session` writes the user record and the session slot in two
//! storage transactions. Two handles logging in different users at the
//! same time race at slot granularity: both user records persist, the
//! later slot write wins. That matches how the original single-identity
//! data layer behaved.

use tracing::{info, instrument, warn};

use crate::db::IgniteDb;
use crate::error::Result;
use crate::storage::Collection;
use crate::user::User;

impl IgniteDb {
    /// Returns the logged-in user, if any.
    ///
    /// Resolves the stored session id against the users collection. A
    /// session id that no longer matches a user record reads as logged
    /// out (with a warning), never as an error.
    pub fn session(&self) -> Result<Option<User>> {
        let id = match self.storage().get_session()? {
            Some(id) => id,
            None => return Ok(None),
        };

        let user = self.users()?.into_iter().find(|u| u.id == id);
        if user.is_none() {
            warn!(user_id = %id, "Session points at a user record that no longer exists");
        }
        Ok(user)
    }

    /// Logs a user in.
    ///
    /// Upserts the user record (so the session always resolves) and then
    /// writes the session slot. Broadcasts a session event after the slot
    /// commits.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub fn save_session(&self, user: &User) -> Result<()> {
        let mut users = self.users()?;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        self.write_typed(Collection::Users, &users)?;

        self.storage().set_session(Some(&user.id))?;
        self.publish_session(Some(user.id.clone()));

        info!("Session saved");
        Ok(())
    }

    /// Logs out.
    ///
    /// Clearing an already-empty session is a no-op that still broadcasts,
    /// so watchers converge regardless of who cleared first.
    #[instrument(skip(self))]
    pub fn clear_session(&self) -> Result<()> {
        self.storage().set_session(None)?;
        self.publish_session(None);

        info!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::user::Role;
    use crate::watch::StoreEvent;

    #[test]
    fn test_session_starts_logged_out() {
        let db = IgniteDb::open_in_memory(Config::default()).unwrap();
        assert!(db.session().unwrap().is_none());
    }

    #[test]
    fn test_save_and_resolve_session() {
        let db = IgniteDb::open_in_memory(Config::default()).unwrap();

        let user = User::new("Ada", "ada@example.com", Role::Innovator);
        db.save_session(&user).unwrap();

        let current = db.session().unwrap().unwrap();
        assert_eq!(current.id, user.id);
        assert_eq!(current.name, "Ada");

        // The upsert landed in the users collection too.
        assert_eq!(db.users().unwrap().len(), 1);
    }

    #[test]
    fn test_save_session_upserts_existing_user() {
        let db = IgniteDb::open_in_memory(Config::default()).unwrap();

        let mut user = User::new("Ada", "ada@example.com", Role::Innovator);
        db.save_session(&user).unwrap();

        user.name = "Ada L.".to_string();
        db.save_session(&user).unwrap();

        let users = db.users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Ada L.");
    }

    #[test]
    fn test_clear_session() {
        let db = IgniteDb::open_in_memory(Config::default()).unwrap();

        let user = User::new("Ada", "ada@example.com", Role::Innovator);
        db.save_session(&user).unwrap();
        db.clear_session().unwrap();

        assert!(db.session().unwrap().is_none());
        // The user record itself stays.
        assert_eq!(db.users().unwrap().len(), 1);
    }

    #[test]
    fn test_dangling_session_reads_as_logged_out() {
        let db = IgniteDb::open_in_memory(Config::default()).unwrap();

        let user = User::new("Ada", "ada@example.com", Role::Innovator);
        db.save_session(&user).unwrap();

        // Remove the user record out from under the slot.
        db.save_users(&[]).unwrap();

        assert!(db.session().unwrap().is_none());
    }

    #[test]
    fn test_session_changes_broadcast() {
        let db = IgniteDb::open_in_memory(Config::default()).unwrap();
        let watcher = db.watch();

        let user = User::new("Ada", "ada@example.com", Role::Innovator);
        db.save_session(&user).unwrap();

        // First event: the users collection upsert.
        let event = watcher.recv().unwrap();
        assert!(event.touches(Collection::Users));

        // Second event: the session slot write.
        match watcher.recv().unwrap() {
            StoreEvent::Session { user: Some(id), .. } => assert_eq!(id, user.id),
            other => panic!("expected session event, got {:?}", other),
        }

        db.clear_session().unwrap();
        match watcher.recv().unwrap() {
            StoreEvent::Session { user: None, .. } => {}
            other => panic!("expected logout event, got {:?}", other),
        }
    }
}
