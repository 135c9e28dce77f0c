//! Startup listing management.
//!
//! A **startup** is a marketplace listing owned by a user. Creation is
//! quota-guarded by the owner's plan; everything after creation (edits,
//! status changes, engagement counters) is unguarded.
//!
//! # Operations
//!
//! All listing operations are available on [`IgniteDb`](crate::IgniteDb):
//!
//! - [`create_startup(new)`](crate::IgniteDb::create_startup)
//! - [`update_startup(id, update)`](crate::IgniteDb::update_startup)
//! - [`retire_startup(id, status)`](crate::IgniteDb::retire_startup)
//! - [`record_startup_view(id)`](crate::IgniteDb::record_startup_view)
//! - [`set_startup_liked(id, liked)`](crate::IgniteDb::set_startup_liked)
//! - [`startups()`](crate::IgniteDb::startups) /
//!   [`save_startups()`](crate::IgniteDb::save_startups)

pub mod types;

pub use types::{
    CreateStartupOutcome, NewStartup, ProjectType, Startup, StartupStatus, StartupUpdate,
};

use tracing::{debug, info, instrument};

use crate::db::IgniteDb;
use crate::error::{Result, ValidationError};
use crate::migrate;
use crate::storage::schema::{MAX_DESCRIPTION_SIZE, MAX_NAME_LENGTH, MAX_TAGS, MAX_TAG_LENGTH};
use crate::storage::Collection;
use crate::types::{RecordId, Timestamp};

/// Validates a [`NewStartup`] before storage.
///
/// # Rules
///
/// - `name`: non-empty, max 120 bytes
/// - `description`: max 10 KB
/// - `tags`: max 10 tags, each max 40 bytes
pub(crate) fn validate_new_startup(new: &NewStartup) -> Result<()> {
    if new.name.trim().is_empty() {
        return Err(ValidationError::required_field("name").into());
    }

    if new.name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::invalid_field(
            "name",
            format!("exceeds max length of {} bytes (got {})", MAX_NAME_LENGTH, new.name.len()),
        )
        .into());
    }

    if new.description.len() > MAX_DESCRIPTION_SIZE {
        return Err(
            ValidationError::content_too_large(new.description.len(), MAX_DESCRIPTION_SIZE).into(),
        );
    }

    validate_tags(&new.tags)
}

/// Validates a [`StartupUpdate`] before applying.
///
/// Only validates fields that are `Some(...)`.
pub(crate) fn validate_startup_update(update: &StartupUpdate) -> Result<()> {
    if let Some(ref name) = update.name {
        if name.trim().is_empty() {
            return Err(ValidationError::required_field("name").into());
        }
        if name.len() > MAX_NAME_LENGTH {
            return Err(ValidationError::invalid_field(
                "name",
                format!("exceeds max length of {} bytes (got {})", MAX_NAME_LENGTH, name.len()),
            )
            .into());
        }
    }

    if let Some(ref description) = update.description {
        if description.len() > MAX_DESCRIPTION_SIZE {
            return Err(
                ValidationError::content_too_large(description.len(), MAX_DESCRIPTION_SIZE).into(),
            );
        }
    }

    if let Some(ref tags) = update.tags {
        validate_tags(tags)?;
    }

    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<()> {
    if tags.len() > MAX_TAGS {
        return Err(ValidationError::too_many_items("tags", tags.len(), MAX_TAGS).into());
    }

    for (i, tag) in tags.iter().enumerate() {
        if tag.len() > MAX_TAG_LENGTH {
            return Err(ValidationError::invalid_field(
                "tags",
                format!(
                    "tag at index {} exceeds max length of {} bytes (got {})",
                    i,
                    MAX_TAG_LENGTH,
                    tag.len()
                ),
            )
            .into());
        }
    }

    Ok(())
}

impl IgniteDb {
    /// Reads every startup listing.
    pub fn startups(&self) -> Result<Vec<Startup>> {
        self.read_typed(Collection::Startups)
    }

    /// Replaces the startups collection.
    pub fn save_startups(&self, startups: &[Startup]) -> Result<()> {
        self.write_typed(Collection::Startups, startups)
    }

    /// Creates a startup listing, subject to the owner's plan quota.
    ///
    /// Validation failures (empty name, oversized description) are errors;
    /// a quota denial is an expected outcome carrying the full
    /// entitlement so callers can render the upgrade path.
    ///
    /// # Errors
    ///
    /// Returns an error if input validation or the storage write fails.
    #[instrument(skip(self, new), fields(owner = %new.owner_id))]
    pub fn create_startup(&self, new: NewStartup) -> Result<CreateStartupOutcome> {
        validate_new_startup(&new)?;

        let entitlement = self.check_create_listing(&new.owner_id)?;
        if !entitlement.allowed {
            debug!("Listing creation denied by plan quota");
            return Ok(CreateStartupOutcome::Denied(entitlement));
        }

        let startup = Startup {
            id: RecordId::generate(),
            owner_id: new.owner_id,
            name: new.name,
            description: new.description,
            project_type: new.project_type,
            category: new.category.unwrap_or_else(|| "general".to_string()),
            stage: new.stage.unwrap_or_else(|| "idea".to_string()),
            funding_target: new.funding_target,
            funding_received: 0,
            views: 0,
            likes: 0,
            tags: new.tags,
            status: StartupStatus::Active,
            image: new.image,
            profile: None,
            team: None,
            financials: None,
            news: None,
            created_at: Timestamp::now(),
            schema_version: migrate::current_version(Collection::Startups),
        };

        let mut startups = self.startups()?;
        startups.push(startup.clone());
        self.write_typed(Collection::Startups, &startups)?;

        self.log_activity(&startup.owner_id, "created_startup", Some(&startup.id))?;

        info!(startup_id = %startup.id, "Startup created");
        Ok(CreateStartupOutcome::Created(startup))
    }

    /// Applies a partial update to a listing.
    ///
    /// Returns `Ok(false)` if no listing has the given id; nothing is
    /// written in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if update validation or the storage write fails.
    pub fn update_startup(&self, id: &RecordId, update: StartupUpdate) -> Result<bool> {
        validate_startup_update(&update)?;

        self.mutate_startup(id, |startup| {
            if let Some(name) = update.name {
                startup.name = name;
            }
            if let Some(description) = update.description {
                startup.description = description;
            }
            if let Some(category) = update.category {
                startup.category = category;
            }
            if let Some(stage) = update.stage {
                startup.stage = stage;
            }
            if let Some(funding_target) = update.funding_target {
                startup.funding_target = funding_target;
            }
            if let Some(funding_received) = update.funding_received {
                startup.funding_received = funding_received;
            }
            if let Some(tags) = update.tags {
                startup.tags = tags;
            }
            if let Some(image) = update.image {
                startup.image = Some(image);
            }
        })
    }

    /// Moves a listing to a terminal status (`funded` or `completed`).
    ///
    /// Returns `Ok(false)` if no listing has the given id. The record
    /// stays in the collection; retired listings still count against
    /// their owner's quota.
    #[instrument(skip(self))]
    pub fn retire_startup(&self, id: &RecordId, status: StartupStatus) -> Result<bool> {
        self.mutate_startup(id, |startup| {
            startup.status = status;
        })
    }

    /// Increments a listing's view counter.
    ///
    /// Returns `Ok(false)` if no listing has the given id.
    pub fn record_startup_view(&self, id: &RecordId) -> Result<bool> {
        self.mutate_startup(id, |startup| {
            startup.views = startup.views.saturating_add(1);
        })
    }

    /// Records a like (`liked = true`) or unlike (`liked = false`).
    ///
    /// Unliking a listing with zero likes leaves it at zero. Returns
    /// `Ok(false)` if no listing has the given id.
    pub fn set_startup_liked(&self, id: &RecordId, liked: bool) -> Result<bool> {
        self.mutate_startup(id, |startup| {
            startup.likes = if liked {
                startup.likes.saturating_add(1)
            } else {
                startup.likes.saturating_sub(1)
            };
        })
    }

    /// Finds a listing by id, applies `mutate`, and writes the collection
    /// back. Skips the write entirely when the id is unknown.
    fn mutate_startup<F>(&self, id: &RecordId, mutate: F) -> Result<bool>
    where
        F: FnOnce(&mut Startup),
    {
        let mut startups = self.startups()?;
        let target = match startups.iter_mut().find(|s| s.id == *id) {
            Some(startup) => startup,
            None => return Ok(false),
        };

        mutate(target);
        self.write_typed(Collection::Startups, &startups)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::UserId;

    fn new_startup(owner: &UserId, name: &str) -> NewStartup {
        NewStartup {
            owner_id: owner.clone(),
            name: name.to_string(),
            description: "A test listing".to_string(),
            project_type: ProjectType::Individual,
            category: None,
            stage: None,
            funding_target: 10_000,
            tags: vec!["test".to_string()],
            image: None,
        }
    }

    fn open_db() -> IgniteDb {
        IgniteDb::open_in_memory(Config::default()).unwrap()
    }

    // ====================================================================
    // Validation tests
    // ====================================================================

    #[test]
    fn test_empty_name_rejected() {
        let db = open_db();
        let owner = UserId::new("u-1");

        let mut new = new_startup(&owner, "  ");
        new.name = "   ".to_string();
        let err = db.create_startup(new).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_oversized_name_rejected() {
        let db = open_db();
        let owner = UserId::new("u-1");

        let new = new_startup(&owner, &"x".repeat(MAX_NAME_LENGTH + 1));
        assert!(db.create_startup(new).unwrap_err().is_validation());
    }

    #[test]
    fn test_oversized_description_rejected() {
        let db = open_db();
        let owner = UserId::new("u-1");

        let mut new = new_startup(&owner, "Fine Name");
        new.description = "x".repeat(MAX_DESCRIPTION_SIZE + 1);
        assert!(db.create_startup(new).unwrap_err().is_validation());
    }

    #[test]
    fn test_too_many_tags_rejected() {
        let db = open_db();
        let owner = UserId::new("u-1");

        let mut new = new_startup(&owner, "Fine Name");
        new.tags = (0..MAX_TAGS + 1).map(|i| format!("tag-{}", i)).collect();
        assert!(db.create_startup(new).unwrap_err().is_validation());
    }

    #[test]
    fn test_oversized_tag_rejected() {
        let db = open_db();
        let owner = UserId::new("u-1");

        let mut new = new_startup(&owner, "Fine Name");
        new.tags = vec!["x".repeat(MAX_TAG_LENGTH + 1)];
        assert!(db.create_startup(new).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_validation_applies_to_some_fields_only() {
        assert!(validate_startup_update(&StartupUpdate::default()).is_ok());

        let bad = StartupUpdate {
            name: Some("".to_string()),
            ..Default::default()
        };
        assert!(validate_startup_update(&bad).is_err());
    }

    // ====================================================================
    // Operation tests
    // ====================================================================

    #[test]
    fn test_create_startup_within_quota() {
        let db = open_db();
        let owner = UserId::new("u-1");

        let outcome = db.create_startup(new_startup(&owner, "SolarShare")).unwrap();
        let startup = outcome.created().expect("should be created");

        assert_eq!(startup.name, "SolarShare");
        assert_eq!(startup.category, "general");
        assert_eq!(startup.stage, "idea");
        assert_eq!(startup.status, StartupStatus::Active);
        assert_eq!(db.startups().unwrap().len(), 1);
    }

    #[test]
    fn test_create_startup_denied_over_quota() {
        let db = open_db();
        let owner = UserId::new("u-1");

        // Free tier allows one listing.
        assert!(db.create_startup(new_startup(&owner, "First")).unwrap().is_created());

        let outcome = db.create_startup(new_startup(&owner, "Second")).unwrap();
        let denial = outcome.denial().expect("should be denied");
        assert!(!denial.allowed);
        assert!(denial.reason.is_some());
        assert_eq!(db.startups().unwrap().len(), 1);
    }

    #[test]
    fn test_create_startup_logs_activity() {
        let db = open_db();
        let owner = UserId::new("u-1");

        db.create_startup(new_startup(&owner, "SolarShare")).unwrap();

        let activities = db.activities_for(&owner).unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].action, "created_startup");
    }

    #[test]
    fn test_update_startup() {
        let db = open_db();
        let owner = UserId::new("u-1");

        let outcome = db.create_startup(new_startup(&owner, "Before")).unwrap();
        let id = outcome.created().unwrap().id.clone();

        let updated = db
            .update_startup(
                &id,
                StartupUpdate {
                    name: Some("After".to_string()),
                    funding_received: Some(5_000),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated);

        let startups = db.startups().unwrap();
        assert_eq!(startups[0].name, "After");
        assert_eq!(startups[0].funding_received, 5_000);
        // Untouched fields survive.
        assert_eq!(startups[0].funding_target, 10_000);
    }

    #[test]
    fn test_update_unknown_id_returns_false() {
        let db = open_db();
        let missing = RecordId::new("nope");

        let updated = db.update_startup(&missing, StartupUpdate::default()).unwrap();
        assert!(!updated);
    }

    #[test]
    fn test_retire_startup() {
        let db = open_db();
        let owner = UserId::new("u-1");

        let outcome = db.create_startup(new_startup(&owner, "Exit")).unwrap();
        let id = outcome.created().unwrap().id.clone();

        assert!(db.retire_startup(&id, StartupStatus::Funded).unwrap());
        assert_eq!(db.startups().unwrap()[0].status, StartupStatus::Funded);
    }

    #[test]
    fn test_view_counter_increments() {
        let db = open_db();
        let owner = UserId::new("u-1");

        let outcome = db.create_startup(new_startup(&owner, "Watched")).unwrap();
        let id = outcome.created().unwrap().id.clone();

        assert!(db.record_startup_view(&id).unwrap());
        assert!(db.record_startup_view(&id).unwrap());
        assert_eq!(db.startups().unwrap()[0].views, 2);
    }

    #[test]
    fn test_unlike_saturates_at_zero() {
        let db = open_db();
        let owner = UserId::new("u-1");

        let outcome = db.create_startup(new_startup(&owner, "Liked")).unwrap();
        let id = outcome.created().unwrap().id.clone();

        assert!(db.set_startup_liked(&id, true).unwrap());
        assert_eq!(db.startups().unwrap()[0].likes, 1);

        assert!(db.set_startup_liked(&id, false).unwrap());
        assert!(db.set_startup_liked(&id, false).unwrap());
        assert_eq!(db.startups().unwrap()[0].likes, 0);
    }
}
