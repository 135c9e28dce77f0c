//! Notifications, comments and the activity log.
//!
//! Three small append-mostly collections that make the marketplace feel
//! inhabited:
//!
//! - **Notifications** tell a user about decisions made on their records.
//! - **Comments** hang off startup listings.
//! - **Activities** are an append-only audit trail of notable operations.
//!
//! # Operations
//!
//! - [`push_notification`](crate::IgniteDb::push_notification),
//!   [`mark_notification_read`](crate::IgniteDb::mark_notification_read),
//!   [`notifications_for`](crate::IgniteDb::notifications_for),
//!   [`unread_count`](crate::IgniteDb::unread_count)
//! - [`add_comment`](crate::IgniteDb::add_comment),
//!   [`comments_for_startup`](crate::IgniteDb::comments_for_startup)
//! - [`log_activity`](crate::IgniteDb::log_activity),
//!   [`activities_for`](crate::IgniteDb::activities_for)

pub mod types;

pub use types::{Activity, Comment, Notification};

use crate::db::IgniteDb;
use crate::error::{Result, ValidationError};
use crate::migrate;
use crate::storage::schema::MAX_MESSAGE_SIZE;
use crate::storage::Collection;
use crate::types::{RecordId, Timestamp, UserId};

impl IgniteDb {
    // =========================================================================
    // Notifications
    // =========================================================================

    /// Reads every notification.
    pub fn notifications(&self) -> Result<Vec<Notification>> {
        self.read_typed(Collection::Notifications)
    }

    /// Replaces the notifications collection.
    pub fn save_notifications(&self, notifications: &[Notification]) -> Result<()> {
        self.write_typed(Collection::Notifications, notifications)
    }

    /// Pushes a notification to a user.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty title or an oversized body,
    /// or a storage error if the write fails.
    pub fn push_notification(
        &self,
        user: &UserId,
        title: &str,
        body: &str,
    ) -> Result<Notification> {
        if title.trim().is_empty() {
            return Err(ValidationError::required_field("title").into());
        }
        if body.len() > MAX_MESSAGE_SIZE {
            return Err(ValidationError::content_too_large(body.len(), MAX_MESSAGE_SIZE).into());
        }

        let notification = Notification {
            id: RecordId::generate(),
            user_id: user.clone(),
            title: title.to_string(),
            body: body.to_string(),
            read: false,
            created_at: Timestamp::now(),
            schema_version: migrate::current_version(Collection::Notifications),
        };

        let mut notifications = self.notifications()?;
        notifications.push(notification.clone());
        self.write_typed(Collection::Notifications, &notifications)?;

        Ok(notification)
    }

    /// Marks a notification as read.
    ///
    /// Returns `Ok(false)` if no notification has the given id. Marking
    /// an already-read notification again is a plain rewrite, not an
    /// error.
    pub fn mark_notification_read(&self, id: &RecordId) -> Result<bool> {
        let mut notifications = self.notifications()?;
        let target = match notifications.iter_mut().find(|n| n.id == *id) {
            Some(notification) => notification,
            None => return Ok(false),
        };

        target.read = true;
        self.write_typed(Collection::Notifications, &notifications)?;
        Ok(true)
    }

    /// Returns a user's notifications in push order.
    pub fn notifications_for(&self, user: &UserId) -> Result<Vec<Notification>> {
        let notifications = self.notifications()?;
        Ok(notifications.into_iter().filter(|n| n.user_id == *user).collect())
    }

    /// Returns how many of a user's notifications are unread.
    pub fn unread_count(&self, user: &UserId) -> Result<usize> {
        let notifications = self.notifications()?;
        Ok(notifications
            .iter()
            .filter(|n| n.user_id == *user && !n.read)
            .count())
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Reads every comment.
    pub fn comments(&self) -> Result<Vec<Comment>> {
        self.read_typed(Collection::Comments)
    }

    /// Replaces the comments collection.
    pub fn save_comments(&self, comments: &[Comment]) -> Result<()> {
        self.write_typed(Collection::Comments, comments)
    }

    /// Adds a comment to a startup listing.
    ///
    /// The listing id is not resolved; a comment on a listing that was
    /// never created simply never shows up anywhere.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or oversized body, or a
    /// storage error if the write fails.
    pub fn add_comment(
        &self,
        startup_id: &RecordId,
        author: &UserId,
        body: &str,
    ) -> Result<Comment> {
        if body.trim().is_empty() {
            return Err(ValidationError::required_field("body").into());
        }
        if body.len() > MAX_MESSAGE_SIZE {
            return Err(ValidationError::content_too_large(body.len(), MAX_MESSAGE_SIZE).into());
        }

        let comment = Comment {
            id: RecordId::generate(),
            startup_id: startup_id.clone(),
            author_id: author.clone(),
            body: body.to_string(),
            created_at: Timestamp::now(),
            schema_version: migrate::current_version(Collection::Comments),
        };

        let mut comments = self.comments()?;
        comments.push(comment.clone());
        self.write_typed(Collection::Comments, &comments)?;

        Ok(comment)
    }

    /// Returns a listing's comments in post order.
    pub fn comments_for_startup(&self, startup_id: &RecordId) -> Result<Vec<Comment>> {
        let comments = self.comments()?;
        Ok(comments
            .into_iter()
            .filter(|c| c.startup_id == *startup_id)
            .collect())
    }

    // =========================================================================
    // Activities
    // =========================================================================

    /// Reads every activity entry.
    pub fn activities(&self) -> Result<Vec<Activity>> {
        self.read_typed(Collection::Activities)
    }

    /// Replaces the activities collection.
    ///
    /// The log is meant to be append-only; this accessor exists for bulk
    /// import tooling, not for editing history.
    pub fn save_activities(&self, activities: &[Activity]) -> Result<()> {
        self.write_typed(Collection::Activities, activities)
    }

    /// Appends an activity entry for a user.
    ///
    /// Guarded operations call this automatically; call it directly for
    /// actions the data core does not know about.
    pub fn log_activity(
        &self,
        user: &UserId,
        action: &str,
        target: Option<&RecordId>,
    ) -> Result<Activity> {
        let activity = Activity {
            id: RecordId::generate(),
            user_id: user.clone(),
            action: action.to_string(),
            target_id: target.cloned(),
            created_at: Timestamp::now(),
            schema_version: migrate::current_version(Collection::Activities),
        };

        let mut activities = self.activities()?;
        activities.push(activity.clone());
        self.write_typed(Collection::Activities, &activities)?;

        Ok(activity)
    }

    /// Returns a user's activity entries in append order.
    pub fn activities_for(&self, user: &UserId) -> Result<Vec<Activity>> {
        let activities = self.activities()?;
        Ok(activities.into_iter().filter(|a| a.user_id == *user).collect())
    }
}
