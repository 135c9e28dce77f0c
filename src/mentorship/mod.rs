//! Mentorship marketplace.
//!
//! Mentors are profiles users can request sessions with. Free mentors are
//! rationed by plan tokens (checked by the entitlement engine); premium
//! mentors bypass the quota and carry a price settled outside the data
//! core.
//!
//! # Operations
//!
//! - [`request_mentorship(new)`](crate::IgniteDb::request_mentorship)
//! - [`review_mentorship_request(id, approve)`](crate::IgniteDb::review_mentorship_request)
//! - [`mentors()`](crate::IgniteDb::mentors) / [`save_mentors()`](crate::IgniteDb::save_mentors)
//! - [`mentorship_requests()`](crate::IgniteDb::mentorship_requests) /
//!   [`save_mentorship_requests()`](crate::IgniteDb::save_mentorship_requests)

pub mod types;

pub use types::{
    Availability, Mentor, MentorshipOutcome, MentorshipRequest, NewMentorshipRequest,
    PaymentStatus, RequestStatus,
};

use tracing::{debug, info, instrument};

use crate::db::IgniteDb;
use crate::error::{NotFoundError, Result, ValidationError};
use crate::migrate;
use crate::storage::schema::MAX_MESSAGE_SIZE;
use crate::storage::Collection;
use crate::types::{RecordId, Timestamp};

/// Validates a [`NewMentorshipRequest`] before storage.
///
/// # Rules
///
/// - `message`: non-empty, max 2 KB
pub(crate) fn validate_new_request(new: &NewMentorshipRequest) -> Result<()> {
    if new.message.trim().is_empty() {
        return Err(ValidationError::required_field("message").into());
    }

    if new.message.len() > MAX_MESSAGE_SIZE {
        return Err(
            ValidationError::content_too_large(new.message.len(), MAX_MESSAGE_SIZE).into(),
        );
    }

    Ok(())
}

impl IgniteDb {
    /// Reads every mentor profile.
    pub fn mentors(&self) -> Result<Vec<Mentor>> {
        self.read_typed(Collection::Mentors)
    }

    /// Replaces the mentors collection.
    pub fn save_mentors(&self, mentors: &[Mentor]) -> Result<()> {
        self.write_typed(Collection::Mentors, mentors)
    }

    /// Reads every mentorship request.
    pub fn mentorship_requests(&self) -> Result<Vec<MentorshipRequest>> {
        self.read_typed(Collection::MentorshipRequests)
    }

    /// Replaces the mentorship requests collection.
    pub fn save_mentorship_requests(&self, requests: &[MentorshipRequest]) -> Result<()> {
        self.write_typed(Collection::MentorshipRequests, requests)
    }

    /// Requests a mentorship session, subject to the requester's tokens.
    ///
    /// A premium mentor bypasses the token quota: the request is always
    /// allowed and records the mentor's price with payment pending. A
    /// free mentor consumes one token; when none remain the outcome is
    /// a denial carrying the full entitlement.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad message, a not-found error if
    /// the mentor does not exist, or a storage error if the write fails.
    #[instrument(skip(self, new), fields(innovator = %new.innovator_id, mentor = %new.mentor_id))]
    pub fn request_mentorship(&self, new: NewMentorshipRequest) -> Result<MentorshipOutcome> {
        validate_new_request(&new)?;

        let mentor = self
            .mentors()?
            .into_iter()
            .find(|m| m.id == new.mentor_id)
            .ok_or_else(|| NotFoundError::record("mentors", &new.mentor_id))?;

        let entitlement = self.check_mentorship_request(
            &new.innovator_id,
            mentor.requires_payment,
            mentor.session_price,
        )?;
        if !entitlement.allowed {
            debug!("Mentorship request denied by token quota");
            return Ok(MentorshipOutcome::Denied(entitlement));
        }

        let request = MentorshipRequest {
            id: RecordId::generate(),
            innovator_id: new.innovator_id,
            mentor_id: new.mentor_id,
            message: new.message,
            status: RequestStatus::Pending,
            requires_payment: entitlement.requires_payment,
            payment_amount: entitlement.payment_amount,
            payment_status: entitlement.requires_payment.then_some(PaymentStatus::Pending),
            created_at: Timestamp::now(),
            schema_version: migrate::current_version(Collection::MentorshipRequests),
        };

        let mut requests = self.mentorship_requests()?;
        requests.push(request.clone());
        self.write_typed(Collection::MentorshipRequests, &requests)?;

        self.log_activity(&request.innovator_id, "requested_mentorship", Some(&request.id))?;

        info!(request_id = %request.id, paid = request.requires_payment, "Mentorship requested");
        Ok(MentorshipOutcome::Submitted(request))
    }

    /// Approves or declines a pending mentorship request.
    ///
    /// Returns `Ok(false)` when the id is unknown or the request was
    /// already reviewed; nothing is written in either case. The requester
    /// is notified of the decision. Payment for approved paid sessions is
    /// settled outside the data core; `payment_status` stays `pending`.
    #[instrument(skip(self))]
    pub fn review_mentorship_request(&self, id: &RecordId, approve: bool) -> Result<bool> {
        let mut requests = self.mentorship_requests()?;
        let target = match requests
            .iter_mut()
            .find(|r| r.id == *id && r.status == RequestStatus::Pending)
        {
            Some(request) => request,
            None => return Ok(false),
        };

        target.status = if approve {
            RequestStatus::Approved
        } else {
            RequestStatus::Rejected
        };
        let innovator = target.innovator_id.clone();
        let mentor_id = target.mentor_id.clone();

        self.write_typed(Collection::MentorshipRequests, &requests)?;

        let mentor_name = self
            .mentors()?
            .into_iter()
            .find(|m| m.id == mentor_id)
            .map(|m| m.name)
            .unwrap_or_else(|| "the mentor".to_string());
        let (title, body) = if approve {
            (
                "Mentorship request approved",
                format!("{} accepted your mentorship request.", mentor_name),
            )
        } else {
            (
                "Mentorship request declined",
                format!("{} declined your mentorship request.", mentor_name),
            )
        };
        self.push_notification(&innovator, title, &body)?;

        info!(request_id = %id, approve, "Mentorship request reviewed");
        Ok(true)
    }
}
