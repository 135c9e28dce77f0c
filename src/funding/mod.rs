//! Funding opportunities and applications.
//!
//! Providers publish opportunities; founders apply with a startup and a
//! pitch. The one rule the data core enforces is no duplicate *pending*
//! application per (opportunity, applicant) pair; everything else
//! (deadlines, eligibility) is the provider's call at review time.
//!
//! # Operations
//!
//! - [`submit_application(new)`](crate::IgniteDb::submit_application)
//! - [`review_application(id, approve)`](crate::IgniteDb::review_application)
//! - [`funding_opportunities()`](crate::IgniteDb::funding_opportunities) /
//!   [`save_funding_opportunities()`](crate::IgniteDb::save_funding_opportunities)
//! - [`applications()`](crate::IgniteDb::applications) /
//!   [`save_applications()`](crate::IgniteDb::save_applications)

pub mod types;

pub use types::{
    Application, ApplicationOutcome, ApplicationStatus, FundingOpportunity, NewApplication,
};

use tracing::{debug, info, instrument};

use crate::db::IgniteDb;
use crate::error::{Result, ValidationError};
use crate::migrate;
use crate::storage::schema::MAX_PITCH_SIZE;
use crate::storage::Collection;
use crate::types::{RecordId, Timestamp};

/// Validates a [`NewApplication`] before storage.
///
/// # Rules
///
/// - `pitch`: non-empty, max 4 KB
pub(crate) fn validate_new_application(new: &NewApplication) -> Result<()> {
    if new.pitch.trim().is_empty() {
        return Err(ValidationError::required_field("pitch").into());
    }

    if new.pitch.len() > MAX_PITCH_SIZE {
        return Err(ValidationError::content_too_large(new.pitch.len(), MAX_PITCH_SIZE).into());
    }

    Ok(())
}

impl IgniteDb {
    /// Reads every funding opportunity.
    pub fn funding_opportunities(&self) -> Result<Vec<FundingOpportunity>> {
        self.read_typed(Collection::FundingOpportunities)
    }

    /// Replaces the funding opportunities collection.
    pub fn save_funding_opportunities(&self, opportunities: &[FundingOpportunity]) -> Result<()> {
        self.write_typed(Collection::FundingOpportunities, opportunities)
    }

    /// Reads every funding application.
    pub fn applications(&self) -> Result<Vec<Application>> {
        self.read_typed(Collection::Applications)
    }

    /// Replaces the applications collection.
    pub fn save_applications(&self, applications: &[Application]) -> Result<()> {
        self.write_typed(Collection::Applications, applications)
    }

    /// Submits a funding application.
    ///
    /// Rejected as a duplicate when the applicant already has a *pending*
    /// application for the same opportunity; a previously rejected or
    /// approved application does not block a new one. The duplicate check
    /// is best-effort under concurrent handles and is re-checkable at
    /// read time with the same predicate.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad pitch or a storage error if
    /// the write fails.
    #[instrument(skip(self, new), fields(applicant = %new.applicant_id, opportunity = %new.opportunity_id))]
    pub fn submit_application(&self, new: NewApplication) -> Result<ApplicationOutcome> {
        validate_new_application(&new)?;

        let mut applications = self.applications()?;
        let already_pending = applications.iter().any(|a| {
            a.opportunity_id == new.opportunity_id
                && a.applicant_id == new.applicant_id
                && a.status == ApplicationStatus::Pending
        });
        if already_pending {
            debug!("Duplicate pending application");
            return Ok(ApplicationOutcome::Duplicate {
                reason: "You already have a pending application for this opportunity. \
                         Wait for the provider's decision before applying again."
                    .to_string(),
            });
        }

        let application = Application {
            id: RecordId::generate(),
            opportunity_id: new.opportunity_id,
            startup_id: new.startup_id,
            applicant_id: new.applicant_id,
            pitch: new.pitch,
            status: ApplicationStatus::Pending,
            submitted_at: Timestamp::now(),
            schema_version: migrate::current_version(Collection::Applications),
        };

        applications.push(application.clone());
        self.write_typed(Collection::Applications, &applications)?;

        self.log_activity(
            &application.applicant_id,
            "submitted_application",
            Some(&application.id),
        )?;

        info!(application_id = %application.id, "Application submitted");
        Ok(ApplicationOutcome::Submitted(application))
    }

    /// Approves or rejects a pending funding application.
    ///
    /// Returns `Ok(false)` when the id is unknown or the application was
    /// already reviewed; nothing is written in either case. The applicant
    /// is notified of the decision.
    #[instrument(skip(self))]
    pub fn review_application(&self, id: &RecordId, approve: bool) -> Result<bool> {
        let mut applications = self.applications()?;
        let target = match applications
            .iter_mut()
            .find(|a| a.id == *id && a.status == ApplicationStatus::Pending)
        {
            Some(application) => application,
            None => return Ok(false),
        };

        target.status = if approve {
            ApplicationStatus::Approved
        } else {
            ApplicationStatus::Rejected
        };
        let applicant = target.applicant_id.clone();
        let opportunity_id = target.opportunity_id.clone();

        self.write_typed(Collection::Applications, &applications)?;

        let title = self
            .funding_opportunities()?
            .into_iter()
            .find(|o| o.id == opportunity_id)
            .map(|o| o.title)
            .unwrap_or_else(|| "a funding opportunity".to_string());
        let (subject, body) = if approve {
            (
                "Funding application approved",
                format!("Your application to {} was approved.", title),
            )
        } else {
            (
                "Funding application update",
                format!("Your application to {} was not selected this time.", title),
            )
        };
        self.push_notification(&applicant, subject, &body)?;

        info!(application_id = %id, approve, "Application reviewed");
        Ok(true)
    }
}
