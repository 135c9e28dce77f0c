//! Programs, events, and capacity-bounded registration.
//!
//! Both offerings follow one pattern: an optional capacity, a counter of
//! places taken, and registration records. The counter always moves in
//! the same storage transaction as the registration write, so the pair
//! can never disagree within one process. Programs review applications
//! (`pending → approved | rejected`, rejection releasing the place);
//! event registrations are confirmed on the spot.
//!
//! # Operations
//!
//! - [`register_for_program(new)`](crate::IgniteDb::register_for_program) /
//!   [`review_program_registration(id, approve)`](crate::IgniteDb::review_program_registration)
//! - [`register_for_event(new)`](crate::IgniteDb::register_for_event)
//! - [`programs()`](crate::IgniteDb::programs) /
//!   [`save_programs()`](crate::IgniteDb::save_programs),
//!   [`events()`](crate::IgniteDb::events) / [`save_events()`](crate::IgniteDb::save_events)
//! - [`program_registrations()`](crate::IgniteDb::program_registrations) /
//!   [`save_program_registrations()`](crate::IgniteDb::save_program_registrations),
//!   [`event_registrations()`](crate::IgniteDb::event_registrations) /
//!   [`save_event_registrations()`](crate::IgniteDb::save_event_registrations)

pub mod types;

pub use types::{
    Event, EventRegistration, NewEventRegistration, NewProgramRegistration, Program,
    ProgramRegistration, RegistrationOutcome, RegistrationStatus,
};

use tracing::{debug, info, instrument};

use crate::db::{encode_typed, IgniteDb};
use crate::error::Result;
use crate::migrate;
use crate::storage::Collection;
use crate::types::{RecordId, Timestamp};

impl IgniteDb {
    /// Reads every program.
    pub fn programs(&self) -> Result<Vec<Program>> {
        self.read_typed(Collection::Programs)
    }

    /// Replaces the programs collection.
    pub fn save_programs(&self, programs: &[Program]) -> Result<()> {
        self.write_typed(Collection::Programs, programs)
    }

    /// Reads every event.
    pub fn events(&self) -> Result<Vec<Event>> {
        self.read_typed(Collection::Events)
    }

    /// Replaces the events collection.
    pub fn save_events(&self, events: &[Event]) -> Result<()> {
        self.write_typed(Collection::Events, events)
    }

    /// Reads every program registration.
    pub fn program_registrations(&self) -> Result<Vec<ProgramRegistration>> {
        self.read_typed(Collection::ProgramRegistrations)
    }

    /// Replaces the program registrations collection.
    pub fn save_program_registrations(&self, registrations: &[ProgramRegistration]) -> Result<()> {
        self.write_typed(Collection::ProgramRegistrations, registrations)
    }

    /// Reads every event registration.
    pub fn event_registrations(&self) -> Result<Vec<EventRegistration>> {
        self.read_typed(Collection::EventRegistrations)
    }

    /// Replaces the event registrations collection.
    pub fn save_event_registrations(&self, registrations: &[EventRegistration]) -> Result<()> {
        self.write_typed(Collection::EventRegistrations, registrations)
    }

    /// Applies to a program.
    ///
    /// Checks run in order: the program must exist, its deadline must be
    /// in the future, the user must not already hold a pending or
    /// approved registration, and a capacity cap must have room. The new
    /// registration starts `pending` and the program's `enrolled` counter
    /// moves in the same storage transaction as the append.
    ///
    /// Duplicate prevention is best-effort under concurrent handles; the
    /// same predicate can re-validate at read time.
    #[instrument(skip(self, new), fields(user = %new.user_id, program = %new.program_id))]
    pub fn register_for_program(
        &self,
        new: NewProgramRegistration,
    ) -> Result<RegistrationOutcome<ProgramRegistration>> {
        let mut programs = self.programs()?;
        let program = match programs.iter_mut().find(|p| p.id == new.program_id) {
            Some(program) => program,
            None => return Ok(RegistrationOutcome::NotFound),
        };

        let now = Timestamp::now();
        if !now.is_before(program.deadline) {
            debug!("Program deadline has passed");
            return Ok(RegistrationOutcome::Closed {
                reason: format!(
                    "{} stopped accepting applications when its deadline passed.",
                    program.title
                ),
            });
        }

        let mut registrations = self.program_registrations()?;
        let already_applied = registrations.iter().any(|r| {
            r.program_id == new.program_id && r.user_id == new.user_id && r.status.holds_place()
        });
        if already_applied {
            debug!("Duplicate program registration");
            return Ok(RegistrationOutcome::Duplicate {
                reason: format!("You have already applied to {}.", program.title),
            });
        }

        if let Some(capacity) = program.capacity {
            if program.enrolled >= capacity {
                debug!(capacity, "Program is full");
                return Ok(RegistrationOutcome::Full {
                    reason: format!(
                        "{} is at capacity. Check back in case a place opens up.",
                        program.title
                    ),
                });
            }
        }

        let registration = ProgramRegistration {
            id: RecordId::generate(),
            program_id: new.program_id,
            user_id: new.user_id,
            status: RegistrationStatus::Pending,
            registered_at: now,
            schema_version: migrate::current_version(Collection::ProgramRegistrations),
        };
        registrations.push(registration.clone());
        program.enrolled += 1;

        // Counter and registration commit or fail together.
        self.write_batches(&[
            (Collection::Programs, encode_typed(&programs)?),
            (Collection::ProgramRegistrations, encode_typed(&registrations)?),
        ])?;

        self.log_activity(&registration.user_id, "registered_for_program", Some(&registration.id))?;

        info!(registration_id = %registration.id, "Program registration recorded");
        Ok(RegistrationOutcome::Registered(registration))
    }

    /// Approves or rejects a pending program registration.
    ///
    /// Returns `Ok(false)` when the id is unknown or the registration was
    /// already reviewed. Rejection releases the place: the program's
    /// `enrolled` counter decrements in the same storage transaction as
    /// the status change. The applicant is notified of the decision.
    #[instrument(skip(self))]
    pub fn review_program_registration(&self, id: &RecordId, approve: bool) -> Result<bool> {
        let mut registrations = self.program_registrations()?;
        let target = match registrations
            .iter_mut()
            .find(|r| r.id == *id && r.status == RegistrationStatus::Pending)
        {
            Some(registration) => registration,
            None => return Ok(false),
        };

        target.status = if approve {
            RegistrationStatus::Approved
        } else {
            RegistrationStatus::Rejected
        };
        let user = target.user_id.clone();
        let program_id = target.program_id.clone();

        let mut programs = self.programs()?;
        let title = programs
            .iter()
            .find(|p| p.id == program_id)
            .map(|p| p.title.clone())
            .unwrap_or_else(|| "the program".to_string());

        if !approve {
            if let Some(program) = programs.iter_mut().find(|p| p.id == program_id) {
                program.enrolled = program.enrolled.saturating_sub(1);
                self.write_batches(&[
                    (Collection::Programs, encode_typed(&programs)?),
                    (Collection::ProgramRegistrations, encode_typed(&registrations)?),
                ])?;
            } else {
                // Program record gone; only the registration to update.
                self.write_typed(Collection::ProgramRegistrations, &registrations)?;
            }
        } else {
            self.write_typed(Collection::ProgramRegistrations, &registrations)?;
        }

        let (subject, body) = if approve {
            (
                "Program application approved",
                format!("You have a place in {}.", title),
            )
        } else {
            (
                "Program application update",
                format!("{} did not accept your application this time.", title),
            )
        };
        self.push_notification(&user, subject, &body)?;

        info!(registration_id = %id, approve, "Program registration reviewed");
        Ok(true)
    }

    /// Registers for an event.
    ///
    /// Same gates as a program (exists, not in the past, no live
    /// duplicate, capacity) but there is no review step: the registration
    /// is `confirmed` immediately and the event's `registered` counter
    /// moves in the same storage transaction as the append.
    #[instrument(skip(self, new), fields(user = %new.user_id, event = %new.event_id))]
    pub fn register_for_event(
        &self,
        new: NewEventRegistration,
    ) -> Result<RegistrationOutcome<EventRegistration>> {
        let mut events = self.events()?;
        let event = match events.iter_mut().find(|e| e.id == new.event_id) {
            Some(event) => event,
            None => return Ok(RegistrationOutcome::NotFound),
        };

        let now = Timestamp::now();
        if !now.is_before(event.date) {
            debug!("Event has already taken place");
            return Ok(RegistrationOutcome::Closed {
                reason: format!("{} has already taken place.", event.title),
            });
        }

        let mut registrations = self.event_registrations()?;
        let already_registered = registrations.iter().any(|r| {
            r.event_id == new.event_id && r.user_id == new.user_id && r.status.holds_place()
        });
        if already_registered {
            debug!("Duplicate event registration");
            return Ok(RegistrationOutcome::Duplicate {
                reason: format!("You are already registered for {}.", event.title),
            });
        }

        if let Some(capacity) = event.capacity {
            if event.registered >= capacity {
                debug!(capacity, "Event is full");
                return Ok(RegistrationOutcome::Full {
                    reason: format!("{} is at capacity.", event.title),
                });
            }
        }

        let registration = EventRegistration {
            id: RecordId::generate(),
            event_id: new.event_id,
            user_id: new.user_id,
            status: RegistrationStatus::Confirmed,
            registered_at: now,
            schema_version: migrate::current_version(Collection::EventRegistrations),
        };
        registrations.push(registration.clone());
        event.registered += 1;

        // Counter and registration commit or fail together.
        self.write_batches(&[
            (Collection::Events, encode_typed(&events)?),
            (Collection::EventRegistrations, encode_typed(&registrations)?),
        ])?;

        self.log_activity(&registration.user_id, "registered_for_event", Some(&registration.id))?;

        info!(registration_id = %registration.id, "Event registration confirmed");
        Ok(RegistrationOutcome::Registered(registration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::UserId;

    fn open_db() -> IgniteDb {
        IgniteDb::open_in_memory(Config::default()).unwrap()
    }

    fn program(id: &str, capacity: Option<u32>) -> Program {
        Program {
            id: RecordId::new(id),
            title: "Ignite Accelerator".to_string(),
            description: "Twelve weeks of mentoring.".to_string(),
            deadline: Timestamp::now().plus_days(14),
            capacity,
            enrolled: 0,
            schema_version: 0,
        }
    }

    fn event(id: &str, capacity: Option<u32>) -> Event {
        Event {
            id: RecordId::new(id),
            title: "Demo Day".to_string(),
            description: "Pitch night.".to_string(),
            date: Timestamp::now().plus_days(7),
            location: Some("Main Hall".to_string()),
            capacity,
            registered: 0,
            schema_version: 0,
        }
    }

    fn program_signup(program: &str, user: &str) -> NewProgramRegistration {
        NewProgramRegistration {
            program_id: RecordId::new(program),
            user_id: UserId::new(user),
        }
    }

    fn event_signup(event: &str, user: &str) -> NewEventRegistration {
        NewEventRegistration {
            event_id: RecordId::new(event),
            user_id: UserId::new(user),
        }
    }

    // ====================================================================
    // Programs
    // ====================================================================

    #[test]
    fn test_register_for_program() {
        let db = open_db();
        db.save_programs(&[program("p-1", Some(25))]).unwrap();

        let outcome = db.register_for_program(program_signup("p-1", "u-1")).unwrap();
        let registration = outcome.registered().expect("should register");

        assert_eq!(registration.status, RegistrationStatus::Pending);
        // Counter moved with the registration.
        assert_eq!(db.programs().unwrap()[0].enrolled, 1);

        let activities = db.activities_for(&registration.user_id).unwrap();
        assert_eq!(activities[0].action, "registered_for_program");
    }

    #[test]
    fn test_unknown_program_not_found() {
        let db = open_db();
        let outcome = db.register_for_program(program_signup("ghost", "u-1")).unwrap();
        assert!(matches!(outcome, RegistrationOutcome::NotFound));
    }

    #[test]
    fn test_deadline_closes_program() {
        let db = open_db();
        let mut past = program("p-1", None);
        past.deadline = Timestamp::now().plus_days(-1);
        db.save_programs(&[past]).unwrap();

        let outcome = db.register_for_program(program_signup("p-1", "u-1")).unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Closed { .. }));
        assert!(db.program_registrations().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_program_registration() {
        let db = open_db();
        db.save_programs(&[program("p-1", None)]).unwrap();

        assert!(db.register_for_program(program_signup("p-1", "u-1")).unwrap().is_registered());

        let outcome = db.register_for_program(program_signup("p-1", "u-1")).unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Duplicate { .. }));
        assert_eq!(db.programs().unwrap()[0].enrolled, 1);
    }

    #[test]
    fn test_program_capacity() {
        let db = open_db();
        db.save_programs(&[program("p-1", Some(1))]).unwrap();

        assert!(db.register_for_program(program_signup("p-1", "u-1")).unwrap().is_registered());

        let outcome = db.register_for_program(program_signup("p-1", "u-2")).unwrap();
        match outcome {
            RegistrationOutcome::Full { reason } => assert!(reason.contains("capacity")),
            other => panic!("expected full, got {:?}", other),
        }
    }

    #[test]
    fn test_uncapped_program_never_full() {
        let db = open_db();
        db.save_programs(&[program("p-1", None)]).unwrap();

        for i in 0..10 {
            let outcome = db
                .register_for_program(program_signup("p-1", &format!("u-{}", i)))
                .unwrap();
            assert!(outcome.is_registered());
        }
        assert_eq!(db.programs().unwrap()[0].enrolled, 10);
    }

    #[test]
    fn test_review_approval_keeps_place() {
        let db = open_db();
        db.save_programs(&[program("p-1", Some(25))]).unwrap();

        let outcome = db.register_for_program(program_signup("p-1", "u-1")).unwrap();
        let registration = outcome.registered().unwrap();

        assert!(db.review_program_registration(&registration.id, true).unwrap());
        assert_eq!(
            db.program_registrations().unwrap()[0].status,
            RegistrationStatus::Approved
        );
        assert_eq!(db.programs().unwrap()[0].enrolled, 1);

        let notifications = db.notifications_for(&registration.user_id).unwrap();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].body.contains("Ignite Accelerator"));
    }

    #[test]
    fn test_rejection_releases_place() {
        let db = open_db();
        db.save_programs(&[program("p-1", Some(1))]).unwrap();

        let outcome = db.register_for_program(program_signup("p-1", "u-1")).unwrap();
        let registration_id = outcome.registered().unwrap().id.clone();

        assert!(db.review_program_registration(&registration_id, false).unwrap());
        assert_eq!(db.programs().unwrap()[0].enrolled, 0);

        // The released place is available again, including to the same user.
        assert!(db.register_for_program(program_signup("p-1", "u-1")).unwrap().is_registered());
    }

    #[test]
    fn test_review_is_pending_only() {
        let db = open_db();
        db.save_programs(&[program("p-1", None)]).unwrap();

        let outcome = db.register_for_program(program_signup("p-1", "u-1")).unwrap();
        let registration_id = outcome.registered().unwrap().id.clone();

        assert!(db.review_program_registration(&registration_id, false).unwrap());
        // Double rejection must not decrement the counter twice.
        assert!(!db.review_program_registration(&registration_id, false).unwrap());
        assert_eq!(db.programs().unwrap()[0].enrolled, 0);
    }

    #[test]
    fn test_review_unknown_id_returns_false() {
        let db = open_db();
        assert!(!db.review_program_registration(&RecordId::new("nope"), true).unwrap());
    }

    // ====================================================================
    // Events
    // ====================================================================

    #[test]
    fn test_register_for_event_confirms_immediately() {
        let db = open_db();
        db.save_events(&[event("e-1", Some(100))]).unwrap();

        let outcome = db.register_for_event(event_signup("e-1", "u-1")).unwrap();
        let registration = outcome.registered().expect("should register");

        assert_eq!(registration.status, RegistrationStatus::Confirmed);
        assert_eq!(db.events().unwrap()[0].registered, 1);

        let activities = db.activities_for(&registration.user_id).unwrap();
        assert_eq!(activities[0].action, "registered_for_event");
    }

    #[test]
    fn test_past_event_is_closed() {
        let db = open_db();
        let mut past = event("e-1", None);
        past.date = Timestamp::now().plus_days(-1);
        db.save_events(&[past]).unwrap();

        let outcome = db.register_for_event(event_signup("e-1", "u-1")).unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Closed { .. }));
    }

    #[test]
    fn test_duplicate_event_registration() {
        let db = open_db();
        db.save_events(&[event("e-1", None)]).unwrap();

        assert!(db.register_for_event(event_signup("e-1", "u-1")).unwrap().is_registered());

        let outcome = db.register_for_event(event_signup("e-1", "u-1")).unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Duplicate { .. }));
        assert_eq!(db.events().unwrap()[0].registered, 1);
    }

    #[test]
    fn test_event_capacity() {
        let db = open_db();
        db.save_events(&[event("e-1", Some(1))]).unwrap();

        assert!(db.register_for_event(event_signup("e-1", "u-1")).unwrap().is_registered());

        let outcome = db.register_for_event(event_signup("e-1", "u-2")).unwrap();
        assert!(matches!(outcome, RegistrationOutcome::Full { .. }));
        assert_eq!(db.event_registrations().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_event_not_found() {
        let db = open_db();
        let outcome = db.register_for_event(event_signup("ghost", "u-1")).unwrap();
        assert!(matches!(outcome, RegistrationOutcome::NotFound));
    }
}
