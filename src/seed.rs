//! Demo marketplace content for fresh stores.
//!
//! Seeding fills only collections that are empty, so a store carrying
//! real data is never touched. All seed records are written at current
//! schema versions with explicit counters; the migration layer has
//! nothing to do on them. Cross-references (owners, providers, linked
//! mentor accounts) all resolve within the seed set.
//!
//! [`login_demo`](crate::IgniteDb::login_demo) provisions a fixed demo
//! identity and backfills one record of each participation kind through
//! the regular operations, guarded by "does this user already own records
//! there" rather than a seeded flag.

use tracing::{info, instrument};

use crate::db::IgniteDb;
use crate::error::Result;
use crate::funding::{FundingOpportunity, NewApplication};
use crate::mentorship::{Availability, Mentor, NewMentorshipRequest};
use crate::migrate;
use crate::program::{Event, NewEventRegistration, NewProgramRegistration, Program};
use crate::startup::{ProjectType, Startup, StartupStatus};
use crate::storage::Collection;
use crate::subscription::{PlanTier, PromoCode};
use crate::types::{RecordId, Timestamp, UserId};
use crate::user::{Role, User};

/// Fixed id of the demo identity provisioned by
/// [`login_demo`](crate::IgniteDb::login_demo).
pub const DEMO_USER_ID: &str = "demo-user";

/// What [`seed_demo_data`](crate::IgniteDb::seed_demo_data) populated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Collections that were empty and received demo content, in seed
    /// order.
    pub seeded: Vec<Collection>,
}

impl SeedReport {
    /// Returns true if nothing needed seeding.
    pub fn is_empty(&self) -> bool {
        self.seeded.is_empty()
    }
}

impl IgniteDb {
    /// Populates empty collections with demo marketplace content.
    ///
    /// Runs automatically on open when [`Config::seed_demo`] is set, and
    /// can be called directly at any time. Each collection is checked
    /// separately; one holding even a single record is left alone.
    ///
    /// [`Config::seed_demo`]: crate::Config::seed_demo
    ///
    /// # Errors
    ///
    /// Returns an error only if a storage write fails.
    #[instrument(skip(self))]
    pub fn seed_demo_data(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        if self.users()?.is_empty() {
            self.save_users(&demo_users())?;
            report.seeded.push(Collection::Users);
        }
        if self.startups()?.is_empty() {
            self.save_startups(&demo_startups())?;
            report.seeded.push(Collection::Startups);
        }
        if self.mentors()?.is_empty() {
            self.save_mentors(&demo_mentors())?;
            report.seeded.push(Collection::Mentors);
        }
        if self.funding_opportunities()?.is_empty() {
            self.save_funding_opportunities(&demo_funding_opportunities())?;
            report.seeded.push(Collection::FundingOpportunities);
        }
        if self.programs()?.is_empty() {
            self.save_programs(&demo_programs())?;
            report.seeded.push(Collection::Programs);
        }
        if self.events()?.is_empty() {
            self.save_events(&demo_events())?;
            report.seeded.push(Collection::Events);
        }
        if self.promo_codes()?.is_empty() {
            self.save_promo_codes(&demo_promo_codes())?;
            report.seeded.push(Collection::PromoCodes);
        }

        if !report.is_empty() {
            info!(collections = report.seeded.len(), "Seeded demo data");
        }
        Ok(report)
    }

    /// Logs in as the fixed demo identity, provisioning it on first use.
    ///
    /// Saves the session and backfills one funding application, one
    /// program registration, one event registration and one mentorship
    /// request for the demo user through the regular operations. Each
    /// backfill is skipped when the user already owns records in that
    /// collection, so repeated demo logins do not pile up records.
    ///
    /// # Errors
    ///
    /// Returns an error only if a storage write fails.
    #[instrument(skip(self))]
    pub fn login_demo(&self) -> Result<User> {
        let demo = self
            .users()?
            .into_iter()
            .find(|u| u.id.as_str() == DEMO_USER_ID)
            .unwrap_or_else(|| User {
                id: UserId::new(DEMO_USER_ID),
                name: "Demo Founder".to_string(),
                email: "demo@ignitehub.dev".to_string(),
                role: Role::Innovator,
                institution: Some("Ignite University".to_string()),
                subscription_id: None,
                created_at: Timestamp::now(),
                retired: false,
                schema_version: migrate::current_version(Collection::Users),
            });

        self.save_session(&demo)?;
        self.backfill_demo_records(&demo)?;

        info!(user = %demo.id, "Demo login");
        Ok(demo)
    }

    /// Gives the demo user one record of each participation kind.
    fn backfill_demo_records(&self, user: &User) -> Result<()> {
        let owns_application = self.applications()?.iter().any(|a| a.applicant_id == user.id);
        if !owns_application {
            let opportunities = self.funding_opportunities()?;
            let startups = self.startups()?;
            if let (Some(opportunity), Some(startup)) = (opportunities.first(), startups.first()) {
                self.submit_application(NewApplication {
                    opportunity_id: opportunity.id.clone(),
                    startup_id: startup.id.clone(),
                    applicant_id: user.id.clone(),
                    pitch: "We pair student founders with neighborhood pilot customers."
                        .to_string(),
                })?;
            }
        }

        let owns_program_registration = self
            .program_registrations()?
            .iter()
            .any(|r| r.user_id == user.id);
        if !owns_program_registration {
            let programs = self.programs()?;
            if let Some(program) = programs.first() {
                self.register_for_program(NewProgramRegistration {
                    program_id: program.id.clone(),
                    user_id: user.id.clone(),
                })?;
            }
        }

        let owns_event_registration = self
            .event_registrations()?
            .iter()
            .any(|r| r.user_id == user.id);
        if !owns_event_registration {
            let events = self.events()?;
            if let Some(event) = events.first() {
                self.register_for_event(NewEventRegistration {
                    event_id: event.id.clone(),
                    user_id: user.id.clone(),
                })?;
            }
        }

        let owns_request = self
            .mentorship_requests()?
            .iter()
            .any(|r| r.innovator_id == user.id);
        if !owns_request {
            let mentors = self.mentors()?;
            if let Some(mentor) = mentors.iter().find(|m| !m.requires_payment) {
                self.request_mentorship(NewMentorshipRequest {
                    innovator_id: user.id.clone(),
                    mentor_id: mentor.id.clone(),
                    message: "I'd love feedback on our first customer pilots.".to_string(),
                })?;
            }
        }

        Ok(())
    }
}

// ============================================================================
// Demo content
// ============================================================================

fn demo_user(id: &str, name: &str, email: &str, role: Role, institution: Option<&str>) -> User {
    User {
        id: UserId::new(id),
        name: name.to_string(),
        email: email.to_string(),
        role,
        institution: institution.map(str::to_string),
        subscription_id: None,
        created_at: Timestamp::now().plus_days(-180),
        retired: false,
        schema_version: migrate::current_version(Collection::Users),
    }
}

fn demo_users() -> Vec<User> {
    vec![
        demo_user(
            "user-001",
            "Amara Okafor",
            "amara@solarshare.dev",
            Role::Innovator,
            Some("Ignite University"),
        ),
        demo_user(
            "user-002",
            "Lin Wei",
            "lin@medireach.dev",
            Role::Innovator,
            None,
        ),
        demo_user(
            "user-003",
            "Sofia Reyes",
            "sofia@ignitehub.dev",
            Role::Mentor,
            None,
        ),
        demo_user(
            "user-004",
            "Marcus Hale",
            "marcus@ignitecapital.dev",
            Role::Business,
            None,
        ),
        demo_user(
            "user-005",
            "Priya Sharma",
            "priya@horizonventures.dev",
            Role::Investor,
            Some("Horizon College"),
        ),
    ]
}

fn demo_startups() -> Vec<Startup> {
    let version = migrate::current_version(Collection::Startups);
    let now = Timestamp::now();
    vec![
        Startup {
            id: RecordId::new("startup-001"),
            owner_id: UserId::new("user-001"),
            name: "SolarShare".to_string(),
            description: "Neighborhood solar co-ops with pay-per-panel pricing.".to_string(),
            project_type: ProjectType::Team,
            category: "sustainability".to_string(),
            stage: "growth".to_string(),
            funding_target: 100_000,
            funding_received: 35_000,
            views: 412,
            likes: 38,
            tags: vec!["solar".to_string(), "energy".to_string(), "community".to_string()],
            status: StartupStatus::Active,
            image: Some("/images/startups/solarshare.jpg".to_string()),
            profile: None,
            team: None,
            financials: None,
            news: None,
            created_at: now.plus_days(-120),
            schema_version: version,
        },
        Startup {
            id: RecordId::new("startup-002"),
            owner_id: UserId::new("user-002"),
            name: "MediReach".to_string(),
            description: "Telemedicine kiosks for clinics without resident doctors.".to_string(),
            project_type: ProjectType::Team,
            category: "healthcare".to_string(),
            stage: "growth".to_string(),
            funding_target: 250_000,
            funding_received: 180_000,
            views: 356,
            likes: 41,
            tags: vec!["health".to_string(), "telemedicine".to_string()],
            status: StartupStatus::Active,
            image: Some("/images/startups/medireach.jpg".to_string()),
            profile: None,
            team: None,
            financials: None,
            news: None,
            created_at: now.plus_days(-95),
            schema_version: version,
        },
        Startup {
            id: RecordId::new("startup-003"),
            owner_id: UserId::new("user-002"),
            name: "EduBridge".to_string(),
            description: "Peer tutoring marketplace for first-generation students.".to_string(),
            project_type: ProjectType::Individual,
            category: "education".to_string(),
            stage: "idea".to_string(),
            funding_target: 40_000,
            funding_received: 0,
            views: 128,
            likes: 12,
            tags: vec!["education".to_string(), "tutoring".to_string()],
            status: StartupStatus::Active,
            image: Some("/images/startups/edubridge.jpg".to_string()),
            profile: None,
            team: None,
            financials: None,
            news: None,
            created_at: now.plus_days(-60),
            schema_version: version,
        },
        Startup {
            id: RecordId::new("startup-004"),
            owner_id: UserId::new("user-001"),
            name: "AgriSense".to_string(),
            description: "Soil sensor kits that text smallholders when to irrigate.".to_string(),
            project_type: ProjectType::Team,
            category: "agriculture".to_string(),
            stage: "growth".to_string(),
            funding_target: 75_000,
            funding_received: 20_000,
            views: 210,
            likes: 19,
            tags: vec!["farming".to_string(), "iot".to_string(), "sensors".to_string()],
            status: StartupStatus::Active,
            image: Some("/images/startups/agrisense.jpg".to_string()),
            profile: None,
            team: None,
            financials: None,
            news: None,
            created_at: now.plus_days(-45),
            schema_version: version,
        },
        Startup {
            id: RecordId::new("startup-005"),
            owner_id: UserId::new("user-002"),
            name: "FinLit".to_string(),
            description: "Bite-size financial literacy lessons inside campus apps.".to_string(),
            project_type: ProjectType::Individual,
            category: "fintech".to_string(),
            stage: "idea".to_string(),
            funding_target: 30_000,
            funding_received: 5_000,
            views: 97,
            likes: 8,
            tags: vec!["finance".to_string(), "literacy".to_string()],
            status: StartupStatus::Active,
            image: Some("/images/startups/finlit.jpg".to_string()),
            profile: None,
            team: None,
            financials: None,
            news: None,
            created_at: now.plus_days(-30),
            schema_version: version,
        },
    ]
}

fn demo_mentors() -> Vec<Mentor> {
    let version = migrate::current_version(Collection::Mentors);
    vec![
        Mentor {
            id: RecordId::new("mentor-001"),
            user_id: Some(UserId::new("user-003")),
            name: "Sofia Reyes".to_string(),
            expertise: vec!["product".to_string(), "go-to-market".to_string()],
            availability: Availability::Available,
            requires_payment: false,
            session_price: None,
            bio: "Took two marketplaces from pilot to profitability.".to_string(),
            schema_version: version,
        },
        Mentor {
            id: RecordId::new("mentor-002"),
            user_id: None,
            name: "James Park".to_string(),
            expertise: vec!["engineering".to_string(), "scaling".to_string()],
            availability: Availability::Busy,
            requires_payment: false,
            session_price: None,
            bio: "Platform engineer turned CTO coach.".to_string(),
            schema_version: version,
        },
        Mentor {
            id: RecordId::new("mentor-003"),
            user_id: None,
            name: "Dr. Elena Volkov".to_string(),
            expertise: vec!["fundraising".to_string(), "finance".to_string()],
            availability: Availability::Available,
            requires_payment: true,
            session_price: Some(1500),
            bio: "Closed forty seed rounds on both sides of the table.".to_string(),
            schema_version: version,
        },
    ]
}

fn demo_funding_opportunities() -> Vec<FundingOpportunity> {
    let version = migrate::current_version(Collection::FundingOpportunities);
    let now = Timestamp::now();
    vec![
        FundingOpportunity {
            id: RecordId::new("fund-001"),
            provider_id: UserId::new("user-004"),
            title: "Green Seed Grant".to_string(),
            description: "Non-dilutive funding for climate-positive startups.".to_string(),
            amount: 50_000,
            deadline: now.plus_days(45),
            requirements: vec![
                "Working prototype".to_string(),
                "Sustainability impact statement".to_string(),
            ],
            schema_version: version,
        },
        FundingOpportunity {
            id: RecordId::new("fund-002"),
            provider_id: UserId::new("user-005"),
            title: "Campus Innovation Fund".to_string(),
            description: "Early checks for founders still enrolled.".to_string(),
            amount: 25_000,
            deadline: now.plus_days(60),
            requirements: vec![
                "Enrolled founder".to_string(),
                "One-page pitch".to_string(),
            ],
            schema_version: version,
        },
    ]
}

fn demo_programs() -> Vec<Program> {
    let version = migrate::current_version(Collection::Programs);
    let now = Timestamp::now();
    vec![
        Program {
            id: RecordId::new("program-001"),
            title: "Ignite Accelerator".to_string(),
            description: "Twelve weeks of mentoring, workspace and a demo day.".to_string(),
            deadline: now.plus_days(30),
            capacity: Some(25),
            enrolled: 0,
            schema_version: version,
        },
        Program {
            id: RecordId::new("program-002"),
            title: "Founder Bootcamp".to_string(),
            description: "Weekend crash course on validation and pricing.".to_string(),
            deadline: now.plus_days(21),
            capacity: None,
            enrolled: 0,
            schema_version: version,
        },
    ]
}

fn demo_events() -> Vec<Event> {
    let version = migrate::current_version(Collection::Events);
    let now = Timestamp::now();
    vec![
        Event {
            id: RecordId::new("event-001"),
            title: "Demo Day".to_string(),
            description: "Five-minute pitches in front of the whole community.".to_string(),
            date: now.plus_days(14),
            location: Some("Main Hall".to_string()),
            capacity: Some(100),
            registered: 0,
            schema_version: version,
        },
        Event {
            id: RecordId::new("event-002"),
            title: "Investor Mixer".to_string(),
            description: "Founders and funders, no slides allowed.".to_string(),
            date: now.plus_days(28),
            location: Some("Rooftop Lounge".to_string()),
            capacity: Some(40),
            registered: 0,
            schema_version: version,
        },
    ]
}

fn demo_promo_codes() -> Vec<PromoCode> {
    let version = migrate::current_version(Collection::PromoCodes);
    vec![
        PromoCode {
            id: RecordId::new("promo-001"),
            code: "CAMPUS20".to_string(),
            institution: Some("Ignite University".to_string()),
            tier: PlanTier::Pro,
            active: true,
            max_uses: Some(100),
            used_count: 0,
            expires_at: Some(Timestamp::now().plus_days(180)),
            schema_version: version,
        },
        PromoCode {
            id: RecordId::new("promo-002"),
            code: "EDUPRO".to_string(),
            institution: Some("Horizon College".to_string()),
            tier: PlanTier::Pro,
            active: true,
            max_uses: None,
            used_count: 0,
            expires_at: None,
            schema_version: version,
        },
    ]
}
