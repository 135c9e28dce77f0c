//! Demo seed and demo login, end to end on disk.
//!
//! The seed path is what first-run installs and showcases lean on: open
//! with [`Config::with_demo_seed`], log the demo user in, and everything
//! is browsable. The guards matter most across restarts, so these tests
//! run against a real file and reopen it.

use ignitedb::{Config, IgniteDb, DEMO_USER_ID};

#[test]
fn test_seeded_store_survives_reopen_without_duplicating() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.redb");

    {
        let db = IgniteDb::open(&path, Config::with_demo_seed()).unwrap();
        assert_eq!(db.startups().unwrap().len(), 5);
        assert_eq!(db.users().unwrap().len(), 5);
        db.close().unwrap();
    }

    // Reopening with the seed flag must not add a second copy.
    let db = IgniteDb::open(&path, Config::with_demo_seed()).unwrap();
    assert_eq!(db.startups().unwrap().len(), 5);
    assert_eq!(db.users().unwrap().len(), 5);
    assert_eq!(db.mentors().unwrap().len(), 3);
    assert_eq!(db.programs().unwrap().len(), 2);
    assert_eq!(db.events().unwrap().len(), 2);
}

#[test]
fn test_demo_login_builds_a_browsable_account() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.redb");

    let db = IgniteDb::open(&path, Config::with_demo_seed()).unwrap();
    let demo = db.login_demo().unwrap();
    assert_eq!(demo.id.as_str(), DEMO_USER_ID);

    // Logged in, with a history to show on every screen.
    let session = db.session().unwrap().unwrap();
    assert_eq!(session.id, demo.id);
    assert!(!db.activities_for(&demo.id).unwrap().is_empty());

    let applications = db.applications().unwrap();
    assert!(applications.iter().any(|a| a.applicant_id == demo.id));

    // The backfill survives a restart; logging in again adds nothing.
    db.close().unwrap();
    let db = IgniteDb::open(&path, Config::default()).unwrap();
    let before = db.applications().unwrap().len();
    db.login_demo().unwrap();
    assert_eq!(db.applications().unwrap().len(), before);
}

#[test]
fn test_plain_open_does_not_seed() {
    let db = IgniteDb::open_in_memory(Config::default()).unwrap();
    assert!(db.startups().unwrap().is_empty());
    assert!(db.users().unwrap().is_empty());
}
