use rollcall_core::db::{open_db, open_db_in_memory};
use rollcall_core::{
    AttendanceRepository, AttendanceService, AttendanceStatus, EventRepository, IdentityResolver,
    NewEvent, RecordedStatus, RepoError, SqliteAttendanceRepository, SqliteEventRepository,
    SqliteMemberRepository, StatusPolicy, UpsertOutcome,
};
use rusqlite::Connection;
use std::thread;

fn seed_pair(conn: &Connection) -> (i64, i64) {
    let events = SqliteEventRepository::try_new(conn).unwrap();
    let event_id = events
        .create_event(&NewEvent::from_input("Meetup", None, None, None).unwrap())
        .unwrap();
    let resolver = IdentityResolver::new(SqliteMemberRepository::try_new(conn).unwrap());
    let member_id = resolver.resolve_member("Alice", Some("a@x.com")).unwrap();
    (event_id, member_id)
}

fn row_count(conn: &Connection, event_id: i64, member_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM attendances WHERE event_id = ?1 AND member_id = ?2;",
        [event_id, member_id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn second_write_overwrites_single_row_and_advances_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let (event_id, member_id) = seed_pair(&conn);
    let repo = SqliteAttendanceRepository::try_new(&conn).unwrap();
    let service = AttendanceService::new(repo);

    let first = service
        .record_attendance(event_id, member_id, "ATTENDING", Some("see you there"))
        .unwrap();
    assert_eq!(first, UpsertOutcome::Created);
    let before = SqliteAttendanceRepository::try_new(&conn)
        .unwrap()
        .get_attendance(event_id, member_id)
        .unwrap()
        .unwrap();

    let second = service
        .record_attendance(event_id, member_id, "NOT_ATTENDING", Some(""))
        .unwrap();
    assert_eq!(second, UpsertOutcome::Updated);
    let after = SqliteAttendanceRepository::try_new(&conn)
        .unwrap()
        .get_attendance(event_id, member_id)
        .unwrap()
        .unwrap();

    assert_eq!(row_count(&conn, event_id, member_id), 1);
    assert_eq!(
        after.status,
        RecordedStatus::Known(AttendanceStatus::NotAttending)
    );
    assert_eq!(after.comment.as_deref(), Some(""));
    assert!(after.updated_at > before.updated_at);
}

#[test]
fn updated_at_strictly_increases_across_rapid_writes() {
    let conn = open_db_in_memory().unwrap();
    let (event_id, member_id) = seed_pair(&conn);
    let service = AttendanceService::new(SqliteAttendanceRepository::try_new(&conn).unwrap());
    let reader = SqliteAttendanceRepository::try_new(&conn).unwrap();

    let mut previous = i64::MIN;
    for status in ["ATTENDING", "UNDECIDED", "NOT_ATTENDING", "ATTENDING"] {
        service
            .record_attendance(event_id, member_id, status, None)
            .unwrap();
        let current = reader
            .get_attendance(event_id, member_id)
            .unwrap()
            .unwrap()
            .updated_at;
        assert!(current > previous, "{current} should exceed {previous}");
        previous = current;
    }
}

#[test]
fn unknown_status_is_coerced_on_create_under_both_policies() {
    for policy in [StatusPolicy::Coerce, StatusPolicy::Legacy] {
        let conn = open_db_in_memory().unwrap();
        let (event_id, member_id) = seed_pair(&conn);
        let service = AttendanceService::with_policy(
            SqliteAttendanceRepository::try_new(&conn).unwrap(),
            policy,
        );

        service
            .record_attendance(event_id, member_id, "BOGUS", None)
            .unwrap();

        let stored = SqliteAttendanceRepository::try_new(&conn)
            .unwrap()
            .get_attendance(event_id, member_id)
            .unwrap()
            .unwrap();
        assert_eq!(
            stored.status,
            RecordedStatus::Known(AttendanceStatus::Undecided),
            "policy {policy:?}"
        );
    }
}

// Legacy policy reproduces the historical asymmetry: the update path writes
// unknown status text through verbatim. Recorded as existing behavior, not
// as a desired one.
#[test]
fn legacy_policy_writes_unknown_status_through_on_update() {
    let conn = open_db_in_memory().unwrap();
    let (event_id, member_id) = seed_pair(&conn);
    let service = AttendanceService::with_policy(
        SqliteAttendanceRepository::try_new(&conn).unwrap(),
        StatusPolicy::Legacy,
    );

    service
        .record_attendance(event_id, member_id, "BOGUS", None)
        .unwrap();
    service
        .record_attendance(event_id, member_id, "BOGUS", None)
        .unwrap();

    let stored = SqliteAttendanceRepository::try_new(&conn)
        .unwrap()
        .get_attendance(event_id, member_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, RecordedStatus::Unrecognized("BOGUS".into()));
    assert_eq!(stored.status.as_str(), "BOGUS");
}

#[test]
fn coerce_policy_normalizes_unknown_status_on_update() {
    let conn = open_db_in_memory().unwrap();
    let (event_id, member_id) = seed_pair(&conn);
    let service = AttendanceService::new(SqliteAttendanceRepository::try_new(&conn).unwrap());
    assert_eq!(service.policy(), StatusPolicy::Coerce);

    service
        .record_attendance(event_id, member_id, "ATTENDING", None)
        .unwrap();
    service
        .record_attendance(event_id, member_id, "BOGUS", None)
        .unwrap();

    let stored = SqliteAttendanceRepository::try_new(&conn)
        .unwrap()
        .get_attendance(event_id, member_id)
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.status,
        RecordedStatus::Known(AttendanceStatus::Undecided)
    );
}

#[test]
fn unknown_event_or_member_is_rejected_by_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let (event_id, member_id) = seed_pair(&conn);
    let service = AttendanceService::new(SqliteAttendanceRepository::try_new(&conn).unwrap());

    let missing_event = service
        .record_attendance(event_id + 100, member_id, "ATTENDING", None)
        .unwrap_err();
    assert!(matches!(missing_event, RepoError::ForeignKeyViolation(_)));

    let missing_member = service
        .record_attendance(event_id, member_id + 100, "ATTENDING", None)
        .unwrap_err();
    assert!(matches!(missing_member, RepoError::ForeignKeyViolation(_)));

    let total: i64 = conn
        .query_row("SELECT COUNT(*) FROM attendances;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn concurrent_submissions_for_one_pair_leave_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concurrent.db");
    let (event_id, member_id) = {
        let conn = open_db(&path).unwrap();
        seed_pair(&conn)
    };

    let workers = (0..4)
        .map(|worker| {
            let path = path.clone();
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let service =
                    AttendanceService::new(SqliteAttendanceRepository::try_new(&conn).unwrap());
                for round in 0..10 {
                    let status = if (worker + round) % 2 == 0 {
                        "ATTENDING"
                    } else {
                        "NOT_ATTENDING"
                    };
                    service
                        .record_attendance(event_id, member_id, status, None)
                        .unwrap();
                }
            })
        })
        .collect::<Vec<_>>();
    for worker in workers {
        worker.join().unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(row_count(&conn, event_id, member_id), 1);
}
