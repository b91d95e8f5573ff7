//! Core domain logic for Rollcall attendance tracking.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attendance::{
    Attendance, AttendanceStatus, RecordedStatus, RosterEntry, StatusPolicy, UpsertOutcome,
};
pub use model::event::{parse_starts_at, Event, EventId, NewEvent};
pub use model::member::{Member, MemberCreation, MemberId, NewMember};
pub use model::ValidationError;
pub use repo::attendance_repo::{AttendanceRepository, SqliteAttendanceRepository};
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::member_repo::{MemberRepository, SqliteMemberRepository};
pub use repo::reset::{clear_all, ResetSummary};
pub use repo::{RepoError, RepoResult};
pub use service::attendance_service::AttendanceService;
pub use service::identity_service::IdentityResolver;
pub use service::rollcall_service::{EventInput, RollcallService, RsvpReceipt, RsvpSubmission};
pub use service::roster_service::{default_event_selection, Roster, RosterService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
