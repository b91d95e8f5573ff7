//! Caller-facing facade over one attendance store connection.
//!
//! # Responsibility
//! - Wire SQLite repositories into the component services per call.
//! - Expose the list/submit/create/reset operations used by transports.
//!
//! # Invariants
//! - The connection is injected by the caller and only borrowed here.
//! - Attendance submission resolves the member first, then upserts.

use crate::model::attendance::{StatusPolicy, UpsertOutcome};
use crate::model::event::{EventId, NewEvent};
use crate::model::member::{MemberCreation, MemberId};
use crate::repo::attendance_repo::SqliteAttendanceRepository;
use crate::repo::event_repo::{EventRepository, SqliteEventRepository};
use crate::repo::member_repo::SqliteMemberRepository;
use crate::repo::reset::{clear_all, ResetSummary};
use crate::repo::RepoResult;
use crate::service::attendance_service::AttendanceService;
use crate::service::identity_service::IdentityResolver;
use crate::service::roster_service::{Roster, RosterService};
use log::{info, warn};
use serde::Serialize;

/// Raw event creation input as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventInput {
    pub title: String,
    pub starts_at: Option<String>,
    pub location: Option<String>,
    pub note: Option<String>,
}

/// Raw attendance submission as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpSubmission {
    pub event_id: EventId,
    /// Used only when no member owns `email`.
    pub name: String,
    pub email: Option<String>,
    pub status: String,
    pub comment: Option<String>,
}

/// Result of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RsvpReceipt {
    pub event_id: EventId,
    pub member_id: MemberId,
    pub outcome: UpsertOutcome,
}

/// Attendance store operations bound to one connection.
pub struct RollcallService<'conn> {
    conn: &'conn mut rusqlite::Connection,
    policy: StatusPolicy,
}

impl<'conn> RollcallService<'conn> {
    pub fn new(conn: &'conn mut rusqlite::Connection, policy: StatusPolicy) -> Self {
        Self { conn, policy }
    }

    fn store(&self) -> &rusqlite::Connection {
        &*self.conn
    }

    /// Creates one event from raw input.
    pub fn create_event(&self, input: &EventInput) -> RepoResult<EventId> {
        let event = NewEvent::from_input(
            input.title.as_str(),
            input.starts_at.as_deref(),
            input.location.as_deref(),
            input.note.as_deref(),
        )?;
        let id = SqliteEventRepository::try_new(self.store())?.create_event(&event)?;
        info!(
            "event=event_create module=service status=ok event_id={} has_start={}",
            id,
            event.starts_at.is_some()
        );
        Ok(id)
    }

    /// Creates one member; a taken email reports the existing owner.
    pub fn create_member(&self, name: &str, email: Option<&str>) -> RepoResult<MemberCreation> {
        IdentityResolver::new(SqliteMemberRepository::try_new(self.store())?)
            .create_member(name, email)
    }

    /// Resolves the submitting member, then records the decision.
    pub fn submit_attendance(&self, submission: &RsvpSubmission) -> RepoResult<RsvpReceipt> {
        let member_id = IdentityResolver::new(SqliteMemberRepository::try_new(self.store())?)
            .resolve_member(submission.name.as_str(), submission.email.as_deref())?;
        let outcome = AttendanceService::with_policy(
            SqliteAttendanceRepository::try_new(self.store())?,
            self.policy,
        )
        .record_attendance(
            submission.event_id,
            member_id,
            submission.status.as_str(),
            submission.comment.as_deref(),
        )?;

        Ok(RsvpReceipt {
            event_id: submission.event_id,
            member_id,
            outcome,
        })
    }

    /// Loads the list view for `selected_event_id` or the default event.
    pub fn load_roster(&self, selected_event_id: Option<EventId>) -> RepoResult<Roster> {
        RosterService::new(
            SqliteEventRepository::try_new(self.store())?,
            SqliteMemberRepository::try_new(self.store())?,
            SqliteAttendanceRepository::try_new(self.store())?,
        )
        .load_roster(selected_event_id)
    }

    /// Deletes all attendance, members and events.
    pub fn reset(&mut self) -> RepoResult<ResetSummary> {
        let summary = clear_all(self.conn)?;
        warn!(
            "event=store_reset module=service status=ok attendances={} members={} events={}",
            summary.attendances, summary.members, summary.events
        );
        Ok(summary)
    }
}
