//! Attendance upsert engine.
//!
//! # Invariants
//! - One record per `(event_id, member_id)`; resubmission overwrites status,
//!   comment and `updated_at` only.
//! - Unknown status text is handled by the configured `StatusPolicy`.
//! - Missing events/members are left to the storage foreign keys.

use crate::model::attendance::{AttendanceWrite, StatusPolicy, UpsertOutcome};
use crate::model::event::EventId;
use crate::model::member::MemberId;
use crate::model::now_epoch_ms;
use crate::repo::attendance_repo::AttendanceRepository;
use crate::repo::RepoResult;
use log::{error, info};
use std::time::Instant;

/// Use-case service recording attendance decisions.
pub struct AttendanceService<R: AttendanceRepository> {
    repo: R,
    policy: StatusPolicy,
}

impl<R: AttendanceRepository> AttendanceService<R> {
    /// Creates a service with the default (`Coerce`) status policy.
    pub fn new(repo: R) -> Self {
        Self::with_policy(repo, StatusPolicy::default())
    }

    pub fn with_policy(repo: R, policy: StatusPolicy) -> Self {
        Self { repo, policy }
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Creates or overwrites the attendance record for the pair.
    ///
    /// # Errors
    /// - `RepoError::ForeignKeyViolation` for unknown event or member ids.
    pub fn record_attendance(
        &self,
        event_id: EventId,
        member_id: MemberId,
        status: &str,
        comment: Option<&str>,
    ) -> RepoResult<UpsertOutcome> {
        let started_at = Instant::now();
        let write = AttendanceWrite {
            event_id,
            member_id,
            create_status: self.policy.create_value(status),
            update_status: self.policy.update_value(status),
            comment: comment.map(str::to_string),
            written_at: now_epoch_ms(),
        };

        match self.repo.upsert_attendance(&write) {
            Ok(outcome) => {
                info!(
                    "event=attendance_upsert module=service status=ok outcome={} event_id={} member_id={} duration_ms={}",
                    outcome.as_str(),
                    event_id,
                    member_id,
                    started_at.elapsed().as_millis()
                );
                Ok(outcome)
            }
            Err(err) => {
                error!(
                    "event=attendance_upsert module=service status=error event_id={} member_id={} duration_ms={} error={}",
                    event_id,
                    member_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}
