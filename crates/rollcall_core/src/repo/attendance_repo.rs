//! Attendance repository: the upsert engine's storage half and roster query.
//!
//! # Responsibility
//! - Insert-or-update the single record for an `(event_id, member_id)` pair.
//! - Load one event's attendance rows joined with member identity.
//!
//! # Invariants
//! - The upsert runs as one `INSERT .. ON CONFLICT` inside an IMMEDIATE
//!   transaction, so concurrent writers for one pair never duplicate rows.
//! - `updated_at` is `max(written_at, previous + 1)` and therefore strictly
//!   increasing per pair.
//! - Roster rows are ordered `updated_at DESC, member_id ASC`.

use super::{ensure_tables, RepoResult};
use crate::model::attendance::{
    Attendance, AttendanceWrite, RecordedStatus, RosterEntry, UpsertOutcome,
};
use crate::model::event::EventId;
use crate::model::member::{Member, MemberId};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// Repository interface for attendance persistence.
pub trait AttendanceRepository {
    /// Atomically creates or overwrites the record for the write's pair.
    fn upsert_attendance(&self, write: &AttendanceWrite) -> RepoResult<UpsertOutcome>;
    fn get_attendance(
        &self,
        event_id: EventId,
        member_id: MemberId,
    ) -> RepoResult<Option<Attendance>>;
    /// Attendance rows for one event with member identity, newest first.
    fn list_roster(&self, event_id: EventId) -> RepoResult<Vec<RosterEntry>>;
}

/// SQLite-backed attendance repository.
pub struct SqliteAttendanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttendanceRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["events", "members", "attendances"])?;
        Ok(Self { conn })
    }
}

impl AttendanceRepository for SqliteAttendanceRepository<'_> {
    fn upsert_attendance(&self, write: &AttendanceWrite) -> RepoResult<UpsertOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let existed: i64 = tx.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM attendances
                WHERE event_id = ?1 AND member_id = ?2
            );",
            params![write.event_id, write.member_id],
            |row| row.get(0),
        )?;

        tx.execute(
            "INSERT INTO attendances (event_id, member_id, status, comment, updated_at)
             VALUES (?1, ?2, ?3, ?5, ?6)
             ON CONFLICT (event_id, member_id) DO UPDATE SET
                status = ?4,
                comment = excluded.comment,
                updated_at = MAX(excluded.updated_at, attendances.updated_at + 1);",
            params![
                write.event_id,
                write.member_id,
                write.create_status.as_str(),
                write.update_status.as_str(),
                write.comment.as_deref(),
                write.written_at,
            ],
        )?;
        tx.commit()?;

        Ok(if existed == 1 {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Created
        })
    }

    fn get_attendance(
        &self,
        event_id: EventId,
        member_id: MemberId,
    ) -> RepoResult<Option<Attendance>> {
        let attendance = self
            .conn
            .query_row(
                "SELECT event_id, member_id, status, comment, updated_at
                 FROM attendances
                 WHERE event_id = ?1 AND member_id = ?2;",
                params![event_id, member_id],
                parse_attendance_row,
            )
            .optional()?;
        Ok(attendance)
    }

    fn list_roster(&self, event_id: EventId) -> RepoResult<Vec<RosterEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                a.event_id,
                a.status,
                a.comment,
                a.updated_at,
                m.id AS member_id,
                m.name,
                m.email
             FROM attendances a
             INNER JOIN members m ON m.id = a.member_id
             WHERE a.event_id = ?1
             ORDER BY a.updated_at DESC, a.member_id ASC;",
        )?;
        let entries = stmt
            .query_map([event_id], parse_roster_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn parse_attendance_row(row: &Row<'_>) -> rusqlite::Result<Attendance> {
    Ok(Attendance {
        event_id: row.get("event_id")?,
        member_id: row.get("member_id")?,
        status: RecordedStatus::from_db(row.get("status")?),
        comment: row.get("comment")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_roster_row(row: &Row<'_>) -> rusqlite::Result<RosterEntry> {
    Ok(RosterEntry {
        event_id: row.get("event_id")?,
        member: Member {
            id: row.get("member_id")?,
            name: row.get("name")?,
            email: row.get("email")?,
        },
        status: RecordedStatus::from_db(row.get("status")?),
        comment: row.get("comment")?,
        updated_at: row.get("updated_at")?,
    })
}
