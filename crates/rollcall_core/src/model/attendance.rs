//! Attendance model: the single current RSVP decision per (event, member).
//!
//! # Invariants
//! - Exactly one record exists per `(event_id, member_id)` pair.
//! - `updated_at` strictly increases on every write to the same pair.
//! - Status transitions are unrestricted; any status may replace any other.

use super::event::EventId;
use super::member::{Member, MemberId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Recognized attendance decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Attending,
    NotAttending,
    Undecided,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 3] = [Self::Attending, Self::NotAttending, Self::Undecided];

    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attending => "ATTENDING",
            Self::NotAttending => "NOT_ATTENDING",
            Self::Undecided => "UNDECIDED",
        }
    }

    /// Parses an exact (case-sensitive) status value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ATTENDING" => Some(Self::Attending),
            "NOT_ATTENDING" => Some(Self::NotAttending),
            "UNDECIDED" => Some(Self::Undecided),
            _ => None,
        }
    }

    /// Parses a status, falling back to `Undecided` for unknown input.
    pub fn coerce(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Undecided)
    }
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status value as it sits in storage.
///
/// `Unrecognized` only appears for rows written under `StatusPolicy::Legacy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordedStatus {
    Known(AttendanceStatus),
    Unrecognized(String),
}

impl RecordedStatus {
    pub fn from_db(value: String) -> Self {
        match AttendanceStatus::parse(&value) {
            Some(status) => Self::Known(status),
            None => Self::Unrecognized(value),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(status) => status.as_str(),
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }
}

impl From<AttendanceStatus> for RecordedStatus {
    fn from(value: AttendanceStatus) -> Self {
        Self::Known(value)
    }
}

/// How unrecognized status text is handled by the upsert engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Unknown values become `UNDECIDED` on create and on update.
    #[default]
    Coerce,
    /// Unknown values become `UNDECIDED` on create but are written through
    /// verbatim on update. Kept for parity with existing stored data.
    Legacy,
}

impl StatusPolicy {
    /// Status text stored when the pair has no record yet.
    pub fn create_value(self, raw: &str) -> String {
        AttendanceStatus::coerce(raw).as_str().to_string()
    }

    /// Status text stored when the pair already has a record.
    pub fn update_value(self, raw: &str) -> String {
        match self {
            Self::Coerce => AttendanceStatus::coerce(raw).as_str().to_string(),
            Self::Legacy => raw.to_string(),
        }
    }
}

/// Stored attendance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attendance {
    pub event_id: EventId,
    pub member_id: MemberId,
    pub status: RecordedStatus,
    pub comment: Option<String>,
    /// Unix epoch milliseconds of the last write.
    pub updated_at: i64,
}

/// Write request for the upsert engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceWrite {
    pub event_id: EventId,
    pub member_id: MemberId,
    /// Value used when inserting a new record.
    pub create_status: String,
    /// Value used when overwriting an existing record.
    pub update_status: String,
    pub comment: Option<String>,
    pub written_at: i64,
}

/// Whether an upsert inserted or overwrote the pair's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl UpsertOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

/// One roster row: an attendance joined with its member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub event_id: EventId,
    pub member: Member,
    pub status: RecordedStatus,
    pub comment: Option<String>,
    pub updated_at: i64,
}
