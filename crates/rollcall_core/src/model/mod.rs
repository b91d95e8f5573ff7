//! Attendance domain model.
//!
//! # Responsibility
//! - Define the records shared by repositories, services and callers.
//! - Own input validation and normalization for event/member creation.
//!
//! # Invariants
//! - Identifiers are assigned by storage and never reused by callers.
//! - Timestamps are Unix epoch milliseconds (UTC).

pub mod attendance;
pub mod event;
pub mod member;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input validation failure raised before any persistence work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Event title is empty after trimming.
    EmptyTitle,
    /// Member name is empty after trimming.
    EmptyName,
    /// `starts_at` text could not be parsed as a date or date-time.
    InvalidStartsAt(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "event title cannot be empty"),
            Self::EmptyName => write!(f, "member name cannot be empty"),
            Self::InvalidStartsAt(value) => {
                write!(f, "starts_at `{value}` is not a recognized date/time")
            }
        }
    }
}

impl Error for ValidationError {}

/// Returns the current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Maps empty or whitespace-only optional text to `None`.
///
/// Non-empty values are returned untouched (no trimming, no case folding).
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}
