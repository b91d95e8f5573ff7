//! Event model and creation input.
//!
//! # Invariants
//! - `title` is trimmed and never empty for persisted events.
//! - `starts_at` is optional; events without a start sort after dated ones.

use super::{non_blank, ValidationError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Storage-assigned event identifier.
pub type EventId = i64;

/// A scheduled occasion members may RSVP to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    /// Unix epoch milliseconds.
    pub starts_at: Option<i64>,
    pub location: Option<String>,
    pub note: Option<String>,
}

/// Validated creation input for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub starts_at: Option<i64>,
    pub location: Option<String>,
    pub note: Option<String>,
}

impl NewEvent {
    /// Builds creation input from raw caller text.
    ///
    /// # Contract
    /// - `title` is trimmed and must not be empty.
    /// - Empty `starts_at`, `location` and `note` become `None`.
    ///
    /// # Errors
    /// - `ValidationError::EmptyTitle` for a blank title.
    /// - `ValidationError::InvalidStartsAt` when `starts_at` is unparseable.
    pub fn from_input(
        title: &str,
        starts_at: Option<&str>,
        location: Option<&str>,
        note: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let starts_at = match non_blank(starts_at) {
            Some(text) => Some(parse_starts_at(&text)?),
            None => None,
        };

        Ok(Self {
            title: title.to_string(),
            starts_at,
            location: non_blank(location),
            note: non_blank(note),
        })
    }
}

/// Parses an event start value into epoch milliseconds.
///
/// Accepted shapes, tried in order:
/// - RFC 3339 (`2025-05-01T19:00:00+09:00`)
/// - `YYYY-MM-DDTHH:MM[:SS[.fff]]` and `YYYY-MM-DD HH:MM[:SS[.fff]]`, read as UTC
/// - `YYYY-MM-DD`, midnight UTC
pub fn parse_starts_at(value: &str) -> Result<i64, ValidationError> {
    let trimmed = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.timestamp_millis());
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
        .ok_or_else(|| ValidationError::InvalidStartsAt(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_starts_at, NewEvent};
    use crate::model::ValidationError;

    #[test]
    fn parse_starts_at_accepts_supported_shapes() {
        let expected = 1_746_126_000_000; // 2025-05-01T19:00:00Z
        assert_eq!(parse_starts_at("2025-05-01T19:00:00Z").unwrap(), expected);
        assert_eq!(
            parse_starts_at("2025-05-02T04:00:00+09:00").unwrap(),
            expected
        );
        assert_eq!(parse_starts_at("2025-05-01T19:00").unwrap(), expected);
        assert_eq!(parse_starts_at("2025-05-01 19:00:00").unwrap(), expected);
        assert_eq!(
            parse_starts_at("2025-05-01").unwrap(),
            expected - 19 * 3_600_000
        );
    }

    #[test]
    fn parse_starts_at_keeps_fractional_seconds() {
        let expected = 1_746_126_000_000; // 2025-05-01T19:00:00Z
        assert_eq!(
            parse_starts_at("2025-05-01T19:00:00.5").unwrap(),
            expected + 500
        );
        assert_eq!(
            parse_starts_at("2025-05-01 19:00:00.250").unwrap(),
            expected + 250
        );
        assert_eq!(parse_starts_at("2025-05-01T19:00:00").unwrap(), expected);
    }

    #[test]
    fn parse_starts_at_rejects_garbage() {
        let err = parse_starts_at("next friday").unwrap_err();
        assert_eq!(err, ValidationError::InvalidStartsAt("next friday".into()));
    }

    #[test]
    fn from_input_trims_title_and_drops_blank_optionals() {
        let event = NewEvent::from_input("  Meetup  ", Some(""), Some(" "), None).unwrap();
        assert_eq!(event.title, "Meetup");
        assert_eq!(event.starts_at, None);
        assert_eq!(event.location, None);
        assert_eq!(event.note, None);
    }

    #[test]
    fn from_input_rejects_blank_title() {
        let err = NewEvent::from_input("   ", None, None, None).unwrap_err();
        assert_eq!(err, ValidationError::EmptyTitle);
    }
}
