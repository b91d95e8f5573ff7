//! Event repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Events are insert-only here; bulk removal lives in `repo::reset`.
//! - Listing order is `starts_at DESC` (undated events last), then `id DESC`.

use super::{ensure_tables, RepoResult};
use crate::model::event::{Event, EventId, NewEvent};
use rusqlite::{params, Connection, OptionalExtension, Row};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    title,
    starts_at,
    location,
    note
FROM events";

/// Repository interface for event persistence.
pub trait EventRepository {
    fn create_event(&self, event: &NewEvent) -> RepoResult<EventId>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// All events, most recently starting first.
    fn list_events(&self) -> RepoResult<Vec<Event>>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["events"])?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &NewEvent) -> RepoResult<EventId> {
        self.conn.execute(
            "INSERT INTO events (title, starts_at, location, note)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                event.title.as_str(),
                event.starts_at,
                event.location.as_deref(),
                event.note.as_deref(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        let event = self
            .conn
            .query_row(
                &format!("{EVENT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_event_row,
            )
            .optional()?;
        Ok(event)
    }

    fn list_events(&self) -> RepoResult<Vec<Event>> {
        // SQLite sorts NULL lowest, so DESC leaves undated events at the end.
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} ORDER BY starts_at DESC, id DESC;"))?;
        let events = stmt
            .query_map([], parse_event_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }
}

fn parse_event_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get("id")?,
        title: row.get("title")?,
        starts_at: row.get("starts_at")?,
        location: row.get("location")?,
        note: row.get("note")?,
    })
}
