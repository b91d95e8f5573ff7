//! Roster read model.
//!
//! # Invariants
//! - `events` are ordered `starts_at DESC`, `members` by id ascending.
//! - `attendances` hold only the selected event's rows, newest write first.
//! - With no selectable event the roster carries no attendance rows.

use crate::model::attendance::RosterEntry;
use crate::model::event::{Event, EventId};
use crate::model::member::Member;
use crate::repo::attendance_repo::AttendanceRepository;
use crate::repo::event_repo::EventRepository;
use crate::repo::member_repo::MemberRepository;
use crate::repo::RepoResult;
use serde::Serialize;

/// Materialized list view for one selected event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub events: Vec<Event>,
    pub members: Vec<Member>,
    /// Caller's selection, or the default when none was given.
    pub selected_event_id: Option<EventId>,
    pub attendances: Vec<RosterEntry>,
}

/// Picks the event shown when the caller selects none.
///
/// Expects `events` in roster order; the most recently starting event wins.
pub fn default_event_selection(events: &[Event]) -> Option<EventId> {
    events.first().map(|event| event.id)
}

/// Read-model service joining events, members and attendance.
pub struct RosterService<E, M, A> {
    events: E,
    members: M,
    attendances: A,
}

impl<E, M, A> RosterService<E, M, A>
where
    E: EventRepository,
    M: MemberRepository,
    A: AttendanceRepository,
{
    pub fn new(events: E, members: M, attendances: A) -> Self {
        Self {
            events,
            members,
            attendances,
        }
    }

    /// Loads the roster for `selected_event_id`, or the default event.
    pub fn load_roster(&self, selected_event_id: Option<EventId>) -> RepoResult<Roster> {
        let events = self.events.list_events()?;
        let members = self.members.list_members()?;
        let selected_event_id = selected_event_id.or_else(|| default_event_selection(&events));
        let attendances = match selected_event_id {
            Some(event_id) => self.attendances.list_roster(event_id)?,
            None => Vec::new(),
        };

        Ok(Roster {
            events,
            members,
            selected_event_id,
            attendances,
        })
    }
}
