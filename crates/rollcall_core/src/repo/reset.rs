//! Bulk reset of the attendance store (development aid).
//!
//! Deletion order follows foreign-key dependencies: attendances, members,
//! events. All three deletes commit together or not at all.

use super::RepoResult;
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

/// Row counts removed by a reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResetSummary {
    pub attendances: usize,
    pub members: usize,
    pub events: usize,
}

/// Deletes every attendance, member and event row.
pub fn clear_all(conn: &mut Connection) -> RepoResult<ResetSummary> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let summary = ResetSummary {
        attendances: tx.execute("DELETE FROM attendances;", [])?,
        members: tx.execute("DELETE FROM members;", [])?,
        events: tx.execute("DELETE FROM events;", [])?,
    };
    tx.commit()?;
    Ok(summary)
}
