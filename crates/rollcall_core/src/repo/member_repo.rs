//! Member repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Email lookup is an exact match; no case folding.
//! - The `members.email` UNIQUE constraint is the only duplicate guard.

use super::{ensure_tables, RepoResult};
use crate::model::member::{Member, MemberId, NewMember};
use rusqlite::{params, Connection, OptionalExtension, Row};

const MEMBER_SELECT_SQL: &str = "SELECT id, name, email FROM members";

/// Repository interface for member persistence.
pub trait MemberRepository {
    /// Inserts one member.
    ///
    /// Returns `RepoError::UniqueViolation` when the email is already taken.
    fn create_member(&self, member: &NewMember) -> RepoResult<MemberId>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Member>>;
    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>>;
    /// All members ordered by id ascending.
    fn list_members(&self) -> RepoResult<Vec<Member>>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["members"])?;
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(&self, member: &NewMember) -> RepoResult<MemberId> {
        self.conn.execute(
            "INSERT INTO members (name, email) VALUES (?1, ?2);",
            params![member.name.as_str(), member.email.as_deref()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Member>> {
        let member = self
            .conn
            .query_row(
                &format!("{MEMBER_SELECT_SQL} WHERE email = ?1;"),
                [email],
                parse_member_row,
            )
            .optional()?;
        Ok(member)
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let member = self
            .conn
            .query_row(
                &format!("{MEMBER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_member_row,
            )
            .optional()?;
        Ok(member)
    }

    fn list_members(&self) -> RepoResult<Vec<Member>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} ORDER BY id ASC;"))?;
        let members = stmt
            .query_map([], parse_member_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }
}

fn parse_member_row(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
    })
}
