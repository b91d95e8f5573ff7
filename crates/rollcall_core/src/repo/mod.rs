//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//! - Translate SQLite constraint failures into semantic errors.
//!
//! # Invariants
//! - Repositories borrow a caller-owned connection; they never open one.
//! - Constraint failures surface as `UniqueViolation`/`ForeignKeyViolation`,
//!   never as opaque driver errors.

pub mod attendance_repo;
pub mod event_repo;
pub mod member_repo;
pub mod reset;

use crate::db::DbError;
use crate::model::ValidationError;
use rusqlite::{ffi, Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for attendance-store persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// A UNIQUE or PRIMARY KEY constraint rejected the write.
    UniqueViolation(String),
    /// A referenced event or member does not exist.
    ForeignKeyViolation(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UniqueViolation(details) => write!(f, "uniqueness conflict: {details}"),
            Self::ForeignKeyViolation(details) => {
                write!(f, "referenced row does not exist: {details}")
            }
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; was the database migrated?")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            if failure.code == ErrorCode::ConstraintViolation {
                let details = message
                    .clone()
                    .unwrap_or_else(|| failure.to_string());
                match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        return Self::UniqueViolation(details);
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                        return Self::ForeignKeyViolation(details);
                    }
                    _ => {}
                }
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Fails fast when a repository is built over an unmigrated connection.
pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for &table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}
