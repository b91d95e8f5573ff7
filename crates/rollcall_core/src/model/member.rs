//! Member model and creation input.
//!
//! # Invariants
//! - At most one member exists per non-null email.
//! - Members without email are never deduplicated.

use super::{non_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned member identifier.
pub type MemberId = i64;

/// A person who may register attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: Option<String>,
}

/// Validated creation input for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub name: String,
    /// Compared exactly; case is preserved.
    pub email: Option<String>,
}

impl NewMember {
    /// Builds creation input from raw caller text.
    ///
    /// The name is trimmed; a blank email is treated as absent.
    pub fn from_input(name: &str, email: Option<&str>) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            email: normalize_email(email),
        })
    }
}

/// Normalizes lookup/creation email input.
pub fn normalize_email(email: Option<&str>) -> Option<String> {
    non_blank(email)
}

/// Outcome of an explicit member creation request.
///
/// Duplicate emails are a best-effort success, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "member_id", rename_all = "snake_case")]
pub enum MemberCreation {
    Created(MemberId),
    /// Another member already owns the email; nothing was written.
    AlreadyExists(MemberId),
}

impl MemberCreation {
    pub fn member_id(self) -> MemberId {
        match self {
            Self::Created(id) | Self::AlreadyExists(id) => id,
        }
    }
}
