//! Identity resolver: maps (name, email) input onto a member id.
//!
//! # Invariants
//! - A non-empty email resolves to the existing owner when there is one.
//! - Members without email are always created fresh.
//! - Duplicate emails never fail explicit member creation; they report
//!   `MemberCreation::AlreadyExists`.

use crate::model::member::{normalize_email, MemberCreation, MemberId, NewMember};
use crate::repo::member_repo::MemberRepository;
use crate::repo::{RepoError, RepoResult};
use log::{debug, info};

/// Member lookup/creation service.
pub struct IdentityResolver<R: MemberRepository> {
    repo: R,
}

impl<R: MemberRepository> IdentityResolver<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Finds a member by email or creates one.
    ///
    /// # Contract
    /// - Existing owner of `email` wins; `name` is ignored in that case.
    /// - Otherwise a new member is created with `name` and `email`.
    ///
    /// # Errors
    /// - `RepoError::Validation` when creation is needed and `name` is blank.
    /// - `RepoError::UniqueViolation` when a concurrent writer claimed the
    ///   email between lookup and insert. Not retried.
    pub fn resolve_member(&self, name: &str, email: Option<&str>) -> RepoResult<MemberId> {
        let email = normalize_email(email);
        if let Some(address) = email.as_deref() {
            if let Some(existing) = self.repo.find_by_email(address)? {
                debug!(
                    "event=member_resolve module=service status=ok outcome=matched member_id={}",
                    existing.id
                );
                return Ok(existing.id);
            }
        }

        let new_member = NewMember::from_input(name, email.as_deref())?;
        let id = self.repo.create_member(&new_member)?;
        info!(
            "event=member_resolve module=service status=ok outcome=created member_id={} has_email={}",
            id,
            new_member.email.is_some()
        );
        Ok(id)
    }

    /// Creates a member, treating an email collision as best-effort success.
    pub fn create_member(&self, name: &str, email: Option<&str>) -> RepoResult<MemberCreation> {
        let new_member = NewMember::from_input(name, email)?;
        match self.repo.create_member(&new_member) {
            Ok(id) => {
                info!(
                    "event=member_create module=service status=ok outcome=created member_id={id}"
                );
                Ok(MemberCreation::Created(id))
            }
            Err(RepoError::UniqueViolation(details)) => {
                let owner = match new_member.email.as_deref() {
                    Some(address) => self.repo.find_by_email(address)?,
                    None => None,
                };
                match owner {
                    Some(existing) => {
                        info!(
                            "event=member_create module=service status=ok outcome=already_exists member_id={}",
                            existing.id
                        );
                        Ok(MemberCreation::AlreadyExists(existing.id))
                    }
                    None => Err(RepoError::UniqueViolation(details)),
                }
            }
            Err(err) => Err(err),
        }
    }
}
