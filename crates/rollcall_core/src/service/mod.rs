//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers (CLI, future transports) decoupled from storage details.

pub mod attendance_service;
pub mod identity_service;
pub mod rollcall_service;
pub mod roster_service;
