//! Command dispatch and output rendering.
//!
//! Every command opens the store once, runs one core operation and renders
//! either plain text or JSON.

use crate::{Cli, Commands, EventCommand, MemberCommand};
use log::info;
use rollcall_core::db::{open_db, DbError};
use rollcall_core::{
    core_version, default_log_level, init_logging, EventInput, LoggingError, MemberCreation,
    RepoError, ResetSummary, RollcallService, Roster, RsvpReceipt, RsvpSubmission,
};
use serde::Serialize;
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub(crate) enum CliError {
    Logging(LoggingError),
    Db(DbError),
    Repo(RepoError),
    Json(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "logging setup failed: {err}"),
            Self::Db(err) => write!(f, "cannot open database: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "cannot encode output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Runs the parsed command and returns the text to print.
pub(crate) fn run(cli: &Cli) -> Result<String, CliError> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    match &cli.command {
        Commands::Version => render(cli.json, &json!({ "version": core_version() }), || {
            format!("rollcall {}", core_version())
        }),
        Commands::Roster { event_id } => with_service(cli, |service| {
            let roster = service.load_roster(*event_id)?;
            render(cli.json, &roster, || render_roster(&roster))
        }),
        Commands::Rsvp {
            event_id,
            name,
            email,
            status,
            comment,
        } => with_service(cli, |service| {
            let receipt = service.submit_attendance(&RsvpSubmission {
                event_id: *event_id,
                name: name.clone(),
                email: email.clone(),
                status: status.clone(),
                comment: comment.clone(),
            })?;
            render(cli.json, &receipt, || render_receipt(&receipt))
        }),
        Commands::Event {
            command:
                EventCommand::Add {
                    title,
                    starts_at,
                    location,
                    note,
                },
        } => with_service(cli, |service| {
            let event_id = service.create_event(&EventInput {
                title: title.clone(),
                starts_at: starts_at.clone(),
                location: location.clone(),
                note: note.clone(),
            })?;
            render(cli.json, &json!({ "event_id": event_id }), || {
                format!("event #{event_id} created")
            })
        }),
        Commands::Member {
            command: MemberCommand::Add { name, email },
        } => with_service(cli, |service| {
            let creation = service.create_member(name, email.as_deref())?;
            render(cli.json, &creation, || match creation {
                MemberCreation::Created(id) => format!("member #{id} created"),
                MemberCreation::AlreadyExists(id) => {
                    format!("email already registered to member #{id}; nothing changed")
                }
            })
        }),
        Commands::Reset => with_service(cli, |service| {
            let summary = service.reset()?;
            info!("event=cli_reset module=cli status=ok");
            render(cli.json, &summary, || render_reset(&summary))
        }),
    }
}

fn with_service(
    cli: &Cli,
    command: impl FnOnce(&mut RollcallService<'_>) -> Result<String, CliError>,
) -> Result<String, CliError> {
    let mut conn = open_db(cli.db_path())?;
    let mut service = RollcallService::new(&mut conn, cli.status_policy.into());
    command(&mut service)
}

fn render<T: Serialize>(
    as_json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<String, CliError> {
    if as_json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text())
    }
}

fn render_roster(roster: &Roster) -> String {
    let mut lines = vec!["Events:".to_string()];
    if roster.events.is_empty() {
        lines.push("  (none)".to_string());
    }
    for event in &roster.events {
        let marker = if Some(event.id) == roster.selected_event_id {
            '*'
        } else {
            ' '
        };
        let mut line = format!(
            "{marker} #{} {} [{}]",
            event.id,
            event.title,
            format_epoch_ms(event.starts_at)
        );
        if let Some(location) = &event.location {
            line.push_str(&format!(" @ {location}"));
        }
        if let Some(note) = &event.note {
            line.push_str(&format!(" ({note})"));
        }
        lines.push(line);
    }

    lines.push("Members:".to_string());
    if roster.members.is_empty() {
        lines.push("  (none)".to_string());
    }
    for member in &roster.members {
        lines.push(match &member.email {
            Some(email) => format!("  #{} {} <{email}>", member.id, member.name),
            None => format!("  #{} {}", member.id, member.name),
        });
    }

    lines.push(match roster.selected_event_id {
        Some(event_id) => format!("Roster for event #{event_id}:"),
        None => "Roster:".to_string(),
    });
    if roster.attendances.is_empty() {
        lines.push("  (no responses)".to_string());
    }
    for entry in &roster.attendances {
        lines.push(format!(
            "  {:<20} {:<14} {}  {}",
            entry.member.name,
            entry.status.as_str(),
            format_epoch_ms(Some(entry.updated_at)),
            entry.comment.as_deref().unwrap_or("")
        ));
    }

    lines.join("\n").trim_end().to_string()
}

fn render_receipt(receipt: &RsvpReceipt) -> String {
    format!(
        "attendance {} for member #{} on event #{}",
        receipt.outcome.as_str(),
        receipt.member_id,
        receipt.event_id
    )
}

fn render_reset(summary: &ResetSummary) -> String {
    format!(
        "removed {} attendance record(s), {} member(s), {} event(s)",
        summary.attendances, summary.members, summary.events
    )
}

fn format_epoch_ms(value: Option<i64>) -> String {
    value
        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
        .map(|moment| moment.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unscheduled".to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_epoch_ms, render_roster, run, CliError};
    use crate::Cli;
    use clap::Parser;
    use rollcall_core::{RepoError, Roster};
    use std::path::Path;

    fn run_args(db: &Path, args: &[&str]) -> Result<String, CliError> {
        let db = db.to_str().unwrap();
        let argv = ["rollcall", "--db", db]
            .into_iter()
            .chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();
        run(&cli)
    }

    #[test]
    fn rsvp_flow_renders_roster() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cli.db");

        let created = run_args(
            &db,
            &["event", "add", "--title", "Meetup", "--starts-at", "2025-05-01T19:00"],
        )
        .unwrap();
        assert_eq!(created, "event #1 created");

        let first = run_args(
            &db,
            &[
                "rsvp", "--event-id", "1", "--name", "Alice", "--email", "a@x.com",
                "--status", "ATTENDING", "--comment", "see you there",
            ],
        )
        .unwrap();
        assert_eq!(first, "attendance created for member #1 on event #1");

        let second = run_args(
            &db,
            &[
                "rsvp", "--event-id", "1", "--name", "Alice", "--email", "a@x.com",
                "--status", "NOT_ATTENDING",
            ],
        )
        .unwrap();
        assert_eq!(second, "attendance updated for member #1 on event #1");

        let roster = run_args(&db, &["roster"]).unwrap();
        assert!(roster.contains("* #1 Meetup [2025-05-01 19:00 UTC]"));
        assert!(roster.contains("#1 Alice <a@x.com>"));
        assert!(roster.contains("NOT_ATTENDING"));
        assert!(!roster.contains("see you there"));
    }

    #[test]
    fn json_output_and_duplicate_member() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cli.db");

        run_args(&db, &["member", "add", "--name", "Bo", "--email", "b@x.com"]).unwrap();
        let duplicate = run_args(
            &db,
            &["--json", "member", "add", "--name", "Bo", "--email", "b@x.com"],
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&duplicate).unwrap();
        assert_eq!(value["outcome"], "already_exists");
        assert_eq!(value["member_id"], 1);

        let reset = run_args(&db, &["--json", "reset"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&reset).unwrap();
        assert_eq!(value["members"], 1);
    }

    #[test]
    fn failures_surface_as_errors() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cli.db");

        let err = run_args(
            &db,
            &["rsvp", "--event-id", "99", "--name", "Cy", "--status", "ATTENDING"],
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Repo(RepoError::ForeignKeyViolation(_))));

        let err = run_args(&db, &["event", "add", "--title", " "]).unwrap_err();
        assert_eq!(err.to_string(), "event title cannot be empty");
    }

    #[test]
    fn legacy_policy_flag_is_parsed() {
        let cli = Cli::try_parse_from(["rollcall", "--status-policy", "legacy", "reset"]).unwrap();
        assert_eq!(
            rollcall_core::StatusPolicy::from(cli.status_policy),
            rollcall_core::StatusPolicy::Legacy
        );
    }

    #[test]
    fn unscheduled_timestamps_render_placeholder() {
        assert_eq!(format_epoch_ms(None), "unscheduled");
        assert_eq!(format_epoch_ms(Some(0)), "1970-01-01 00:00 UTC");
    }

    #[test]
    fn empty_roster_renders_placeholders() {
        let roster = Roster {
            events: Vec::new(),
            members: Vec::new(),
            selected_event_id: None,
            attendances: Vec::new(),
        };
        assert_eq!(
            render_roster(&roster),
            "Events:\n  (none)\nMembers:\n  (none)\nRoster:\n  (no responses)"
        );
    }
}
