//! `rollcall` command-line entry point.
//!
//! # Responsibility
//! - Parse flags/env into a store path, logging setup and one command.
//! - Map failures to a one-line stderr message and non-zero exit code.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use rollcall_core::StatusPolicy;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_DB_FILE_NAME: &str = "rollcall.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "rollcall")]
#[command(version, about = "Event attendance tracking", long_about = None)]
pub(crate) struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "ROLLCALL_DB_PATH")]
    db: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "ROLLCALL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "ROLLCALL_LOG_DIR")]
    log_dir: Option<String>,

    /// Handling of unrecognized attendance status text
    #[arg(long, global = true, value_enum, default_value_t = StatusPolicyArg::Coerce)]
    status_policy: StatusPolicyArg,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Show events, members and the roster of one event
    Roster {
        /// Event to show; defaults to the most recently starting one
        #[arg(long)]
        event_id: Option<i64>,
    },
    /// Submit or change an attendance decision
    Rsvp {
        #[arg(long)]
        event_id: i64,
        /// Display name, used when no member owns the email
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        /// ATTENDING, NOT_ATTENDING or UNDECIDED
        #[arg(long, default_value = "UNDECIDED")]
        status: String,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Manage events
    Event {
        #[command(subcommand)]
        command: EventCommand,
    },
    /// Manage members
    Member {
        #[command(subcommand)]
        command: MemberCommand,
    },
    /// Delete all attendance, members and events
    Reset,
    /// Print the core version
    Version,
}

#[derive(Subcommand, Debug)]
pub(crate) enum EventCommand {
    Add {
        #[arg(long)]
        title: String,
        /// RFC 3339, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD`
        #[arg(long)]
        starts_at: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum MemberCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum StatusPolicyArg {
    Coerce,
    Legacy,
}

impl From<StatusPolicyArg> for StatusPolicy {
    fn from(value: StatusPolicyArg) -> Self {
        match value {
            StatusPolicyArg::Coerce => StatusPolicy::Coerce,
            StatusPolicyArg::Legacy => StatusPolicy::Legacy,
        }
    }
}

impl Cli {
    pub(crate) fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match commands::run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("rollcall: {err}");
            ExitCode::FAILURE
        }
    }
}
