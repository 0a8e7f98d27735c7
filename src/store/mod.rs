//! Append-only store: the session, result and error logs under the data
//! directory.
//!
//! Every append is one synchronous write. There is no transaction across
//! the three files.

mod csv_log;

pub use csv_log::CsvLog;

use crate::errors::AppResult;
use crate::models::result_row::{RESULT_HEADERS, RawResultRow};
use crate::models::{ErrorEvent, ResultRow, SessionRecord};
use std::path::Path;

pub const SESSION_HEADERS: [&str; 10] = [
    "session_id",
    "started_at",
    "ended_at",
    "location",
    "stage",
    "difficulty",
    "party_type",
    "duration_minutes",
    "note",
    "spot",
];

pub const ERROR_HEADERS: [&str; 4] = ["session_id", "character", "timestamp", "error_message"];

pub const SESSIONS_FILE: &str = "runs.csv";
pub const RESULTS_FILE: &str = "results_per_char.csv";
pub const ERRORS_FILE: &str = "errors.csv";

#[derive(Debug, Clone)]
pub struct Store {
    sessions: CsvLog,
    results: CsvLog,
    errors: CsvLog,
}

impl Store {
    /// Open (and create with headers where missing) the three logs.
    pub fn open(data_dir: &Path) -> AppResult<Self> {
        Ok(Self {
            sessions: CsvLog::open(data_dir.join(SESSIONS_FILE), &SESSION_HEADERS)?,
            results: CsvLog::open(data_dir.join(RESULTS_FILE), &RESULT_HEADERS)?,
            errors: CsvLog::open(data_dir.join(ERRORS_FILE), &ERROR_HEADERS)?,
        })
    }

    pub fn append_session(&self, record: &SessionRecord) -> AppResult<()> {
        self.sessions.append(record)
    }

    pub fn append_result(&self, row: &ResultRow) -> AppResult<()> {
        self.results.append_fields(row.to_fields())
    }

    pub fn append_error(&self, event: &ErrorEvent) -> AppResult<()> {
        self.errors.append(event)
    }

    /// Record a diagnostic without ever failing the caller.
    pub fn record_error(&self, event: &ErrorEvent) {
        if let Err(e) = self.append_error(event) {
            tracing::warn!(
                session = %event.session_id,
                character = %event.character,
                error = %e,
                "could not write error log entry"
            );
        }
    }

    pub fn load_sessions(&self) -> AppResult<Vec<SessionRecord>> {
        self.sessions.read_all()
    }

    pub fn load_results(&self) -> AppResult<Vec<ResultRow>> {
        let raw: Vec<RawResultRow> = self.results.read_all()?;
        Ok(raw.into_iter().map(ResultRow::from).collect())
    }

    pub fn load_errors(&self) -> AppResult<Vec<ErrorEvent>> {
        self.errors.read_all()
    }
}
