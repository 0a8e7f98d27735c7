//! Session orchestration: lock → sample → wait → sample → reconcile →
//! persist → unlock.

use crate::core::fetcher::LeaderboardSource;
use crate::core::leaderboard::parse_leaderboard;
use crate::core::lock::SessionLock;
use crate::errors::{AppError, AppResult};
use crate::models::session_record::SessionMeta;
use crate::models::{ErrorEvent, ResultRow, SessionRecord, Snapshot};
use crate::store::Store;
use crate::utils::date;
use chrono::{DateTime, Local};
use std::thread;
use std::time::Duration;

pub const MISSING_AT_FIRST: &str = "missing at first sample";
pub const MISSING_AT_SECOND: &str = "missing at second sample";

/// Context label used in the error log for session-level failures.
pub const SESSION_CONTEXT: &str = "session";

/// Everything a session needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub characters: Vec<String>,
    /// Heading label of the leaderboard section.
    pub section: String,
    /// Value of the `server` column in result rows.
    pub server: String,
    pub meta: SessionMeta,
    pub wait: Duration,
}

#[derive(Debug)]
pub enum SessionOutcome {
    Completed {
        record: SessionRecord,
        rows: Vec<ResultRow>,
    },
    Failed {
        record: SessionRecord,
        reason: AppError,
    },
}

impl SessionOutcome {
    /// Turn a failed session back into an error for the process boundary.
    pub fn into_result(self) -> AppResult<(SessionRecord, Vec<ResultRow>)> {
        match self {
            SessionOutcome::Completed { record, rows } => Ok((record, rows)),
            SessionOutcome::Failed { reason, .. } => Err(reason),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Sample {
    First,
    Second,
}

impl Sample {
    fn missing_message(self) -> &'static str {
        match self {
            Sample::First => MISSING_AT_FIRST,
            Sample::Second => MISSING_AT_SECOND,
        }
    }
}

pub struct SessionRunner<'a, S: LeaderboardSource> {
    source: &'a S,
    store: &'a Store,
    lock: &'a SessionLock,
}

impl<'a, S: LeaderboardSource> SessionRunner<'a, S> {
    pub fn new(source: &'a S, store: &'a Store, lock: &'a SessionLock) -> Self {
        Self {
            source,
            store,
            lock,
        }
    }

    /// Run one session.
    ///
    /// `Err` means the session never started (lock held or not writable)
    /// and nothing was recorded. Once the lock is taken the result is always
    /// `Ok`, with a session record persisted for both outcomes.
    pub fn run(&self, plan: &SessionPlan) -> AppResult<SessionOutcome> {
        let started = date::now();
        let session_id = date::session_id_from(&started);

        let guard = self.lock.acquire(&session_id, started)?;
        tracing::info!(session = %session_id, characters = plan.characters.len(), "session started");

        let record = SessionRecord::begin(&session_id, started, &plan.meta);
        let measured = self.measure(&session_id, plan);
        let outcome = self.persist(record, started, measured);

        guard.release();
        Ok(outcome)
    }

    fn measure(&self, session_id: &str, plan: &SessionPlan) -> AppResult<Vec<ResultRow>> {
        let start = self.sample(session_id, plan, Sample::First)?;

        tracing::info!(session = session_id, wait = ?plan.wait, "waiting for second sample");
        thread::sleep(plan.wait);

        let end = self.sample(session_id, plan, Sample::Second)?;

        Ok(plan
            .characters
            .iter()
            .map(|c| ResultRow::reconcile(session_id, &plan.server, c, start.get(c), end.get(c)))
            .collect())
    }

    fn sample(&self, session_id: &str, plan: &SessionPlan, which: Sample) -> AppResult<Snapshot> {
        let html = self.source.fetch()?;
        let snapshot = parse_leaderboard(&html, &plan.section)?;

        for name in plan.characters.iter().filter(|c| !snapshot.contains_key(*c)) {
            tracing::warn!(session = session_id, character = %name, "{}", which.missing_message());
            self.store.record_error(&ErrorEvent::new(
                session_id,
                name,
                date::format_timestamp(&date::now()),
                which.missing_message(),
            ));
        }
        Ok(snapshot)
    }

    fn persist(
        &self,
        mut record: SessionRecord,
        started: DateTime<Local>,
        measured: AppResult<Vec<ResultRow>>,
    ) -> SessionOutcome {
        let persisted = measured.and_then(|rows| {
            for row in &rows {
                self.store.append_result(row)?;
            }
            record.finish(started, date::now());
            self.store.append_session(&record)?;
            Ok(rows)
        });

        match persisted {
            Ok(rows) => {
                tracing::info!(
                    session = %record.session_id,
                    rows = rows.len(),
                    minutes = record.duration_minutes,
                    "session completed"
                );
                SessionOutcome::Completed { record, rows }
            }
            Err(reason) => self.persist_failure(record, started, reason),
        }
    }

    fn persist_failure(
        &self,
        mut record: SessionRecord,
        started: DateTime<Local>,
        reason: AppError,
    ) -> SessionOutcome {
        let ended = date::now();
        record.finish(started, ended);
        record.mark_failed(&reason.to_string());

        tracing::error!(session = %record.session_id, error = %reason, "session failed");
        self.store.record_error(&ErrorEvent::new(
            &record.session_id,
            SESSION_CONTEXT,
            date::format_timestamp(&ended),
            reason.to_string(),
        ));

        if let Err(e) = self.store.append_session(&record) {
            tracing::error!(
                session = %record.session_id,
                error = %e,
                "could not write failed session record"
            );
        }

        SessionOutcome::Failed { record, reason }
    }
}
