use crate::utils::date;
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Prefix that marks a failed session inside the `note` column.
pub const FAILURE_MARKER: &str = "FAILED:";

/// Where and how a session is farmed. Supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMeta {
    pub location: String,
    pub stage: u32,
    pub difficulty: String,
    pub party_type: String,
    pub spot: String,
    pub note: String,
}

/// One row of the session log (`runs.csv`).
///
/// Field order is the column order on disk. Aliases accept the column
/// names of the first log layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(alias = "run_id")]
    pub session_id: String,
    pub started_at: String,
    pub ended_at: String,
    #[serde(alias = "dungeon")]
    pub location: String,
    pub stage: u32,
    pub difficulty: String,
    pub party_type: String,
    pub duration_minutes: i64,
    pub note: String,
    // logs written before spots were tracked have no such column
    #[serde(default)]
    pub spot: String,
}

impl SessionRecord {
    /// Provisional record for a session that just started.
    pub fn begin(session_id: &str, started: DateTime<Local>, meta: &SessionMeta) -> Self {
        let started_at = date::format_timestamp(&started);
        Self {
            session_id: session_id.to_string(),
            ended_at: started_at.clone(),
            started_at,
            location: meta.location.clone(),
            stage: meta.stage,
            difficulty: meta.difficulty.clone(),
            party_type: meta.party_type.clone(),
            duration_minutes: 0,
            note: meta.note.clone(),
            spot: meta.spot.clone(),
        }
    }

    /// Finalize end timestamp and elapsed duration.
    pub fn finish(&mut self, started: DateTime<Local>, ended: DateTime<Local>) {
        self.ended_at = date::format_timestamp(&ended);
        self.duration_minutes = (ended - started).num_minutes().max(0);
    }

    /// Embed a failure reason in the note, keeping any user note after it.
    pub fn mark_failed(&mut self, reason: &str) {
        self.note = if self.note.is_empty() {
            format!("{FAILURE_MARKER} {reason}")
        } else {
            format!("{FAILURE_MARKER} {reason} | {}", self.note)
        };
    }

    pub fn is_failure(&self) -> bool {
        self.note.starts_with(FAILURE_MARKER)
    }

    pub fn started_at_parsed(&self) -> Option<NaiveDateTime> {
        date::parse_timestamp(&self.started_at)
    }
}
