//! Monthly aggregation over the session and result logs.

use crate::models::{ResultRow, SessionRecord};
use chrono::Datelike;
use std::collections::HashMap;
use std::hash::Hash;

pub const TOP_SESSIONS: usize = 10;

pub type SpotKey = (String, String, String);
pub type DungeonKey = (String, String);

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean<K> {
    pub key: K,
    pub mean: f64,
    pub samples: usize,
}

/// One result row joined with its session, used for the top-sessions table.
#[derive(Debug, Clone, PartialEq)]
pub struct TopEntry {
    pub session_id: String,
    pub character: String,
    pub location: String,
    pub stage: u32,
    pub difficulty: String,
    pub spot: String,
    pub party_type: String,
    pub gain: f64,
    pub started_at: String,
    pub ended_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub session_count: usize,
    /// Mean gain per (spot, difficulty, party type).
    pub spot_avg: Vec<GroupMean<SpotKey>>,
    /// Mean gain per (location, difficulty).
    pub dungeon_avg: Vec<GroupMean<DungeonKey>>,
    pub character_avg: Vec<GroupMean<String>>,
    pub top_sessions: Vec<TopEntry>,
}

/// Sessions whose start falls in the given month. Unparseable start
/// timestamps never match.
pub fn sessions_in_month(sessions: &[SessionRecord], year: i32, month: u32) -> Vec<&SessionRecord> {
    sessions
        .iter()
        .filter(|s| {
            s.started_at_parsed()
                .is_some_and(|dt| dt.year() == year && dt.month() == month)
        })
        .collect()
}

/// Aggregate one month, or `None` when it has no sessions at all.
///
/// Result rows are inner-joined to sessions by id; rows without a gain are
/// ignored. Every list is sorted by value, descending, ties kept in log
/// order.
pub fn summarize(
    sessions: &[SessionRecord],
    results: &[ResultRow],
    year: i32,
    month: u32,
) -> Option<MonthlySummary> {
    let in_month = sessions_in_month(sessions, year, month);
    if in_month.is_empty() {
        return None;
    }

    let mut by_id: HashMap<&str, &SessionRecord> = HashMap::new();
    for s in &in_month {
        by_id.entry(s.session_id.as_str()).or_insert(*s);
    }

    let joined: Vec<Joined<'_>> = results
        .iter()
        .filter_map(|result| {
            let gain = result.gain_percent?;
            let session = *by_id.get(result.session_id.as_str())?;
            Some(Joined {
                session,
                result,
                gain,
            })
        })
        .collect();

    let spot_avg = group_mean(&joined, |j| {
        (
            j.session.spot.clone(),
            j.session.difficulty.clone(),
            j.session.party_type.clone(),
        )
    });
    let dungeon_avg = group_mean(&joined, |j| {
        (j.session.location.clone(), j.session.difficulty.clone())
    });
    let character_avg = group_mean(&joined, |j| j.result.character.clone());

    let mut ranked: Vec<&Joined<'_>> = joined.iter().collect();
    ranked.sort_by(|a, b| b.gain.total_cmp(&a.gain));
    let top_sessions = ranked
        .into_iter()
        .take(TOP_SESSIONS)
        .map(Joined::top_entry)
        .collect();

    Some(MonthlySummary {
        year,
        month,
        session_count: in_month.len(),
        spot_avg,
        dungeon_avg,
        character_avg,
        top_sessions,
    })
}

struct Joined<'a> {
    session: &'a SessionRecord,
    result: &'a ResultRow,
    gain: f64,
}

impl Joined<'_> {
    fn top_entry(&self) -> TopEntry {
        let s = self.session;
        TopEntry {
            session_id: s.session_id.clone(),
            character: self.result.character.clone(),
            location: s.location.clone(),
            stage: s.stage,
            difficulty: s.difficulty.clone(),
            spot: s.spot.clone(),
            party_type: s.party_type.clone(),
            gain: self.gain,
            started_at: s.started_at.clone(),
            ended_at: s.ended_at.clone(),
        }
    }
}

/// Mean gain per key, groups in first-seen order, then sorted descending.
fn group_mean<K, F>(rows: &[Joined<'_>], key: F) -> Vec<GroupMean<K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&Joined<'_>) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut sums: Vec<(K, f64, usize)> = Vec::new();

    for row in rows {
        let k = key(row);
        match index.get(&k) {
            Some(&i) => {
                sums[i].1 += row.gain;
                sums[i].2 += 1;
            }
            None => {
                index.insert(k.clone(), sums.len());
                sums.push((k, row.gain, 1));
            }
        }
    }

    let mut out: Vec<GroupMean<K>> = sums
        .into_iter()
        .map(|(key, total, samples)| GroupMean {
            key,
            mean: total / samples as f64,
            samples,
        })
        .collect();
    out.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    out
}
