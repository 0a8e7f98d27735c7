//! Markdown report and plain-text digest rendering.

use super::aggregate::{GroupMean, MonthlySummary};
use crate::utils::date::month_label;
use crate::utils::formatting::fmt_percent;

pub const NO_DATA: &str = "_No sessions recorded in this month._";
const EMPTY_TABLE: &str = "_No data._";

pub fn title(server: &str, year: i32, month: u32) -> String {
    format!("{server} EXP monthly report {}", month_label(year, month))
}

/// Minimal document for a month without sessions.
pub fn render_no_data(server: &str, year: i32, month: u32) -> String {
    format!("# {}\n\n{NO_DATA}\n", title(server, year, month))
}

pub fn render_markdown(server: &str, summary: &MonthlySummary) -> String {
    let mut md: Vec<String> = Vec::new();
    md.push(format!("# {}", title(server, summary.year, summary.month)));
    md.push(String::new());
    md.push(format!("Sessions: {}", summary.session_count));
    md.push(String::new());
    md.push("**Highlights**".to_string());
    md.push(String::new());
    md.extend(highlights(summary).into_iter().map(|h| format!("- {h}")));
    md.push(String::new());

    table(
        &mut md,
        "Spot averages",
        &["spot", "difficulty", "party_type", "avg_gain", "samples"],
        summary.spot_avg.iter().map(|g| {
            let (spot, difficulty, party) = &g.key;
            vec![
                spot.clone(),
                difficulty.clone(),
                party.clone(),
                fmt_percent(g.mean),
                g.samples.to_string(),
            ]
        }),
    );

    table(
        &mut md,
        "Dungeon averages",
        &["dungeon", "difficulty", "avg_gain", "samples"],
        summary.dungeon_avg.iter().map(|g| {
            let (dungeon, difficulty) = &g.key;
            vec![
                dungeon.clone(),
                difficulty.clone(),
                fmt_percent(g.mean),
                g.samples.to_string(),
            ]
        }),
    );

    table(
        &mut md,
        "Top characters",
        &["character", "avg_gain", "samples"],
        summary.character_avg.iter().map(|g| {
            vec![g.key.clone(), fmt_percent(g.mean), g.samples.to_string()]
        }),
    );

    table(
        &mut md,
        "Top 10 sessions",
        &[
            "session_id",
            "character",
            "dungeon",
            "stage",
            "difficulty",
            "spot",
            "party_type",
            "gain",
            "started_at",
            "ended_at",
        ],
        summary.top_sessions.iter().map(|t| {
            vec![
                t.session_id.clone(),
                t.character.clone(),
                t.location.clone(),
                t.stage.to_string(),
                t.difficulty.clone(),
                t.spot.clone(),
                t.party_type.clone(),
                fmt_percent(t.gain),
                t.started_at.clone(),
                t.ended_at.clone(),
            ]
        }),
    );

    md.join("\n")
}

/// Short plain-text version for the notification endpoint (not truncated).
pub fn render_digest(server: &str, year: i32, month: u32, summary: Option<&MonthlySummary>) -> String {
    let mut lines = vec![title(server, year, month)];

    let Some(summary) = summary else {
        lines.push("No sessions recorded in this month.".to_string());
        return lines.join("\n");
    };

    lines.push(format!("Sessions: {}", summary.session_count));
    lines.extend(highlights(summary).into_iter().map(|h| h.replace("**", "")));

    if !summary.top_sessions.is_empty() {
        lines.push("Top sessions:".to_string());
        for (i, t) in summary.top_sessions.iter().enumerate() {
            lines.push(format!(
                "{}. {} {} ({} {} / {})",
                i + 1,
                t.character,
                fmt_percent(t.gain),
                t.location,
                t.difficulty,
                t.spot
            ));
        }
    }
    lines.join("\n")
}

fn highlights(summary: &MonthlySummary) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(best) = summary.character_avg.first() {
        out.push(format!(
            "Best character avg gain: **{}** with **{}**",
            best.key,
            fmt_percent(best.mean)
        ));
    }
    if let Some(GroupMean { key, mean, .. }) = summary.spot_avg.first() {
        out.push(format!(
            "Best spot avg gain: **{}** ({}, {}) with **{}**",
            key.0,
            key.1,
            key.2,
            fmt_percent(*mean)
        ));
    }
    if let Some(GroupMean { key, mean, .. }) = summary.dungeon_avg.first() {
        out.push(format!(
            "Best dungeon avg gain: **{}** ({}) with **{}**",
            key.0,
            key.1,
            fmt_percent(*mean)
        ));
    }
    if out.is_empty() {
        out.push("No sessions with a measured gain.".to_string());
    }
    out
}

fn table<I>(md: &mut Vec<String>, header: &str, cols: &[&str], rows: I)
where
    I: Iterator<Item = Vec<String>>,
{
    md.push(format!("## {header}"));
    md.push(String::new());

    let rows: Vec<Vec<String>> = rows.collect();
    if rows.is_empty() {
        md.push(EMPTY_TABLE.to_string());
        md.push(String::new());
        return;
    }

    md.push(format!("| {} |", cols.join(" | ")));
    md.push(format!("|{}", "---|".repeat(cols.len())));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
        md.push(format!("| {} |", cells.join(" | ")));
    }
    md.push(String::new());
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
