use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

/// Storage format for timestamps in every log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now() -> DateTime<Local> {
    Local::now()
}

pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Session ids are derived from the start instant, e.g. `R20250914_201500`.
pub fn session_id_from(ts: &DateTime<Local>) -> String {
    ts.format("R%Y%m%d_%H%M%S").to_string()
}

/// Parse a logged timestamp.
///
/// Accepts the current format, minute precision, the older
/// `YYYY-MM-DD HH Uhr MM` format and RFC 3339.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let legacy = s.replace(" Uhr ", ":");
    for fmt in [TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&legacy, fmt) {
            return Some(dt);
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Parse `YYYY-MM` into (year, month).
pub fn parse_month(s: &str) -> AppResult<(i32, u32)> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map(|d| (d.year(), d.month()))
        .map_err(|_| AppError::InvalidMonth(s.to_string()))
}

/// Calendar month before the one containing `today`.
pub fn previous_month(today: NaiveDate) -> (i32, u32) {
    if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    }
}

pub fn month_label(year: i32, month: u32) -> String {
    format!("{year}-{month:02}")
}
