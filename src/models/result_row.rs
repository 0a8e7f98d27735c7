use crate::models::CharacterSnapshot;
use crate::utils::formatting::fmt_decimal;
use serde::Deserialize;

/// Column order of the result log.
pub const RESULT_HEADERS: [&str; 8] = [
    "session_id",
    "server",
    "character",
    "level_start",
    "exp_start_percent",
    "level_end",
    "exp_end_percent",
    "gain_exp_percent",
];

/// Per-character outcome of one session.
///
/// Start/end fields are `None` when the character was missing from the
/// matching sample; `gain_percent` is present only when both are present.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub session_id: String,
    pub server: String,
    pub character: String,
    pub level_start: Option<u32>,
    pub exp_start_percent: Option<f64>,
    pub level_end: Option<u32>,
    pub exp_end_percent: Option<f64>,
    pub gain_percent: Option<f64>,
}

impl ResultRow {
    pub fn reconcile(
        session_id: &str,
        server: &str,
        character: &str,
        start: Option<&CharacterSnapshot>,
        end: Option<&CharacterSnapshot>,
    ) -> Self {
        let gain_percent = match (start, end) {
            (Some(s), Some(e)) => Some(e.exp_percent - s.exp_percent),
            _ => None,
        };

        Self {
            session_id: session_id.to_string(),
            server: server.to_string(),
            character: character.to_string(),
            level_start: start.map(|s| s.level),
            exp_start_percent: start.map(|s| s.exp_percent),
            level_end: end.map(|e| e.level),
            exp_end_percent: end.map(|e| e.exp_percent),
            gain_percent,
        }
    }

    /// Render as CSV fields; absent values become empty cells.
    pub fn to_fields(&self) -> [String; 8] {
        [
            self.session_id.clone(),
            self.server.clone(),
            self.character.clone(),
            opt_int(self.level_start),
            opt_dec(self.exp_start_percent),
            opt_int(self.level_end),
            opt_dec(self.exp_end_percent),
            opt_dec(self.gain_percent),
        ]
    }
}

fn opt_int(v: Option<u32>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn opt_dec(v: Option<f64>) -> String {
    v.map(fmt_decimal).unwrap_or_default()
}

/// Raw on-disk shape. Numeric cells that do not parse are read as absent.
#[derive(Debug, Deserialize)]
pub(crate) struct RawResultRow {
    #[serde(alias = "run_id")]
    session_id: String,
    #[serde(default)]
    server: String,
    character: String,
    level_start: Option<String>,
    exp_start_percent: Option<String>,
    level_end: Option<String>,
    exp_end_percent: Option<String>,
    gain_exp_percent: Option<String>,
}

impl From<RawResultRow> for ResultRow {
    fn from(raw: RawResultRow) -> Self {
        Self {
            session_id: raw.session_id,
            server: raw.server,
            character: raw.character,
            level_start: parse_cell(raw.level_start.as_deref()),
            exp_start_percent: parse_percent(raw.exp_start_percent.as_deref()),
            level_end: parse_cell(raw.level_end.as_deref()),
            exp_end_percent: parse_percent(raw.exp_end_percent.as_deref()),
            gain_percent: parse_percent(raw.gain_exp_percent.as_deref()),
        }
    }
}

fn parse_cell<T: std::str::FromStr>(cell: Option<&str>) -> Option<T> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

// `NaN` and `inf` parse as f64 but are not measurements
fn parse_percent(cell: Option<&str>) -> Option<f64> {
    parse_cell::<f64>(cell).filter(|v| v.is_finite())
}
