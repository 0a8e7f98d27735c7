//! Leaderboard markup → [`Snapshot`].
//!
//! The ranking page lists one card per server: a heading followed by a
//! table. Column positions are fixed by the site layout and live only in
//! [`ColumnLayout`].

use crate::errors::{AppError, AppResult};
use crate::models::{CharacterSnapshot, Snapshot};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static EXP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]*\.?[0-9]+)\s*%\s*$").expect("static experience pattern")
});

/// Zero-indexed cell positions in a leaderboard row.
#[derive(Debug, Clone, Copy)]
pub struct ColumnLayout {
    pub name: usize,
    pub level: usize,
    pub exp: usize,
    pub min_cells: usize,
}

pub const RANKING_LAYOUT: ColumnLayout = ColumnLayout {
    name: 1,
    level: 2,
    exp: 4,
    min_cells: 6,
};

/// Parse the table that follows the first heading containing `section`
/// (case-insensitive).
pub fn parse_leaderboard(html: &str, section: &str) -> AppResult<Snapshot> {
    parse_with_layout(html, section, RANKING_LAYOUT)
}

pub fn parse_with_layout(html: &str, section: &str, layout: ColumnLayout) -> AppResult<Snapshot> {
    let document = Html::parse_document(html);
    let table = find_section_table(&document, section)?
        .ok_or_else(|| AppError::StructureNotFound(section.to_string()))?;

    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let mut snapshot = Snapshot::new();
    for row in table.select(&row_sel) {
        let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
        if let Some(entry) = parse_row(&cells, layout) {
            // later rows win
            snapshot.insert(entry.name.clone(), entry);
        }
    }

    tracing::debug!(section, characters = snapshot.len(), "parsed leaderboard");
    Ok(snapshot)
}

/// One table row, or `None` when it does not describe a character.
pub fn parse_row(cells: &[String], layout: ColumnLayout) -> Option<CharacterSnapshot> {
    if cells.len() < layout.min_cells {
        return None;
    }

    let name = cells.get(layout.name)?.trim();
    if name.is_empty() {
        return None;
    }

    let level: u32 = cells.get(layout.level)?.trim().parse().ok()?;
    let exp_percent = parse_exp_percent(cells.get(layout.exp)?)?;

    Some(CharacterSnapshot::new(name, level, exp_percent))
}

/// `"27.42%"` → 27.42, `".08%"` → 0.08, `"12%"` → 12.0.
pub fn parse_exp_percent(text: &str) -> Option<f64> {
    let caps = EXP_PATTERN.captures(text)?;
    caps.get(1)?.as_str().parse().ok()
}

fn find_section_table<'a>(document: &'a Html, section: &str) -> AppResult<Option<ElementRef<'a>>> {
    let sel = selector("h1, h2, h3, h4, h5, h6, table")?;
    let needle = section.to_lowercase();

    // document order: the first table after the matching heading
    let mut heading_found = false;
    for el in document.select(&sel) {
        let is_table = el.value().name() == "table";
        if heading_found && is_table {
            return Ok(Some(el));
        }
        if !heading_found && !is_table && cell_text(el).to_lowercase().contains(&needle) {
            heading_found = true;
        }
    }
    Ok(None)
}

/// Text content with each text node trimmed, joined without separators.
fn cell_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css).map_err(|e| AppError::Other(format!("invalid selector '{css}': {e}")))
}
