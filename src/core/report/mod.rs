//! Monthly report: aggregate the logs for one month, write the Markdown
//! file and optionally push a digest.

pub mod aggregate;
pub mod render;

pub use aggregate::{GroupMean, MonthlySummary, TopEntry, summarize};

use crate::config::{Config, Paths};
use crate::core::notify;
use crate::errors::AppResult;
use crate::store::Store;
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub markdown: String,
    pub summary: Option<MonthlySummary>,
    pub notified: bool,
}

/// Build and write the report for `year`/`month`.
///
/// The digest is pushed only when `notify_enabled` is set and a webhook is
/// configured; delivery failures do not fail the report.
pub fn generate(
    store: &Store,
    paths: &Paths,
    cfg: &Config,
    year: i32,
    month: u32,
    notify_enabled: bool,
) -> AppResult<ReportArtifact> {
    let sessions = store.load_sessions()?;
    let results = store.load_results()?;
    let server = cfg.server_heading.as_str();

    let summary = summarize(&sessions, &results, year, month);
    let markdown = match &summary {
        Some(s) => render::render_markdown(server, s),
        None => render::render_no_data(server, year, month),
    };

    let path = paths.report_file(year, month);
    fs::create_dir_all(paths.reports_dir())?;
    fs::write(&path, &markdown)?;
    tracing::info!(
        report = %path.display(),
        sessions = summary.as_ref().map_or(0, |s| s.session_count),
        "report written"
    );

    let notified = if notify_enabled {
        let digest = render::render_digest(server, year, month, summary.as_ref());
        notify::notify(cfg.webhook_url.as_deref(), &digest, cfg.timeout())
    } else {
        false
    };

    Ok(ReportArtifact {
        path,
        markdown,
        summary,
        notified,
    })
}
