use crate::cli::parser::Commands;
use crate::config::catalog::validate_location;
use crate::config::characters::read_characters;
use crate::config::{Config, Paths};
use crate::core::fetcher::HttpFetcher;
use crate::core::lock::SessionLock;
use crate::core::session::{SessionOutcome, SessionPlan, SessionRunner};
use crate::errors::AppResult;
use crate::models::session_record::SessionMeta;
use crate::store::Store;
use crate::ui::messages::{info, success, warning};
use std::time::Duration;

/// Run one tracking session.
///
/// Validation, the character list and the lock are all checked before any
/// record is written. A failed session is recorded and then returned as an
/// error so the process exits non-zero.
pub fn handle(cmd: &Commands, paths: &Paths, cfg: &Config) -> AppResult<()> {
    let Commands::Track {
        location,
        stage,
        difficulty,
        party_type,
        spot,
        note,
        wait_seconds,
    } = cmd
    else {
        return Ok(());
    };

    validate_location(&paths.catalog_file(), location, *stage, difficulty)?;
    let characters = read_characters(&paths.characters_file())?;

    let store = Store::open(&paths.data_dir())?;
    let lock = SessionLock::new(paths.lock_file(), cfg.lock_stale_after()?);
    let fetcher = HttpFetcher::from_config(cfg)?;

    let plan = SessionPlan {
        characters,
        section: cfg.server_heading.clone(),
        server: cfg.server_heading.clone(),
        meta: SessionMeta {
            location: location.clone(),
            stage: *stage,
            difficulty: difficulty.clone(),
            party_type: party_type.clone(),
            spot: spot.clone(),
            note: note.clone(),
        },
        wait: Duration::from_secs(wait_seconds.unwrap_or(cfg.wait_seconds)),
    };

    info(format!(
        "Tracking {} characters on {} ({}s between samples)",
        plan.characters.len(),
        plan.server,
        plan.wait.as_secs()
    ));

    match SessionRunner::new(&fetcher, &store, &lock).run(&plan)? {
        SessionOutcome::Completed { record, rows } => {
            let measured = rows.iter().filter(|r| r.gain_percent.is_some()).count();
            if measured < rows.len() {
                warning(format!(
                    "{} characters were missing from a sample, see {}",
                    rows.len() - measured,
                    paths.data_dir().join(crate::store::ERRORS_FILE).display()
                ));
            }
            success(format!(
                "Session {} completed: {} rows saved, {} with a gain",
                record.session_id,
                rows.len(),
                measured
            ));
            Ok(())
        }
        SessionOutcome::Failed { record, reason } => {
            warning(format!("Session {} recorded as failed", record.session_id));
            Err(reason)
        }
    }
}
