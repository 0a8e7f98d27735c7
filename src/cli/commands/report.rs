use crate::cli::parser::Commands;
use crate::config::{Config, Paths};
use crate::core::report;
use crate::errors::AppResult;
use crate::store::Store;
use crate::ui::messages::{info, success};
use crate::utils::date;

/// Write the monthly report and push the digest.
pub fn handle(cmd: &Commands, paths: &Paths, cfg: &Config) -> AppResult<()> {
    let Commands::Report { month, no_notify } = cmd else {
        return Ok(());
    };

    let (year, month) = match month {
        Some(m) => date::parse_month(m)?,
        None => date::previous_month(date::now().date_naive()),
    };

    let store = Store::open(&paths.data_dir())?;
    let artifact = report::generate(&store, paths, cfg, year, month, !*no_notify)?;

    match &artifact.summary {
        Some(s) => success(format!(
            "Report for {} ({} sessions): {}",
            date::month_label(year, month),
            s.session_count,
            artifact.path.display()
        )),
        None => info(format!(
            "No sessions in {}, wrote {}",
            date::month_label(year, month),
            artifact.path.display()
        )),
    }
    if artifact.notified {
        info("Digest sent to webhook");
    }

    Ok(())
}
