use crate::config::{Config, Paths};
use crate::core::lock::{LockState, SessionLock};
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};
use crate::utils::date;

pub fn handle(paths: &Paths, cfg: &Config) -> AppResult<()> {
    let lock = SessionLock::new(paths.lock_file(), cfg.lock_stale_after()?);

    match lock.inspect(date::now())? {
        LockState::Free => info("No session running"),
        LockState::Held { marker, age } => info(format!(
            "Session {} running for {} min",
            marker.session_id,
            age.num_minutes()
        )),
        LockState::Stale { marker } => warning(format!(
            "Abandoned lock from {} (will be overwritten by the next session)",
            marker.map(|m| m.session_id).unwrap_or_else(|| "unknown session".into())
        )),
    }
    Ok(())
}
