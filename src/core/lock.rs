//! Cross-process session lock.
//!
//! The lock is a marker file in the data directory holding the owning
//! session id and its acquisition time. A marker older than the staleness
//! threshold is considered abandoned and is overwritten.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockMarker {
    pub session_id: String,
    pub acquired_at: DateTime<FixedOffset>,
}

/// What is currently on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockState {
    Free,
    Held { marker: LockMarker, age: Duration },
    Stale { marker: Option<LockMarker> },
}

#[derive(Debug, Clone)]
pub struct SessionLock {
    path: PathBuf,
    stale_after: Duration,
}

impl SessionLock {
    pub fn new(path: impl Into<PathBuf>, stale_after: Duration) -> Self {
        Self {
            path: path.into(),
            stale_after,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inspect the marker relative to `now`. Unreadable content is stale.
    pub fn inspect(&self, now: DateTime<Local>) -> AppResult<LockState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LockState::Free),
            Err(e) => return Err(e.into()),
        };

        let Ok(marker) = serde_json::from_str::<LockMarker>(&content) else {
            return Ok(LockState::Stale { marker: None });
        };

        let age = now.fixed_offset() - marker.acquired_at;
        if age < self.stale_after {
            Ok(LockState::Held { marker, age })
        } else {
            Ok(LockState::Stale {
                marker: Some(marker),
            })
        }
    }

    /// Take the lock for `session_id`, or fail with `AlreadyRunning` while a
    /// fresh marker exists. Nothing is written in that case.
    pub fn acquire(&self, session_id: &str, now: DateTime<Local>) -> AppResult<LockGuard> {
        match self.inspect(now)? {
            LockState::Held { marker, age } => {
                return Err(AppError::AlreadyRunning {
                    session_id: marker.session_id,
                    age_minutes: age.num_minutes(),
                });
            }
            LockState::Stale { marker } => {
                tracing::warn!(
                    previous = marker.as_ref().map(|m| m.session_id.as_str()).unwrap_or("?"),
                    "overwriting abandoned session lock"
                );
            }
            LockState::Free => {}
        }

        let marker = LockMarker {
            session_id: session_id.to_string(),
            acquired_at: now.fixed_offset(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(&marker)?)?;
        tracing::info!(session = session_id, lock = %self.path.display(), "lock acquired");

        Ok(LockGuard {
            path: self.path.clone(),
            session_id: session_id.to_string(),
            released: false,
        })
    }
}

/// Held lock. Released explicitly through [`LockGuard::release`] or, failing
/// that, when dropped. Removal errors are logged and swallowed.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
    session_id: String,
    released: bool,
}

impl LockGuard {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::info!(session = %self.session_id, "lock released"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                session = %self.session_id,
                error = %e,
                "could not remove lock marker"
            ),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.remove();
    }
}
