//! Unified application error type.
//! All modules (config, core, store, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Network
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Leaderboard unreachable after {attempts} attempts: {reason}")]
    NetworkExhausted { attempts: u32, reason: String },

    // ---------------------------
    // Configuration (pre-session)
    // ---------------------------
    #[error("Configuration file missing: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("Configuration file contains no entries: {}", .0.display())]
    ConfigEmpty(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid session parameters: {0}")]
    Validation(String),

    // ---------------------------
    // Session
    // ---------------------------
    #[error("A tracking session is already running ({session_id}, started {age_minutes} min ago)")]
    AlreadyRunning {
        session_id: String,
        age_minutes: i64,
    },

    #[error("Leaderboard section '{0}' or its table was not found")]
    StructureNotFound(String),

    // ---------------------------
    // Reporting
    // ---------------------------
    #[error("Invalid month: {0} (expected YYYY-MM)")]
    InvalidMonth(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Process exit code for this error: 1 when another session holds the
    /// lock, 2 for every other failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::AlreadyRunning { .. } => 1,
            _ => 2,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
