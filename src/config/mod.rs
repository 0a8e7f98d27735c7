use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod catalog;
pub mod characters;

/// Environment variable that overrides `webhook_url`.
pub const WEBHOOK_ENV: &str = "EXPTRACKER_WEBHOOK_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_ranking_url")]
    pub ranking_url: String,
    /// Heading label of the leaderboard section to track. Also written as
    /// the `server` column of every result row.
    #[serde(default = "default_server_heading")]
    pub server_heading: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: u64,
    #[serde(default = "default_wait_seconds")]
    pub wait_seconds: u64,
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: i64,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

fn default_ranking_url() -> String {
    "https://pr-underworld.com/website/ranking/".to_string()
}
fn default_server_heading() -> String {
    "Netherworld".to_string()
}
fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (exptracker/{}; leaderboard sampler)",
        env!("CARGO_PKG_VERSION")
    )
}
fn default_timeout_secs() -> u64 {
    45
}
fn default_max_attempts() -> u32 {
    3
}
fn default_backoff_base_secs() -> u64 {
    3
}
fn default_wait_seconds() -> u64 {
    3600
}
fn default_lock_stale_minutes() -> i64 {
    90
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ranking_url: default_ranking_url(),
            server_heading: default_server_heading(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            backoff_base_secs: default_backoff_base_secs(),
            wait_seconds: default_wait_seconds(),
            lock_stale_minutes: default_lock_stale_minutes(),
            webhook_url: None,
        }
    }
}

impl Config {
    /// Load configuration from the project's config file, or return
    /// defaults if not found. The webhook environment variable wins over
    /// the file.
    pub fn load(paths: &Paths) -> AppResult<Self> {
        let path = paths.config_file();

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Config::default()
            } else {
                serde_yaml::from_str(&content).map_err(|e| {
                    AppError::Config(format!("cannot parse {}: {e}", path.display()))
                })?
            }
        } else {
            Config::default()
        };

        if let Ok(url) = env::var(WEBHOOK_ENV)
            && !url.trim().is_empty()
        {
            cfg.webhook_url = Some(url.trim().to_string());
        }

        Ok(cfg)
    }

    pub fn save(&self, paths: &Paths) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::create_dir_all(paths.config_dir())?;
        fs::write(paths.config_file(), yaml)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_secs(self.backoff_base_secs)
    }

    pub fn lock_stale_after(&self) -> AppResult<chrono::Duration> {
        chrono::Duration::try_minutes(self.lock_stale_minutes).ok_or_else(|| {
            AppError::Config(format!(
                "lock_stale_minutes out of range: {}",
                self.lock_stale_minutes
            ))
        })
    }
}

/// File layout under the project root:
///
/// ```text
/// <root>/config/exptracker.yaml
/// <root>/config/characters.txt
/// <root>/config/dungeons.json
/// <root>/data/{runs,results_per_char,errors}.csv
/// <root>/data/.lock_active
/// <root>/reports/report_YYYY-MM.md
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir().join("exptracker.yaml")
    }

    pub fn characters_file(&self) -> PathBuf {
        self.config_dir().join("characters.txt")
    }

    pub fn catalog_file(&self) -> PathBuf {
        self.config_dir().join("dungeons.json")
    }

    pub fn lock_file(&self) -> PathBuf {
        self.data_dir().join(".lock_active")
    }

    pub fn report_file(&self, year: i32, month: u32) -> PathBuf {
        self.reports_dir()
            .join(format!("report_{year}-{month:02}.md"))
    }
}
