//! Leaderboard retrieval with bounded linear backoff.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::thread;
use std::time::Duration;

/// Anything that can produce the raw leaderboard document.
pub trait LeaderboardSource {
    fn fetch(&self) -> AppResult<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Run `op` until it succeeds or `policy.max_attempts` is reached.
///
/// `sleep` is called between attempts only, never after the last one. The
/// last error is returned unchanged.
pub fn retry_with_backoff<T, F, S>(policy: &RetryPolicy, mut op: F, mut sleep: S) -> AppResult<T>
where
    F: FnMut(u32) -> AppResult<T>,
    S: FnMut(Duration),
{
    let max = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(e) if attempt >= max => return Err(e),
            Err(e) => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(attempt, max, ?delay, error = %e, "fetch failed, retrying");
                sleep(delay);
                attempt += 1;
            }
        }
    }
}

pub struct HttpFetcher {
    url: String,
    policy: RetryPolicy,
    http: Client,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("url", &self.url)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl HttpFetcher {
    pub fn new(
        url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(user_agent)
            .map_err(|e| AppError::Config(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            url: url.into(),
            policy,
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let policy = RetryPolicy {
            max_attempts: cfg.max_attempts,
            base_delay: cfg.backoff_base(),
        };
        // the longest wait must be representable
        if policy
            .base_delay
            .checked_mul(policy.max_attempts.max(1))
            .is_none()
        {
            return Err(AppError::Config(format!(
                "backoff_base_secs out of range: {}",
                cfg.backoff_base_secs
            )));
        }
        Self::new(&cfg.ranking_url, &cfg.user_agent, cfg.timeout(), policy)
    }

    fn get_once(&self) -> AppResult<String> {
        let resp = self.http.get(&self.url).send()?.error_for_status()?;
        Ok(resp.text()?)
    }
}

impl LeaderboardSource for HttpFetcher {
    fn fetch(&self) -> AppResult<String> {
        let attempts = self.policy.max_attempts.max(1);
        retry_with_backoff(
            &self.policy,
            |attempt| {
                tracing::debug!(url = %self.url, attempt, "fetching leaderboard");
                self.get_once()
            },
            thread::sleep,
        )
        .map_err(|e| AppError::NetworkExhausted {
            attempts,
            reason: e.to_string(),
        })
    }
}
