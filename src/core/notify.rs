//! Optional webhook notification with the report digest.

use crate::errors::AppResult;
use crate::utils::formatting::truncate_chars;
use reqwest::blocking::Client;
use serde_json::json;
use std::time::Duration;

/// Upper bound for the text field, in characters.
pub const DIGEST_LIMIT: usize = 1900;

pub fn payload(text: &str) -> serde_json::Value {
    json!({ "content": truncate_chars(text, DIGEST_LIMIT) })
}

pub fn send_digest(url: &str, text: &str, timeout: Duration) -> AppResult<()> {
    let http = Client::builder().timeout(timeout).build()?;
    http.post(url).json(&payload(text)).send()?.error_for_status()?;
    Ok(())
}

/// Deliver the digest if an endpoint is configured. Never fails; returns
/// whether the endpoint accepted it.
pub fn notify(url: Option<&str>, text: &str, timeout: Duration) -> bool {
    let Some(url) = url else {
        return false;
    };

    match send_digest(url, text, timeout) {
        Ok(()) => {
            tracing::info!("report digest delivered");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "report digest not delivered");
            false
        }
    }
}
