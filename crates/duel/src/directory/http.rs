//! HTTP fighter directory: fetches fighters from a remote directory service.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. A fighter is read from
//! `{base_url}/fighters/{id}`.

use super::{DirectoryError, FighterDirectory};
use arena_core::Fighter;
use async_trait::async_trait;
use std::time::Duration;

/// Directory client for a remote `GET /fighters/{id}` endpoint.
#[derive(Debug, Clone)]
pub struct HttpFighterDirectory {
    base_url: String,
}

impl HttpFighterDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpFighterDirectory {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL for one fighter. The id is percent-encoded as a path segment.
    pub fn fighter_url(&self, id: &str) -> String {
        format!("{}/fighters/{}", self.base_url, encode_segment(id))
    }
}

#[async_trait]
impl FighterDirectory for HttpFighterDirectory {
    async fn fetch_fighter(&self, id: &str, timeout: Duration) -> Result<Fighter, DirectoryError> {
        let url = self.fighter_url(id);
        let id = id.to_string();

        tokio::task::spawn_blocking(move || fetch_blocking(&url, &id, timeout))
            .await
            .map_err(|e| DirectoryError::Unavailable(format!("task join error: {}", e)))?
    }
}

fn fetch_blocking(url: &str, id: &str, timeout: Duration) -> Result<Fighter, DirectoryError> {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    let response = agent
        .get(url)
        .header("Accept", "application/json")
        .call()
        .map_err(|e| match e {
            ureq::Error::StatusCode(404) => DirectoryError::NotFound { id: id.to_string() },
            other => transport_error(other, timeout),
        })?;

    let body = response
        .into_body()
        .read_to_string()
        .map_err(|e| transport_error(e, timeout))?;

    serde_json::from_str(&body).map_err(|e| DirectoryError::Malformed(e.to_string()))
}

fn transport_error(e: ureq::Error, timeout: Duration) -> DirectoryError {
    match e {
        ureq::Error::Timeout(_) => DirectoryError::Timeout(timeout),
        other => DirectoryError::Unavailable(other.to_string()),
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
