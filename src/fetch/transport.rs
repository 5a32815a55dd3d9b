use std::fmt;
use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use tokio::time::sleep;

use crate::config::ClientConfig;
use crate::error::{Context, Result};

/// Longest slice of an error body kept in a failure reason.
const MAX_REASON_BODY: usize = 512;

/// Status and body of a response that made it through the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Every attempt failed at the HTTP layer; this stands in for a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub attempts: u32,
    pub reason: String,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gave up after {} attempt(s): {}", self.attempts, self.reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first one included.
    pub max_retries: u32,
    /// Fixed pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

/// HTTP client plus the headers and retry policy every request shares.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    headers: HeaderMap,
    policy: RetryPolicy,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to construct HTTP client")?;

        Ok(Self {
            client,
            headers: build_headers(config)?,
            policy: RetryPolicy {
                max_retries: config.max_retries,
                backoff: config.backoff,
            },
        })
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<RawResponse, TransportFailure> {
        fetch_url(&self.client, url, query, &self.headers, self.policy).await
    }
}

fn build_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut bearer = HeaderValue::from_str(&config.bearer())?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// GET `url`, retrying connection errors, timeouts and 4xx/5xx answers.
///
/// The first attempt that gets through is returned whatever its 2xx/3xx status;
/// judging it is up to the caller. The pause only happens between attempts,
/// so the worst case waits `(max_retries - 1) * backoff`.
pub async fn fetch_url(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
    headers: &HeaderMap,
    policy: RetryPolicy,
) -> std::result::Result<RawResponse, TransportFailure> {
    let max_attempts = policy.max_retries.max(1);
    let mut attempts = 0;
    let mut last_error = String::new();

    while attempts < max_attempts {
        attempts += 1;
        match send_once(client, url, query, headers).await {
            Ok(response) => return Ok(response),
            Err(reason) => {
                debug!("GET {url} attempt {attempts}/{max_attempts} failed: {reason}");
                last_error = reason;
                if attempts < max_attempts {
                    sleep(policy.backoff).await;
                }
            }
        }
    }

    Err(TransportFailure {
        attempts,
        reason: last_error,
    })
}

async fn send_once(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
    headers: &HeaderMap,
) -> std::result::Result<RawResponse, String> {
    let response = client
        .get(url)
        .headers(headers.clone())
        .query(query)
        .send()
        .await
        .map_err(|err| err.to_string())?;

    let status = response.status();
    let body = response.text().await.map_err(|err| err.to_string())?;

    if status.is_client_error() || status.is_server_error() {
        let mut snippet = body;
        if snippet.len() > MAX_REASON_BODY {
            let mut cut = MAX_REASON_BODY;
            while !snippet.is_char_boundary(cut) {
                cut -= 1;
            }
            snippet.truncate(cut);
        }
        return Err(format!("HTTP {status}: {snippet}"));
    }

    Ok(RawResponse {
        status: status.as_u16(),
        body,
    })
}
