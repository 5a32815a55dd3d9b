use std::fmt::{self, Debug};
use std::time::Duration;

use serde::Deserialize;

pub mod loader;
pub mod validator;

pub const DEFAULT_BASE_URL: &str = "https://api.marketdata.app";
pub const TOKEN_ENV: &str = "MARKETDATA_TOKEN";
pub const BASE_URL_ENV: &str = "MARKETDATA_BASE_URL";

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(2);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on the default worker pool.
const MAX_DEFAULT_POOL_SIZE: usize = 32;

/// How a mixed symbol list is split into equities and options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolMode {
    /// Anything longer than 13 characters is an option.
    #[default]
    Length,
    /// Only identifiers that parse as OCC option symbols are options.
    Strict,
}

/// Everything a [`crate::MarketDataClient`] needs to talk to the service.
///
/// The bearer token lives here rather than in process-wide state, so two
/// clients with different credentials can run side by side.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    token: String,
    pub max_retries: u32,
    pub backoff: Duration,
    pub timeout: Duration,
    pub pool_size: usize,
    pub symbol_mode: SymbolMode,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into().trim().to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: DEFAULT_BACKOFF,
            timeout: DEFAULT_TIMEOUT,
            pool_size: default_pool_size(),
            symbol_mode: SymbolMode::default(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into().trim().to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_symbol_mode(mut self, symbol_mode: SymbolMode) -> Self {
        self.symbol_mode = symbol_mode;
        self
    }

    /// Join an endpoint path onto the configured base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .field("timeout", &self.timeout)
            .field("pool_size", &self.pool_size)
            .field("symbol_mode", &self.symbol_mode)
            .finish()
    }
}

/// Default fan-out width: available parallelism plus four, capped at 32.
pub fn default_pool_size() -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    (cpus + 4).min(MAX_DEFAULT_POOL_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_conventions() {
        let config = ClientConfig::new("  abc123\n");

        assert_eq!(config.token(), "abc123");
        assert_eq!(config.bearer(), "Bearer abc123");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.backoff, Duration::from_secs(2));
        assert_eq!(config.symbol_mode, SymbolMode::Length);
        assert!(config.pool_size >= 5 && config.pool_size <= 32);
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ClientConfig::new("t").with_base_url("http://127.0.0.1:9000/");
        assert_eq!(
            config.endpoint("/v1/stocks/quotes/AAPL"),
            "http://127.0.0.1:9000/v1/stocks/quotes/AAPL"
        );
    }

    #[test]
    fn debug_output_hides_token() {
        let config = ClientConfig::new("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
