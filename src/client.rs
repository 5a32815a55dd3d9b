use std::sync::Arc;

use crate::config::{validator, ClientConfig};
use crate::error::Result;
use crate::fetch::Transport;

/// Handle for the market-data service.
///
/// Cloning is cheap: clones share the HTTP connection pool and configuration.
/// Single-symbol fetchers live in [`crate::fetch`]; batch and mixed-asset
/// calls in [`crate::services`].
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    config: Arc<ClientConfig>,
    transport: Transport,
}

impl MarketDataClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        validator::validate_client_config(&config)?;
        let transport = Transport::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    /// Client configured from `MARKETDATA_TOKEN` / `MARKETDATA_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// A client identical to this one but authenticating with `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Result<Self> {
        Self::new(self.config.as_ref().clone().with_token(token))
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_configuration() {
        let err = MarketDataClient::new(ClientConfig::new("")).expect_err("empty token");
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn token_override_keeps_other_settings() {
        let client = MarketDataClient::new(
            ClientConfig::new("first")
                .with_base_url("http://127.0.0.1:1")
                .with_pool_size(2),
        )
        .unwrap();

        let other = client.with_token("second").unwrap();
        assert_eq!(other.config().token(), "second");
        assert_eq!(other.config().base_url, "http://127.0.0.1:1");
        assert_eq!(other.config().pool_size, 2);
        assert_eq!(client.config().token(), "first");
    }
}
