use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::error::{AppError, Context, Result};

use super::{validator, ClientConfig, SymbolMode, BASE_URL_ENV, TOKEN_ENV};

/// On-disk shape of a JSON client configuration. Every field is optional;
/// omitted settings fall back to the [`ClientConfig`] defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClientConfig {
    token: Option<String>,
    token_file: Option<PathBuf>,
    base_url: Option<String>,
    max_retries: Option<u32>,
    backoff_seconds: Option<f64>,
    timeout_seconds: Option<f64>,
    pool_size: Option<usize>,
    symbol_mode: Option<SymbolMode>,
}

impl ClientConfig {
    /// Build a configuration from `MARKETDATA_TOKEN` and, when set, `MARKETDATA_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .map_err(|_| AppError::MissingToken(format!("{TOKEN_ENV} is not set")))?;
        let mut config = ClientConfig::new(token);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config = config.with_base_url(base_url);
        }
        validator::validate_client_config(&config)?;
        Ok(config)
    }

    /// Build a configuration from a key file whose first line is the token.
    pub fn from_key_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let token = read_key_file(path.as_ref())?;
        let config = ClientConfig::new(token);
        validator::validate_client_config(&config)?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    ///
    /// The token is taken from `token`, then `token_file` (resolved relative to
    /// the config file), then the `MARKETDATA_TOKEN` environment variable.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read client config at {}", path.display()))?;
        let raw: RawClientConfig = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse client config at {}", path.display()))?;

        let root = path.parent().unwrap_or_else(|| Path::new("."));
        let config = raw.into_client_config(root)?;
        validator::validate_client_config(&config)?;
        Ok(config)
    }
}

impl RawClientConfig {
    fn into_client_config(self, root: &Path) -> Result<ClientConfig> {
        let token = match (self.token, self.token_file) {
            (Some(token), _) => token,
            (None, Some(file)) => {
                let file = if file.is_absolute() {
                    file
                } else {
                    root.join(file)
                };
                read_key_file(&file)?
            }
            (None, None) => std::env::var(TOKEN_ENV).map_err(|_| {
                AppError::MissingToken(format!(
                    "config provides neither token nor token_file and {TOKEN_ENV} is not set"
                ))
            })?,
        };

        let mut config = ClientConfig::new(token);
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(max_retries) = self.max_retries {
            config = config.with_max_retries(max_retries);
        }
        if let Some(seconds) = self.backoff_seconds {
            config = config.with_backoff(seconds_to_duration("backoff_seconds", seconds)?);
        }
        if let Some(seconds) = self.timeout_seconds {
            config = config.with_timeout(seconds_to_duration("timeout_seconds", seconds)?);
        }
        if let Some(pool_size) = self.pool_size {
            config = config.with_pool_size(pool_size);
        }
        if let Some(mode) = self.symbol_mode {
            config = config.with_symbol_mode(mode);
        }
        Ok(config)
    }
}

fn read_key_file(path: &Path) -> Result<String> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read key file {}", path.display()))?;
    let token = contents.lines().next().unwrap_or_default().trim();
    if token.is_empty() {
        return Err(AppError::MissingToken(format!(
            "key file {} is empty",
            path.display()
        )));
    }
    Ok(token.to_string())
}

fn seconds_to_duration(field: &str, seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| AppError::message(format!("{field} must be a non-negative number")))
}
