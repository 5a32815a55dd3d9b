use crate::error::{AppError, Result};

use super::ClientConfig;

/// Check a configuration and report every problem at once.
pub fn validate_client_config(config: &ClientConfig) -> Result<()> {
    let mut issues = Vec::new();

    validate_token(config.token(), &mut issues);

    let base_url = config.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        issues.push(format!(
            "base_url must start with http:// or https:// (got `{base_url}`)"
        ));
    }

    if config.max_retries == 0 {
        issues.push("max_retries must be at least 1".to_string());
    }

    if config.pool_size == 0 {
        issues.push("pool_size must be at least 1".to_string());
    }

    if config.timeout.is_zero() {
        issues.push("timeout must be greater than zero".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::message(format!(
            "Invalid client configuration: {}",
            issues.join("; ")
        )))
    }
}

fn validate_token(token: &str, issues: &mut Vec<String>) {
    if token.is_empty() {
        issues.push("token must not be empty".to_string());
        return;
    }

    if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
        issues.push("token must not contain whitespace or control characters".to_string());
    }
}
