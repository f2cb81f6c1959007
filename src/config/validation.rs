use crate::config::types::{Config, RateLimitConfig, TransportConfig};
use crate::ConfigError;
use url::Url;

const PROXY_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent(&config.user_agent)?;
    validate_rate_limit(&config.rate_limit)?;
    validate_transport(&config.transport)?;
    Ok(())
}

fn validate_user_agent(user_agent: &str) -> Result<(), ConfigError> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Must be usable as an HTTP header value
    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent must not contain control characters, got {:?}",
            user_agent
        )));
    }

    Ok(())
}

fn validate_rate_limit(config: &RateLimitConfig) -> Result<(), ConfigError> {
    if config.burst < 1 {
        return Err(ConfigError::Validation(format!(
            "rate-limit burst must be >= 1, got {}",
            config.burst
        )));
    }

    Ok(())
}

fn validate_transport(config: &TransportConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "transport timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    for proxy in &config.proxies {
        validate_proxy(proxy)?;
    }

    Ok(())
}

fn validate_proxy(proxy: &str) -> Result<(), ConfigError> {
    let url = Url::parse(proxy)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;

    if !PROXY_SCHEMES.contains(&url.scheme()) {
        return Err(ConfigError::InvalidUrl(format!(
            "Proxy '{}' must use one of {:?}",
            proxy, PROXY_SCHEMES
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Proxy '{}' has no host",
            proxy
        )));
    }

    Ok(())
}
