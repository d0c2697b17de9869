//! Configuration validation logic.

use std::net::SocketAddr;

use url::Url;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Minimum length for a shared access token.
const MIN_TOKEN_LENGTH: usize = 8;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_endpoint("datasets_endpoint", &config.services.datasets_endpoint)?;
    validate_endpoint("projects_endpoint", &config.services.projects_endpoint)?;
    validate_bind(&config.server.bind)?;
    validate_base_url(&config.server.base_url)?;

    if let Some(token) = &config.server.token {
        validate_token(token)?;
    }

    if config.server.max_upload_bytes == 0 {
        return Err(Error::ConfigValidation {
            field: "max_upload_bytes".to_string(),
            message: "Upload limit must be greater than zero".to_string(),
        });
    }

    validate_timeout(config.services.timeout_seconds)
}

/// Validate the upstream request timeout.
pub fn validate_timeout(seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "timeout_seconds".to_string(),
            message: "Timeout must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Validate an upstream endpoint: absolute http(s) URL with a host.
pub fn validate_endpoint(field: &str, endpoint: &str) -> Result<Url> {
    if endpoint.is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }

    let url = Url::parse(endpoint).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("'{}' is not a valid URL: {}", endpoint, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("Unsupported scheme '{}' (use http or https)", url.scheme()),
        });
    }

    if url.host_str().is_none() {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("'{}' has no host", endpoint),
        });
    }

    Ok(url)
}

/// Validate the listen address.
pub fn validate_bind(bind: &str) -> Result<SocketAddr> {
    bind.parse::<SocketAddr>()
        .map_err(|e| Error::ConfigValidation {
            field: "bind".to_string(),
            message: format!("'{}' is not a socket address: {}", bind, e),
        })
}

/// Validate the route prefix.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    if !base_url.starts_with('/') {
        return Err(Error::ConfigValidation {
            field: "base_url".to_string(),
            message: format!("'{}' must start with '/'", base_url),
        });
    }

    if base_url.contains(char::is_whitespace) || base_url.contains('?') {
        return Err(Error::ConfigValidation {
            field: "base_url".to_string(),
            message: format!("'{}' must be a plain path", base_url),
        });
    }

    Ok(())
}

/// Validate the shared access token.
pub fn validate_token(token: &str) -> Result<()> {
    if token.len() < MIN_TOKEN_LENGTH {
        return Err(Error::ConfigValidation {
            field: "token".to_string(),
            message: format!(
                "Token must be at least {} characters (got {})",
                MIN_TOKEN_LENGTH,
                token.len()
            ),
        });
    }

    // Check for placeholder values
    let token_lower = token.to_lowercase();
    if token_lower.contains("replaceme") || token_lower.contains("your_token") {
        return Err(Error::ConfigValidation {
            field: "token".to_string(),
            message: "Token appears to be a placeholder.".to_string(),
        });
    }

    Ok(())
}
