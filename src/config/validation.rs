use super::models::Config;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Upstream '{name}' has an invalid URL '{value}', expected an absolute http(s) URL")]
    InvalidUpstreamUrl { name: String, value: String },

    #[error("Timeout must be positive: {field} = {value}")]
    InvalidTimeout { field: String, value: u64 },

    #[error("max_body_bytes ({actual}) must be between 1 byte and {limit} bytes")]
    BodyLimitOutOfRange { actual: u64, limit: u64 },

    #[error("User agent must not be empty")]
    EmptyUserAgent,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_upstreams(config)?;
    validate_timeouts(config)?;
    validate_server(config)?;
    validate_http(config)?;
    Ok(())
}

/// Every strategy endpoint must be an absolute http(s) URL
fn validate_upstreams(config: &Config) -> Result<(), ValidationError> {
    let upstreams = [
        ("primary_api", &config.upstreams.primary_api),
        ("backup_api", &config.upstreams.backup_api),
        ("cors_proxy", &config.upstreams.cors_proxy),
    ];

    for (name, value) in upstreams {
        let valid = Url::parse(value)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
            .unwrap_or(false);

        if !valid {
            return Err(ValidationError::InvalidUpstreamUrl {
                name: name.to_string(),
                value: value.clone(),
            });
        }
    }

    Ok(())
}

fn validate_timeouts(config: &Config) -> Result<(), ValidationError> {
    let timeouts = [
        ("http.request_timeout_secs", config.http.request_timeout_secs),
        ("http.connect_timeout_secs", config.http.connect_timeout_secs),
        ("resolver.attempt_timeout_secs", config.resolver.attempt_timeout_secs),
    ];

    for (field, value) in timeouts {
        if value == 0 {
            return Err(ValidationError::InvalidTimeout {
                field: field.to_string(),
                value,
            });
        }
    }

    Ok(())
}

/// Ensure max_body_bytes is positive and doesn't exceed 5MB
fn validate_server(config: &Config) -> Result<(), ValidationError> {
    const MAX_BODY_BYTES: u64 = 5 * 1024 * 1024; // 5 MB

    let actual = config.server.max_body_bytes.as_u64();
    if actual == 0 || actual > MAX_BODY_BYTES {
        return Err(ValidationError::BodyLimitOutOfRange {
            actual,
            limit: MAX_BODY_BYTES,
        });
    }

    Ok(())
}

fn validate_http(config: &Config) -> Result<(), ValidationError> {
    if config.http.user_agent.trim().is_empty() {
        return Err(ValidationError::EmptyUserAgent);
    }
    Ok(())
}
