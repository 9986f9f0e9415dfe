use std::time::Duration;

use crate::domain::{ConfigError, ProviderId};

pub(crate) const ENV_GLOBAL_TIMEOUT_SECS: &str = "CUMREAD_LLM_TIMEOUT_SECS";

/// Transport settings a client reads from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEnvConfig {
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl ClientEnvConfig {
    pub fn from_env(provider: ProviderId) -> Result<Self, ConfigError> {
        let base_url = read_env_var(&base_url_var(provider))?
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let provider_timeout = read_timeout_from_env(&timeout_var(provider))?;
        let timeout = resolve_timeout_with_global_fallback(provider_timeout, || {
            read_timeout_from_env(ENV_GLOBAL_TIMEOUT_SECS)
        })?;

        Ok(Self { base_url, timeout })
    }
}

pub(crate) fn base_url_var(provider: ProviderId) -> String {
    let tag = provider.as_str().to_ascii_uppercase();
    format!("CUMREAD_{tag}_BASE_URL")
}

pub(crate) fn timeout_var(provider: ProviderId) -> String {
    let tag = provider.as_str().to_ascii_uppercase();
    format!("CUMREAD_{tag}_TIMEOUT_SECS")
}

pub(crate) fn read_env_var(name: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(error) => Err(ConfigError::invalid(format!(
            "{name} could not be read: {error}"
        ))),
    }
}

pub(crate) fn parse_timeout_seconds(name: &str, value: &str) -> Result<Duration, ConfigError> {
    let parsed = value.trim().parse::<u64>().map_err(|_| {
        ConfigError::invalid(format!("{name} must be a positive integer in seconds"))
    })?;
    if parsed == 0 {
        return Err(ConfigError::invalid(format!(
            "{name} must be greater than 0 seconds"
        )));
    }
    Ok(Duration::from_secs(parsed))
}

pub(crate) fn read_timeout_from_env(name: &str) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = read_env_var(name)? else {
        return Ok(None);
    };
    Ok(Some(parse_timeout_seconds(name, &value)?))
}

/// `None` leaves the HTTP client's own default timeout in place.
pub(crate) fn resolve_timeout_with_global_fallback<F>(
    provider_timeout: Option<Duration>,
    read_global_timeout: F,
) -> Result<Option<Duration>, ConfigError>
where
    F: FnOnce() -> Result<Option<Duration>, ConfigError>,
{
    if let Some(timeout) = provider_timeout {
        return Ok(Some(timeout));
    }

    read_global_timeout()
}
