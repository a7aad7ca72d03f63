//! Orchestrator settings
//!
//! Defaults match the demo page. Each value can be overridden from the
//! environment, and the CLI can override the environment in turn.

use crate::error::{TranslateError, TranslateResult};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/project/bulk-predict";

pub const ENDPOINT_VAR: &str = "CUNEIFORM_TRANSLATE_ENDPOINT";
pub const THINKING_DELAY_VAR: &str = "CUNEIFORM_THINKING_DELAY_MS";
pub const REQUEST_TIMEOUT_VAR: &str = "CUNEIFORM_REQUEST_TIMEOUT_SECS";
pub const NOTIFICATION_VAR: &str = "CUNEIFORM_NOTIFICATION_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Address of the remote prediction service
    pub endpoint: String,
    /// Artificial pause before every resolution, including table hits
    pub thinking_delay: Duration,
    /// Upper bound on a single remote call
    pub request_timeout: Duration,
    /// How long a notification stays up unless dismissed
    pub notification_duration: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            thinking_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(20),
            notification_duration: Duration::from_secs(6),
        }
    }
}

impl OrchestratorConfig {
    /// Defaults, overridden by any `CUNEIFORM_*` environment variables that are set
    pub fn from_env() -> TranslateResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> TranslateResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            config.endpoint = endpoint;
        }
        if let Some(ms) = lookup(THINKING_DELAY_VAR) {
            config.thinking_delay = Duration::from_millis(parse_number(THINKING_DELAY_VAR, &ms)?);
        }
        if let Some(secs) = lookup(REQUEST_TIMEOUT_VAR) {
            config.request_timeout = Duration::from_secs(parse_number(REQUEST_TIMEOUT_VAR, &secs)?);
        }
        if let Some(secs) = lookup(NOTIFICATION_VAR) {
            config.notification_duration =
                Duration::from_secs(parse_number(NOTIFICATION_VAR, &secs)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TranslateResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(TranslateError::ConfigurationError(
                "Translation endpoint cannot be empty".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(TranslateError::ConfigurationError(
                "Request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_number(name: &str, value: &str) -> TranslateResult<u64> {
    value.trim().parse().map_err(|_| {
        TranslateError::ConfigurationError(format!(
            "{} must be a non-negative integer, got '{}'",
            name, value
        ))
    })
}
