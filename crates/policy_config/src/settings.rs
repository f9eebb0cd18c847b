use std::path::PathBuf;
use std::time::Duration;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ConfigError;

/// Environment variable holding the Anthropic API key. The key is never part
/// of the serialized configuration.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

const DEFAULT_CONFIG: &str = include_str!("../policy.json");

/// Retry policy applied by answer sources to their own requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct RetryConfig {
    /// Zero disables retries.
    pub max_retry_attempts: usize,
    pub min_delay_ms: u64,
    pub backoff_factor: u64,
    /// HTTP status codes that are worth another attempt.
    pub retry_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retry_attempts: 2,
            min_delay_ms: 1000,
            backoff_factor: 2,
            retry_status_codes: vec![429, 500, 502, 503, 504, 529],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct PolicyConfig {
    /// Model identifier sent to the completion endpoint.
    pub model: String,
    /// Base URL of the Anthropic API, with a trailing slash.
    pub anthropic_url: Url,
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Per-call timeout for outbound answer requests.
    pub request_timeout_secs: u64,
    /// Pause between consecutive questions when validating against a network
    /// answer source.
    pub call_delay_ms: u64,
    /// Fraction of required keywords that earns a PARTIAL verdict.
    pub partial_threshold: f64,
    pub preview_chars: usize,
    pub knowledge_base_path: PathBuf,
    /// Replaces the built-in instruction template when set.
    pub instructions_path: Option<PathBuf>,
    pub report_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub retry: RetryConfig,
}

impl PolicyConfig {
    /// Loads the configuration.
    ///
    /// Sources, lowest precedence first:
    /// 1. `policy.json` embedded at compile time
    /// 2. a `.env` file in the working directory, if present
    /// 3. environment variables prefixed with `POLICY_`, using `__` for
    ///    nesting (`POLICY_MODEL`, `POLICY_RETRY__MAX_RETRY_ATTEMPTS`)
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::load(None)
    }

    /// Loads the embedded defaults overridden by `overrides`, or by the
    /// process environment when `overrides` is `None`.
    pub fn load(overrides: Option<config::Map<String, String>>) -> Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Json,
            ))
            .add_source(
                config::Environment::with_prefix("POLICY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(overrides),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.partial_threshold > 0.0 && self.partial_threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "partial_threshold must be in (0, 1], got {}",
                self.partial_threshold
            )));
        }
        if self.preview_chars == 0 {
            return Err(ConfigError::Invalid(
                "preview_chars must be greater than zero".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.call_delay_ms)
    }

    /// Reads the API key from [`API_KEY_VAR`].
    pub fn api_key(&self) -> Result<String, ConfigError> {
        require_api_key(std::env::var(API_KEY_VAR).ok())
    }
}

/// Accepts a credential only when it is present and not blank.
pub fn require_api_key(value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(ConfigError::MissingCredential(API_KEY_VAR)),
    }
}
