use crate::env::{env_non_empty, OMNIPULSE_INGEST_KEY_ENV, OMNIPULSE_URL_ENV};
use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_ENVIRONMENT: &str = "production";
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const MIN_FLUSH_INTERVAL: Duration = Duration::from_millis(10);

/// Client configuration.
///
/// **Fields**
/// - `api_url`: base URL of the ingest backend. Falls back to
///   `OMNIPULSE_URL` when unset.
/// - `ingest_key`: credential sent as `X-Ingest-Key`. Falls back to
///   `OMNIPULSE_INGEST_KEY` when unset.
/// - `environment`: deployment tag, `"production"` by default.
/// - `service_name`: stamped on every log, span and metric built through
///   the client's builders.
/// - `version`: application version, reported by the test event.
/// - `debug`: surface background flush failures at `warn` instead of `debug`.
/// - `batch_size`: per-kind buffer length that triggers an immediate flush.
/// - `flush_interval`: period of the background flush.
/// - `timeout`: bound on each HTTP delivery attempt.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: Option<String>,
    pub ingest_key: Option<String>,
    pub environment: String,
    pub service_name: Option<String>,
    pub version: Option<String>,
    pub debug: bool,
    pub batch_size: usize,
    pub flush_interval: Duration,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            ingest_key: None,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            service_name: None,
            version: None,
            debug: false,
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, ingest_key: impl Into<String>) -> Self {
        Self {
            api_url: Some(api_url.into()),
            ingest_key: Some(ingest_key.into()),
            ..Self::default()
        }
    }

    /// Fill the endpoint and credential from the environment when missing,
    /// clamp degenerate values, and check that both are present.
    pub fn resolve(mut self) -> Result<ResolvedConfig, ConfigError> {
        if self.api_url.as_deref().map_or(true, str::is_empty) {
            self.api_url = env_non_empty(OMNIPULSE_URL_ENV);
        }
        if self.ingest_key.as_deref().map_or(true, str::is_empty) {
            self.ingest_key = env_non_empty(OMNIPULSE_INGEST_KEY_ENV);
        }

        let api_url = self.api_url.clone().ok_or(ConfigError::MissingApiUrl)?;
        let ingest_key = self.ingest_key.clone().ok_or(ConfigError::MissingIngestKey)?;

        if self.environment.is_empty() {
            self.environment = DEFAULT_ENVIRONMENT.to_string();
        }
        self.batch_size = self.batch_size.max(1);
        self.flush_interval = self.flush_interval.max(MIN_FLUSH_INTERVAL);
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_TIMEOUT;
        }

        Ok(ResolvedConfig {
            api_url,
            ingest_key,
            settings: self,
        })
    }
}

/// A [`ClientConfig`] whose endpoint and credential are known to be present.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub api_url: String,
    pub ingest_key: String,
    pub settings: ClientConfig,
}
