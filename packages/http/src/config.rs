//! HTTP client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{HttpError, Result};

/// User agent string identifying this library.
pub const USER_AGENT: &str = concat!("stepweave-http/", env!("CARGO_PKG_VERSION"));

/// HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for idempotent requests.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Base delay for exponential backoff (milliseconds).
pub const DEFAULT_RETRY_BASE_DELAY_MILLIS: u64 = 200;

/// Upper bound for a single backoff delay.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    /// Relative request URLs are resolved against this.
    pub base_url: Option<Url>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MILLIS),
            base_url: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        let timeout_secs = std::env::var("STEPWEAVE_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let max_retries = std::env::var("STEPWEAVE_HTTP_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_RETRIES);

        let retry_base_delay_millis = std::env::var("STEPWEAVE_HTTP_RETRY_BASE_DELAY_MILLIS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETRY_BASE_DELAY_MILLIS);

        let base_url = match std::env::var("STEPWEAVE_HTTP_BASE_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_base_url(&raw)?),
            _ => None,
        };

        Ok(Self {
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
            retry_base_delay: Duration::from_millis(retry_base_delay_millis),
            base_url,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Some(parse_base_url(base_url)?);
        Ok(self)
    }

    /// Resolve a step URL against the base URL.
    pub fn resolve_url(&self, raw: &str) -> Result<Url> {
        match Url::parse(raw) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.base_url.as_ref().ok_or_else(|| HttpError::InvalidUrl {
                    url: raw.to_string(),
                    reason: "relative URL without STEPWEAVE_HTTP_BASE_URL".to_string(),
                })?;
                base.join(raw).map_err(|e| HttpError::InvalidUrl {
                    url: raw.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(HttpError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|e| HttpError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
