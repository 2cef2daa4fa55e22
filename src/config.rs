//! Backend endpoint configuration

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the reply service base URL
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const GENERATE_REPLY_PATH: &str = "/generate-reply";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Where and how to reach the reply-generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    /// Build from `BACKEND_URL`, falling back to the local development endpoint.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_value(std::env::var(BACKEND_URL_ENV).ok().as_deref())
    }

    fn from_value(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim) {
            Some(url) if !url.is_empty() => Self::new(url),
            _ => Self::new(DEFAULT_BACKEND_URL),
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}{GENERATE_REPLY_PATH}", self.base_url)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}
