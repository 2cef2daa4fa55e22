//! HTTP implementation of the reply transport

use super::error::TransportError;
use super::types::{ErrorBody, ReplyRequest, ReplyResponse, WireMessage};
use super::ReplyTransport;
use crate::config::{BackendConfig, ConfigError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

/// Talks to `POST <base_url>/generate-reply`
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &BackendConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReplyTransport for HttpTransport {
    async fn generate_reply(&self, messages: &[WireMessage]) -> Result<String, TransportError> {
        let request = ReplyRequest {
            messages: messages.to_vec(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    timeout = e.is_timeout(),
                    connect = e.is_connect(),
                    error = %e,
                    "Reply request did not complete"
                );
                TransportError::transport()
            })?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body is treated like an empty one
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::warn!(status = status.as_u16(), error = %e, "Failed to read error body");
                String::new()
            });
            return Err(parse_failure_body(status.as_u16(), &body));
        }

        let body = response.text().await.map_err(|e| {
            tracing::warn!(status = status.as_u16(), error = %e, "Failed to read reply body");
            TransportError::transport()
        })?;
        parse_success_body(status.as_u16(), &body)
    }
}

/// Extract `reply` from a 2xx body. An empty string is a valid reply.
pub(crate) fn parse_success_body(status: u16, body: &str) -> Result<String, TransportError> {
    serde_json::from_str::<ReplyResponse>(body)
        .map(|r| r.reply)
        .map_err(|e| {
            tracing::warn!(status, error = %e, "Reply body did not contain a reply");
            TransportError::parse().with_status(status)
        })
}

/// Build the error for a non-2xx response, preferring the backend's `detail`.
pub(crate) fn parse_failure_body(status: u16, body: &str) -> TransportError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail_text().map(str::to_string));
    TransportError::backend(detail).with_status(status)
}
