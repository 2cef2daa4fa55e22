//! Reply-generation transport
//!
//! One request/response exchange with the backend per call. The adapter is
//! stateless; the session runtime decides when to call it.

mod error;
mod http;
mod types;

pub use error::{
    TransportError, TransportErrorKind, BACKEND_FALLBACK_MESSAGE, MALFORMED_REPLY_MESSAGE,
    NETWORK_FAILURE_MESSAGE,
};
pub use http::HttpTransport;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for reply backends
#[async_trait]
pub trait ReplyTransport: Send + Sync {
    /// Send the ordered conversation and return the drafted reply
    async fn generate_reply(&self, messages: &[WireMessage]) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: ReplyTransport + ?Sized> ReplyTransport for Arc<T> {
    async fn generate_reply(&self, messages: &[WireMessage]) -> Result<String, TransportError> {
        (**self).generate_reply(messages).await
    }
}

/// Logging wrapper for reply transports
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: ReplyTransport> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: ReplyTransport> ReplyTransport for LoggingTransport<T> {
    async fn generate_reply(&self, messages: &[WireMessage]) -> Result<String, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.generate_reply(messages).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    messages = messages.len(),
                    reply_chars = reply.chars().count(),
                    "Reply request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    messages = messages.len(),
                    kind = ?e.kind,
                    status = ?e.status,
                    error = %e.message,
                    "Reply request failed"
                );
            }
        }

        result
    }
}
