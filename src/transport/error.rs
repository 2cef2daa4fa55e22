//! Transport error types

use thiserror::Error;

/// Shown when the backend could not be reached at all
pub const NETWORK_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";
/// Shown when the backend rejected the request without a usable detail
pub const BACKEND_FALLBACK_MESSAGE: &str = "Failed to fetch reply";
/// Shown when a success response has no reply in it
pub const MALFORMED_REPLY_MESSAGE: &str = "The reply service returned an unexpected response";

/// Transport error with classification
///
/// Displays as the human-readable message only; callers that need to branch
/// on the failure should match on `kind`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    /// HTTP status for `Backend` and `Parse` failures
    pub status: Option<u16>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Backend unreachable, connection reset, timeout
    pub fn transport() -> Self {
        Self::new(TransportErrorKind::Transport, NETWORK_FAILURE_MESSAGE)
    }

    /// Non-success status; an empty or missing detail falls back to the generic message
    pub fn backend(detail: Option<String>) -> Self {
        let message = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| BACKEND_FALLBACK_MESSAGE.to_string());
        Self::new(TransportErrorKind::Backend, message)
    }

    pub fn parse() -> Self {
        Self::new(TransportErrorKind::Parse, MALFORMED_REPLY_MESSAGE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Network or connection failure
    Transport,
    /// Backend answered with a non-success status
    Backend,
    /// Success status but no reply field
    Parse,
}
