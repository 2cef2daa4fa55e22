//! Wire types for the `/generate-reply` exchange

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message role as sent on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Assistant,
    /// Backend-side context injection; the session never emits this itself
    System,
}

/// One conversation turn without its local id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
}

impl WireMessage {
    pub fn new(role: WireRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(WireRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(WireRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(WireRole::System, content)
    }
}

/// Request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub messages: Vec<WireMessage>,
}

/// Success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub reply: String,
}

/// Failure body; `detail` is only honoured when it is a string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    pub fn detail_text(&self) -> Option<&str> {
        self.detail.as_ref().and_then(Value::as_str)
    }
}
