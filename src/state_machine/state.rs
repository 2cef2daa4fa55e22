//! Session state types

use crate::transport::{WireMessage, WireRole};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Turns
// ============================================================================

/// Who authored a turn. The session itself never produces system turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl From<Role> for WireRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => WireRole::User,
            Role::Assistant => WireRole::Assistant,
        }
    }
}

/// Per-session sequence number; later turns always compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(u64);

impl TurnId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Wire form; the id stays local
    pub fn to_wire(&self) -> WireMessage {
        WireMessage::new(self.role.into(), self.content.clone())
    }
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    /// No request outstanding
    #[default]
    Idle,
    /// A reply request tagged with `generation` is in flight
    Pending { generation: u64 },
}

impl SessionState {
    pub fn is_pending(self) -> bool {
        matches!(self, SessionState::Pending { .. })
    }
}

/// The aggregate owned by one runtime.
///
/// Only [`transition`](super::transition) produces new values; everything
/// outside this module reads through the accessors or a [`SessionSnapshot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub(super) history: Vec<Turn>,
    pub(super) state: SessionState,
    pub(super) last_error: Option<String>,
    pub(super) draft: String,
    /// Bumped on every issued request and every reset
    pub(super) generation: u64,
    pub(super) next_turn_id: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Full history in wire form, oldest first
    pub fn wire_history(&self) -> Vec<WireMessage> {
        self.history.iter().map(Turn::to_wire).collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            history: self.history.clone(),
            pending: self.is_pending(),
            last_error: self.last_error.clone(),
            draft: self.draft.clone(),
        }
    }

    pub(super) fn push_turn(&mut self, role: Role, content: String) -> TurnId {
        let id = TurnId(self.next_turn_id);
        self.next_turn_id += 1;
        self.history.push(Turn { id, role, content });
        id
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub history: Vec<Turn>,
    pub pending: bool,
    pub last_error: Option<String>,
    pub draft: String,
}

/// Context for a session (immutable configuration)
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_id(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
