//! Pure state transition function

use super::state::{Role, Session, SessionState};
use super::{Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons an event leaves the session untouched
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyInput,
    #[error("A reply is already being drafted")]
    Busy,
    #[error("Reply for superseded request (generation {generation}) discarded")]
    StaleReply { generation: u64 },
}

/// Pure transition function
///
/// Given the same session and event it always produces the same result and
/// performs no I/O. An `Err` means the session is unchanged.
pub fn transition(session: &Session, event: Event) -> Result<TransitionResult, TransitionError> {
    match (session.state, event) {
        // ============================================================
        // Submissions
        // ============================================================
        (SessionState::Pending { .. }, Event::Submit { .. } | Event::SubmitDraft) => {
            Err(TransitionError::Busy)
        }

        (SessionState::Idle, Event::Submit { text }) => begin_round(session, text),

        (SessionState::Idle, Event::SubmitDraft) => begin_round(session, session.draft.clone()),

        // ============================================================
        // Input buffer and reset (any state)
        // ============================================================
        (_, Event::EditDraft { text }) => {
            let mut next = session.clone();
            next.draft = text;
            Ok(TransitionResult::new(next).with_effect(Effect::PublishSnapshot))
        }

        // In-flight requests are not cancelled; bumping the generation makes
        // their replies stale when they land.
        (_, Event::Reset) => {
            let next = Session {
                history: Vec::new(),
                state: SessionState::Idle,
                last_error: None,
                draft: String::new(),
                generation: session.generation + 1,
                next_turn_id: session.next_turn_id,
            };
            Ok(TransitionResult::new(next).with_effect(Effect::PublishSnapshot))
        }

        // ============================================================
        // Settling the outstanding request
        // ============================================================
        (SessionState::Pending { generation }, Event::ReplyReceived { generation: tag, reply })
            if generation == tag =>
        {
            let mut next = session.clone();
            next.push_turn(Role::Assistant, reply);
            next.state = SessionState::Idle;
            next.last_error = None;
            Ok(TransitionResult::new(next).with_effect(Effect::PublishSnapshot))
        }

        (SessionState::Pending { generation }, Event::ReplyFailed { generation: tag, error })
            if generation == tag =>
        {
            let mut next = session.clone();
            next.state = SessionState::Idle;
            next.last_error = Some(error.to_string());
            Ok(TransitionResult::new(next).with_effect(Effect::PublishSnapshot))
        }

        (
            _,
            Event::ReplyReceived { generation, .. } | Event::ReplyFailed { generation, .. },
        ) => Err(TransitionError::StaleReply { generation }),
    }
}

/// Idle + non-blank text: commit the user turn, then request a reply for the
/// history that now includes it.
fn begin_round(session: &Session, text: String) -> Result<TransitionResult, TransitionError> {
    if text.trim().is_empty() {
        return Err(TransitionError::EmptyInput);
    }

    let mut next = session.clone();
    next.push_turn(Role::User, text);
    next.last_error = None;
    next.draft.clear();
    next.generation += 1;
    next.state = SessionState::Pending {
        generation: next.generation,
    };

    let request = Effect::RequestReply {
        generation: next.generation,
        messages: next.wire_history(),
    };

    Ok(TransitionResult::new(next)
        .with_effect(Effect::PublishSnapshot)
        .with_effect(request))
}
