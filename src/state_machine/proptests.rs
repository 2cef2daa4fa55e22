//! Property-based tests for the session state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

#![allow(clippy::needless_pass_by_value)]

use super::state::*;
use super::transition::*;
use super::*;
use crate::transport::TransportError;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_blank_text() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,8}"
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-zA-Z0-9 ?.,]{1,40}",
        1 => arb_blank_text(),
    ]
}

fn arb_transport_error() -> impl Strategy<Value = TransportError> {
    prop_oneof![
        Just(TransportError::transport()),
        Just(TransportError::parse()),
        proptest::option::of("[a-zA-Z ]{0,30}").prop_map(TransportError::backend),
    ]
}

/// Reply events carry a generation offset so that both matching and stale
/// generations are exercised.
#[derive(Debug, Clone)]
enum Step {
    Submit(String),
    SubmitDraft,
    EditDraft(String),
    Reset,
    Reply { lag: u64, reply: String },
    Fail { lag: u64, error: TransportError },
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => arb_text().prop_map(Step::Submit),
        1 => Just(Step::SubmitDraft),
        1 => arb_text().prop_map(Step::EditDraft),
        1 => Just(Step::Reset),
        3 => (0u64..3, "[a-zA-Z ]{0,30}").prop_map(|(lag, reply)| Step::Reply { lag, reply }),
        2 => (0u64..3, arb_transport_error()).prop_map(|(lag, error)| Step::Fail { lag, error }),
    ]
}

fn to_event(step: Step, session: &Session) -> Event {
    let current = session.generation();
    match step {
        Step::Submit(text) => Event::Submit { text },
        Step::SubmitDraft => Event::SubmitDraft,
        Step::EditDraft(text) => Event::EditDraft { text },
        Step::Reset => Event::Reset,
        Step::Reply { lag, reply } => Event::ReplyReceived {
            generation: current.saturating_sub(lag),
            reply,
        },
        Step::Fail { lag, error } => Event::ReplyFailed {
            generation: current.saturating_sub(lag),
            error,
        },
    }
}

fn request_count(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::RequestReply { .. }))
        .count()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // No user turn ever holds blank content, and ids increase along history
    #[test]
    fn prop_history_well_formed(steps in proptest::collection::vec(arb_step(), 0..30)) {
        let mut session = Session::new();

        for step in steps {
            let event = to_event(step, &session);
            if let Ok(result) = transition(&session, event) {
                session = result.new_session;
            }

            for turn in session.history() {
                if turn.role == Role::User {
                    prop_assert!(!turn.content.trim().is_empty(), "blank user turn: {:?}", turn);
                }
            }
            prop_assert!(
                session.history().windows(2).all(|w| w[0].id < w[1].id),
                "ids out of order: {:?}",
                session.history()
            );
        }
    }

    // A request is issued exactly when the session enters Pending
    #[test]
    fn prop_request_only_on_entering_pending(
        steps in proptest::collection::vec(arb_step(), 0..30)
    ) {
        let mut session = Session::new();

        for step in steps {
            let event = to_event(step, &session);
            let was_pending = session.is_pending();
            if let Ok(result) = transition(&session, event) {
                let requests = request_count(&result.effects);
                if requests > 0 {
                    prop_assert!(!was_pending, "request issued while already pending");
                    prop_assert!(result.new_session.is_pending());
                    prop_assert_eq!(requests, 1);
                }
                session = result.new_session;
            }
        }
    }

    // Blank input never changes history or pending
    #[test]
    fn prop_blank_submit_is_noop(
        steps in proptest::collection::vec(arb_step(), 0..15),
        blank in arb_blank_text()
    ) {
        let mut session = Session::new();
        for step in steps {
            let event = to_event(step, &session);
            if let Ok(result) = transition(&session, event) {
                session = result.new_session;
            }
        }

        let result = transition(&session, Event::Submit { text: blank });
        prop_assert!(result.is_err());
    }

    // A pending session rejects every submission
    #[test]
    fn prop_pending_rejects_submit(first in "[a-zA-Z]{1,20}", second in arb_text()) {
        let pending = transition(&Session::new(), Event::Submit { text: first })
            .unwrap()
            .new_session;

        let result = transition(&pending, Event::Submit { text: second });
        prop_assert!(result.is_err(), "pending session accepted a submission: {:?}", result);
    }

    // Failed rounds grow history by exactly the user turn
    #[test]
    fn prop_failure_keeps_only_user_turn(
        prior in proptest::collection::vec(("[a-z]{1,10}", "[a-z]{0,10}"), 0..4),
        text in "[a-zA-Z]{1,20}",
        error in arb_transport_error()
    ) {
        let mut session = Session::new();
        for (question, answer) in prior {
            session = transition(&session, Event::Submit { text: question }).unwrap().new_session;
            let generation = session.generation();
            session = transition(&session, Event::ReplyReceived { generation, reply: answer })
                .unwrap()
                .new_session;
        }
        let before = session.history().len();

        session = transition(&session, Event::Submit { text }).unwrap().new_session;
        let generation = session.generation();
        let message = error.to_string();
        session = transition(&session, Event::ReplyFailed { generation, error })
            .unwrap()
            .new_session;

        prop_assert_eq!(session.history().len(), before + 1);
        prop_assert_eq!(session.history().last().map(|t| t.role), Some(Role::User));
        prop_assert!(!session.is_pending());
        prop_assert_eq!(session.last_error(), Some(message.as_str()));
    }

    // Reset is total from any reachable session
    #[test]
    fn prop_reset_is_total(steps in proptest::collection::vec(arb_step(), 0..30)) {
        let mut session = Session::new();
        for step in steps {
            let event = to_event(step, &session);
            if let Ok(result) = transition(&session, event) {
                session = result.new_session;
            }
        }

        let reset = transition(&session, Event::Reset).unwrap().new_session;
        prop_assert!(reset.history().is_empty());
        prop_assert!(!reset.is_pending());
        prop_assert_eq!(reset.last_error(), None);
        prop_assert_eq!(reset.draft(), "");
        prop_assert_eq!(reset.snapshot(), SessionSnapshot::default());
    }
}
