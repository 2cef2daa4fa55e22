//! Events that can occur in a session

use crate::transport::TransportError;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // Operator events
    Submit {
        text: String,
    },
    /// Submit whatever is currently in the input buffer
    SubmitDraft,
    EditDraft {
        text: String,
    },
    Reset,

    // Transport events, tagged with the generation captured when the request was issued
    ReplyReceived {
        generation: u64,
        reply: String,
    },
    ReplyFailed {
        generation: u64,
        error: TransportError,
    },
}
