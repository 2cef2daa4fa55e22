//! Effects produced by state transitions

use crate::transport::WireMessage;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue one reply request carrying the full history
    RequestReply {
        generation: u64,
        messages: Vec<WireMessage>,
    },

    /// Push the new snapshot to readers
    PublishSnapshot,
}
