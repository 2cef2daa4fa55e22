//! Core session state machine
//!
//! Pure transitions over the session aggregate; all I/O is described by
//! effects and carried out by the runtime.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{Role, Session, SessionContext, SessionSnapshot, SessionState, Turn, TurnId};
pub use transition::{transition, TransitionError, TransitionResult};
