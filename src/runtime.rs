//! Runtime for driving a session
//!
//! A session is owned by exactly one task. Front-ends talk to it through a
//! cloneable [`SessionHandle`]; every mutation is serialized through the
//! task's event channel.

mod executor;


pub use executor::SessionRuntime;

use crate::state_machine::{Event, SessionContext, SessionSnapshot, TransitionError};
use crate::transport::ReplyTransport;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio_util::sync::{CancellationToken, DropGuard};

const EVENT_CHANNEL_CAPACITY: usize = 32;
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Notifications sent to subscribers
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// Published after every applied transition
    Snapshot(SessionSnapshot),
    /// A submission was ignored (blank input or a request already in flight)
    Rejected { reason: TransitionError },
    /// A reply arrived for a request that a reset superseded
    StaleReplyDiscarded { generation: u64 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleError {
    #[error("Session runtime has stopped")]
    Closed,
}

/// Handle to interact with a running session
///
/// Dropping the last clone tears the session down and abandons any
/// in-flight reply request.
#[derive(Clone)]
pub struct SessionHandle {
    session_id: String,
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<SessionUpdate>,
    snapshot: Arc<RwLock<SessionSnapshot>>,
    _shutdown: Arc<DropGuard>,
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Queue a submission. Blank text or a busy session is ignored by the runtime.
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), HandleError> {
        self.send(Event::Submit { text: text.into() }).await
    }

    /// Submit the current input buffer
    pub async fn submit_draft(&self) -> Result<(), HandleError> {
        self.send(Event::SubmitDraft).await
    }

    pub async fn edit_draft(&self, text: impl Into<String>) -> Result<(), HandleError> {
        self.send(Event::EditDraft { text: text.into() }).await
    }

    /// Start a new conversation
    pub async fn reset(&self) -> Result<(), HandleError> {
        self.send(Event::Reset).await
    }

    /// Latest published snapshot
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.broadcast_tx.subscribe()
    }

    async fn send(&self, event: Event) -> Result<(), HandleError> {
        self.event_tx.send(event).await.map_err(|_| HandleError::Closed)
    }
}

/// Start a session runtime on the current tokio runtime
pub fn spawn_session<T>(transport: T, context: SessionContext) -> SessionHandle
where
    T: ReplyTransport + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (broadcast_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
    let snapshot = Arc::new(RwLock::new(SessionSnapshot::default()));
    let shutdown = CancellationToken::new();
    let session_id = context.session_id.clone();

    let runtime = SessionRuntime::new(
        context,
        transport,
        event_rx,
        event_tx.clone(),
        broadcast_tx.clone(),
        snapshot.clone(),
        shutdown.clone(),
    );
    tokio::spawn(runtime.run());

    SessionHandle {
        session_id,
        event_tx,
        broadcast_tx,
        snapshot,
        _shutdown: Arc::new(shutdown.drop_guard()),
    }
}
