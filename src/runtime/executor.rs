//! Session runtime executor

use super::SessionUpdate;
use crate::state_machine::{
    transition, Effect, Event, Session, SessionContext, SessionSnapshot, TransitionError,
};
use crate::transport::ReplyTransport;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio_util::sync::CancellationToken;

/// Owns one session and applies events to it strictly in arrival order
pub struct SessionRuntime<T>
where
    T: ReplyTransport + 'static,
{
    context: SessionContext,
    session: Session,
    transport: Arc<T>,
    event_rx: mpsc::Receiver<Event>,
    /// Cloned into reply tasks so results come back through the same queue
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<SessionUpdate>,
    snapshot: Arc<RwLock<SessionSnapshot>>,
    shutdown: CancellationToken,
}

impl<T> SessionRuntime<T>
where
    T: ReplyTransport + 'static,
{
    pub fn new(
        context: SessionContext,
        transport: T,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<SessionUpdate>,
        snapshot: Arc<RwLock<SessionSnapshot>>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            context,
            session: Session::new(),
            transport: Arc::new(transport),
            event_rx,
            event_tx,
            broadcast_tx,
            snapshot,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting session runtime");

        loop {
            tokio::select! {
                biased;

                () = self.shutdown.cancelled() => break,

                Some(event) = self.event_rx.recv() => {
                    self.process_event(event).await;
                }

                else => break,
            }
        }

        tracing::info!(session_id = %self.context.session_id, "Session runtime stopped");
    }

    async fn process_event(&mut self, event: Event) {
        match transition(&self.session, event) {
            Ok(result) => {
                self.session = result.new_session;
                for effect in result.effects {
                    self.execute_effect(effect).await;
                }
            }
            Err(TransitionError::StaleReply { generation }) => {
                tracing::info!(
                    session_id = %self.context.session_id,
                    generation,
                    current_generation = self.session.generation(),
                    "Discarding reply for superseded request"
                );
                let _ = self
                    .broadcast_tx
                    .send(SessionUpdate::StaleReplyDiscarded { generation });
            }
            Err(reason) => {
                tracing::debug!(
                    session_id = %self.context.session_id,
                    reason = %reason,
                    "Submission ignored"
                );
                let _ = self.broadcast_tx.send(SessionUpdate::Rejected { reason });
            }
        }
    }

    async fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::PublishSnapshot => {
                let snapshot = self.session.snapshot();
                *self.snapshot.write().await = snapshot.clone();
                // No subscribers is fine; readers can still poll the snapshot
                let _ = self.broadcast_tx.send(SessionUpdate::Snapshot(snapshot));
            }

            Effect::RequestReply {
                generation,
                messages,
            } => {
                let transport = self.transport.clone();
                let event_tx = self.event_tx.clone();
                let shutdown = self.shutdown.clone();
                let session_id = self.context.session_id.clone();

                tokio::spawn(async move {
                    tracing::info!(
                        session_id = %session_id,
                        generation,
                        messages = messages.len(),
                        "Requesting reply (background)"
                    );

                    tokio::select! {
                        biased;

                        () = shutdown.cancelled() => {
                            tracing::debug!(
                                session_id = %session_id,
                                generation,
                                "Reply request abandoned on shutdown"
                            );
                        }

                        result = transport.generate_reply(&messages) => {
                            let event = match result {
                                Ok(reply) => Event::ReplyReceived { generation, reply },
                                Err(error) => Event::ReplyFailed { generation, error },
                            };
                            if event_tx.send(event).await.is_err() {
                                tracing::debug!(
                                    session_id = %session_id,
                                    "Session runtime gone before reply arrived"
                                );
                            }
                        }
                    }
                });
            }
        }
    }
}
