//! Lead Response Assistant - conversation session core
//!
//! An operator types customer enquiries; each one is sent, together with the
//! conversation so far, to a reply-generation backend and the drafted reply
//! is appended to the session. This crate owns that session: history,
//! single-flight request handling, error surfacing and reset.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let session = lead_assistant::connect(&lead_assistant::BackendConfig::from_env()?)?;
//! session.submit("My parcel arrived damaged").await?;
//! let view = session.snapshot().await;
//! # let _ = view;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod runtime;
pub mod state_machine;
pub mod transport;

pub use config::{BackendConfig, ConfigError};
pub use runtime::{spawn_session, HandleError, SessionHandle, SessionUpdate};
pub use state_machine::{Role, SessionContext, SessionSnapshot, Turn, TurnId};
pub use transport::{
    HttpTransport, LoggingTransport, ReplyTransport, TransportError, TransportErrorKind,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Start a session against the HTTP backend described by `config`.
///
/// Must be called from within a tokio runtime.
pub fn connect(config: &BackendConfig) -> Result<SessionHandle, ConfigError> {
    let transport = LoggingTransport::new(HttpTransport::new(config)?);
    let context = SessionContext::new();
    tracing::info!(
        session_id = %context.session_id,
        endpoint = %config.endpoint(),
        "Opening session"
    );
    Ok(spawn_session(transport, context))
}

/// Install JSON logging filtered by `RUST_LOG` (default `lead_assistant=info`).
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_assistant=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .try_init();
}
