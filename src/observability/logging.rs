//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Map the service's log channels onto tracing levels: DEBUG for the
//!   startup configuration dump, INFO for startup and health transitions,
//!   ERROR for probe and rendering failures
//!
//! # Design Decisions
//! - Access lines are INFO events under the `health_gate::access` target,
//!   so a formatter can split them out without the core knowing about
//!   presentation
//! - Level configurable via RUST_LOG

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "health_gate=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
