//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Monitor loop (monitor.rs):
//!     Periodic timer (plus one immediate run)
//!     → Probe the health-check endpoint (probe.rs)
//!     → Record verdict in the shared cell (state.rs)
//!     → Log transitions only
//!
//! Request gate (http::server):
//!     → Snapshot the shared cell
//!     → Redirect or serve maintenance response
//! ```
//!
//! # Design Decisions
//! - Single writer (monitor loop), many readers (request handlers)
//! - State lives in one atomic word; no reader ever sees a torn update
//! - Undetermined gates as unhealthy (fail-closed)

pub mod monitor;
pub mod probe;
pub mod state;

pub use monitor::Monitor;
pub use probe::{ProbeOutcome, Prober};
pub use state::{HealthState, SharedHealth, Transition};
