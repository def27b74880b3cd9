//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variables
//!     → schema.rs (parse, apply defaults)
//!     → GateConfig (immutable for the process lifetime)
//!     → injected into monitor loop and HTTP server
//! ```
//!
//! # Design Decisions
//! - Environment-only configuration, no file
//! - Fatal errors (port, target URL) abort before binding any socket
//! - Best-effort values for everything else, surfaced as warnings

pub mod schema;

pub use schema::{ConfigError, ConfigWarning, GateConfig};
