//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (router, gate handler)
//!     → health::SharedHealth snapshot
//!     → response.rs (redirect | negotiated maintenance body)
//!     → client
//! ```
//!
//! # Design Decisions
//! - One catch-all route; behavior depends only on health state, the
//!   Accept header, and the path prefix
//! - Requests are never forwarded; the gate answers directly

pub mod response;
pub mod server;

pub use server::GateServer;
