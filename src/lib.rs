//! Health-gated redirect server.
//!
//! Gates traffic to an upstream destination behind a periodically-refreshed
//! health signal: while the monitored target is healthy, every inbound
//! request is redirected to it (307); while unhealthy or not yet probed,
//! the server answers with a maintenance response (503, JSON or HTML by
//! content negotiation) and never forwards the request.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 HEALTH GATE                   │
//!                    │                                               │
//!   Client Request   │  ┌─────────┐        ┌───────────────────┐    │
//!   ─────────────────┼─▶│  http   │───────▶│  health::state     │    │
//!                    │  │  gate   │  read  │  (shared cell)     │    │
//!   Client Response  │  └─────────┘        └─────────▲─────────┘    │
//!   ◀────────────────┼── 307 | 503                   │ write        │
//!                    │                      ┌────────┴─────────┐    │
//!                    │                      │ health::monitor   │    │
//!                    │                      │  + health::probe  │────┼──▶ Health-check
//!                    │                      └──────────────────┘    │    endpoint
//!                    │                                               │
//!                    │  ┌────────────────────────────────────────┐  │
//!                    │  │         Cross-Cutting Concerns          │  │
//!                    │  │  config · lifecycle · observability     │  │
//!                    │  └────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod health;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GateConfig;
pub use health::{Monitor, SharedHealth};
pub use http::GateServer;
pub use lifecycle::Shutdown;
