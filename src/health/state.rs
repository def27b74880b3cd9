//! Shared health state cell.
//!
//! # States
//! - Unknown: no probe has completed yet
//! - Healthy: last probe passed, traffic is redirected
//! - Unhealthy: last probe failed, maintenance response served
//!
//! # State Transitions
//! ```text
//! Unknown   → Healthy | Unhealthy  (first probe)
//! Healthy   → Unhealthy
//! Unhealthy → Healthy
//! ```
//!
//! # Design Decisions
//! - One AtomicU8 encodes both "determined" and "healthy", so readers can
//!   never observe a torn pair
//! - Unknown gates as unhealthy (fail-closed)
//! - Transitions are edge-triggered: recording the same verdict twice
//!   reports no transition

use std::sync::atomic::{AtomicU8, Ordering};

/// Health verdict as recorded by the monitor loop.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown = 0,
    Healthy = 1,
    Unhealthy = 2,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthState::Healthy,
            2 => HealthState::Unhealthy,
            _ => HealthState::Unknown,
        }
    }
}

/// An edge in the recorded health state, reported by [`SharedHealth::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    BecameHealthy,
    BecameUnhealthy,
}

/// The health status cell shared between the monitor loop (sole writer)
/// and the request gate (many concurrent readers).
#[derive(Debug)]
pub struct SharedHealth {
    state: AtomicU8,
}

impl SharedHealth {
    /// Create a new cell in the undetermined state.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(HealthState::Unknown as u8),
        }
    }

    /// Linearizable point read of the current state.
    pub fn snapshot(&self) -> HealthState {
        HealthState::from(self.state.load(Ordering::Acquire))
    }

    /// Return true if traffic may be redirected to the target.
    /// Unknown is treated as unhealthy.
    pub fn gate_open(&self) -> bool {
        self.snapshot() == HealthState::Healthy
    }

    /// Record the verdict of one probe cycle.
    ///
    /// Returns the transition when the verdict differs from the recorded
    /// state (including the first determination), `None` otherwise. The
    /// read-compare-write is a single atomic swap, so concurrent readers
    /// only ever see a state produced by a completed write.
    pub fn record(&self, verdict: bool) -> Option<Transition> {
        let new = if verdict {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        };
        let old = HealthState::from(self.state.swap(new as u8, Ordering::AcqRel));
        if old == new {
            return None;
        }
        Some(if verdict {
            Transition::BecameHealthy
        } else {
            Transition::BecameUnhealthy
        })
    }
}

impl Default for SharedHealth {
    fn default() -> Self {
        Self::new()
    }
}
