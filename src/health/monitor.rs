//! Monitor loop.
//!
//! # Responsibilities
//! - Drive the prober on a fixed interval (first probe runs immediately)
//! - Feed verdicts into the shared health cell
//! - Log state transitions, and only transitions
//!
//! # Design Decisions
//! - A failed probe only affects the current cycle; the loop never exits
//!   on error, only on the shutdown signal
//! - Network failures log the underlying error, rejected responses log the
//!   status code

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::time;

use crate::config::GateConfig;
use crate::health::probe::{ProbeOutcome, Prober};
use crate::health::state::{SharedHealth, Transition};

pub struct Monitor {
    prober: Prober,
    health: Arc<SharedHealth>,
    interval: time::Duration,
}

impl Monitor {
    pub fn new(config: &GateConfig, health: Arc<SharedHealth>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            prober: Prober::new(config)?,
            health,
            interval: config.interval,
        })
    }

    /// Run until the shutdown signal fires. The interval ticker fires
    /// immediately, so the gate is not stuck fail-closed for a full
    /// period at startup.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            url = %self.prober.url(),
            interval_secs = self.interval.as_secs(),
            "health monitor starting"
        );

        let mut ticker = probe_ticker(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.prober.probe().await;
                    self.apply(&outcome);
                }
                _ = shutdown.recv() => {
                    tracing::info!("health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Record one verdict and log the transition when there is one.
    fn apply(&self, outcome: &ProbeOutcome) {
        let Some(transition) = self.health.record(outcome.verdict) else {
            return;
        };
        match transition {
            Transition::BecameHealthy => {
                tracing::info!(url = %self.prober.url(), "health check passed");
            }
            // A failed verdict without an error always carries a status:
            // it came from a received, rejected response.
            Transition::BecameUnhealthy => match &outcome.error {
                Some(error) => {
                    tracing::error!(url = %self.prober.url(), error = %error, "health check failed");
                }
                None => {
                    tracing::error!(
                        url = %self.prober.url(),
                        status = outcome.status.map(|s| s.as_u16()),
                        "health check failed"
                    );
                }
            },
        }
    }
}

/// Ticker for the probe cadence. A probe slower than the period must not
/// trigger a catch-up burst of probes; missed ticks are skipped.
fn probe_ticker(period: time::Duration) -> time::Interval {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
    ticker
}
