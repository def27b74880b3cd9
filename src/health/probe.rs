//! Health probing.
//!
//! # Responsibilities
//! - Issue one GET to the health-check endpoint per cycle, with a timeout
//! - Validate the response status against the accepted set
//! - Validate the response body against the expected body, when configured
//!
//! # Design Decisions
//! - Transport errors (refused, DNS, timeout) and a rejected response both
//!   resolve to a failed verdict; only the log message differs
//! - Body comparison trims leading/trailing whitespace, inner bytes exact
//! - When no body is configured the response body is never read; dropping
//!   the response releases the connection

use std::collections::BTreeSet;

use reqwest::StatusCode;
use url::Url;

use crate::config::GateConfig;

/// Outcome of a single probe cycle.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// Whether this cycle considers the target healthy.
    pub verdict: bool,
    /// Status code, when a response was received at all.
    pub status: Option<StatusCode>,
    /// Transport or body-read error, when one occurred.
    pub error: Option<String>,
}

impl ProbeOutcome {
    fn failed(error: String) -> Self {
        Self {
            verdict: false,
            status: None,
            error: Some(error),
        }
    }
}

/// Issues health probes against a fixed endpoint.
pub struct Prober {
    client: reqwest::Client,
    url: Url,
    accepted_statuses: BTreeSet<u16>,
    expected_body: Option<String>,
}

impl Prober {
    /// Build a prober from the loaded configuration.
    pub fn new(config: &GateConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            url: config.health_check_url.clone(),
            accepted_statuses: config.accepted_statuses.clone(),
            expected_body: config.expected_body.clone(),
        })
    }

    /// The endpoint this prober targets.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Run one probe cycle.
    pub async fn probe(&self) -> ProbeOutcome {
        let response = match self.client.get(self.url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::failed(e.to_string()),
        };

        let status = response.status();
        let mut verdict = self.accepted_statuses.contains(&status.as_u16());

        if let Some(expected) = &self.expected_body {
            match response.text().await {
                Ok(body) => {
                    if body.trim() != expected.trim() {
                        verdict = false;
                    }
                }
                Err(e) => {
                    return ProbeOutcome {
                        verdict: false,
                        status: Some(status),
                        error: Some(format!("error reading response body: {e}")),
                    };
                }
            }
        }

        ProbeOutcome {
            verdict,
            status: Some(status),
            error: None,
        }
    }
}
