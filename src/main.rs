use std::sync::Arc;

use tokio::net::TcpListener;

use health_gate::config::{ConfigWarning, GateConfig};
use health_gate::health::{Monitor, SharedHealth};
use health_gate::http::GateServer;
use health_gate::lifecycle::{signals, Shutdown};
use health_gate::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    tracing::info!("health-gate starting");

    // Fatal parse errors (port, target URL) abort here, before any socket
    // is bound; everything else degrades to a default with a warning.
    let (config, warnings) = match GateConfig::from_env() {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            return Err(e.into());
        }
    };
    for warning in &warnings {
        report_warning(warning);
    }

    tracing::debug!(
        server_port = config.server_port,
        target_url = %config.target_url,
        health_check_url = %config.health_check_url,
        interval_secs = config.interval.as_secs(),
        timeout_secs = config.timeout.as_secs(),
        accepted_statuses = ?config.accepted_statuses,
        expected_body = config
            .expected_body
            .as_deref()
            .unwrap_or("not specified, ignoring body"),
        "configuration loaded"
    );

    let health = Arc::new(SharedHealth::new());
    let shutdown = Shutdown::new();

    // Background prober; sole writer of the health cell.
    let monitor = Monitor::new(&config, health.clone())?;
    let monitor_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        monitor.run(monitor_shutdown).await;
    });

    let listener = TcpListener::bind(("0.0.0.0", config.server_port)).await?;
    tracing::info!(port = config.server_port, "listening for connections");

    let server = GateServer::new(&config, health);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}

fn report_warning(warning: &ConfigWarning) {
    match warning {
        ConfigWarning::InvalidHealthCheckUrl { value, error } => {
            tracing::error!(value = %value, error = %error, "error parsing health check URL, using default");
        }
        ConfigWarning::InvalidDuration { name, value } => {
            tracing::warn!(name = %name, value = %value, "invalid duration, using default");
        }
        ConfigWarning::InvalidSuccessCode { value } => {
            tracing::warn!(value = %value, "invalid success code entry, skipping");
        }
        ConfigWarning::HostnameMismatch { target, health } => {
            tracing::warn!(
                target_host = %target,
                health_host = %health,
                "target URL and health check URL are not the same FQDN"
            );
        }
    }
}
