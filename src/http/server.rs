//! HTTP server setup and the request gate.
//!
//! # Responsibilities
//! - Create the Axum router (single catch-all route, any method)
//! - Wire up middleware (tracing)
//! - Serve with graceful shutdown
//! - Gate each request on the shared health state: redirect while the
//!   target is healthy, maintenance response otherwise

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, Response, StatusCode},
    response::IntoResponse,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GateConfig;
use crate::health::SharedHealth;
use crate::http::response::{maintenance_response, redirect_response};

/// Application state injected into the gate handler.
#[derive(Clone)]
pub struct AppState {
    pub health: Arc<SharedHealth>,
    /// Rendered target URL with any trailing slash removed, ready for the
    /// request path to be appended.
    pub target_base: Arc<str>,
}

/// HTTP server fronting the gated target.
pub struct GateServer {
    router: Router,
}

impl GateServer {
    /// Create a new server over the given health cell.
    pub fn new(config: &GateConfig, health: Arc<SharedHealth>) -> Self {
        let target_base = target_base(config);
        let state = AppState {
            health,
            target_base: target_base.into(),
        };
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router. Every path and method lands on the gate.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gate_handler))
            .route("/", any(gate_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires; in-flight requests are drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Render the redirect base from the configured target URL.
///
/// `Url` always renders a path, so a bare host comes out as
/// `https://example.com/`; the trailing slash is stripped before the
/// request path is appended, and no further joining or normalization is
/// done.
fn target_base(config: &GateConfig) -> String {
    let rendered = config.target_url.to_string();
    rendered
        .strip_suffix('/')
        .map(str::to_string)
        .unwrap_or(rendered)
}

/// Compose the redirect location: base + literal request path, with the
/// raw query string preserved verbatim when present.
fn redirect_location(base: &str, path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) => format!("{base}{path}?{q}"),
        None => format!("{base}{path}"),
    }
}

/// The request gate. Reads the health cell exactly once, then either
/// redirects to the target or serves the maintenance response.
async fn gate_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response<Body> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // One consistent snapshot per request; never re-read mid-handler.
    let open = state.health.gate_open();

    let result = if open {
        let location = redirect_location(&state.target_base, &path, request.uri().query());
        redirect_response(&location)
    } else {
        let accept = request
            .headers()
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok());
        maintenance_response(accept, &path)
    };

    match result {
        Ok(response) => {
            tracing::info!(
                target: "health_gate::access",
                remote = %addr,
                method = %method,
                path = %path,
                status = response.status().as_u16(),
            );
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "error building response");
            tracing::info!(
                target: "health_gate::access",
                remote = %addr,
                method = %method,
                path = %path,
                status = StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            );
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
