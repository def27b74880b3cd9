//! End-to-end behavior of the health gate: a real monitor loop, a real
//! HTTP server, and a programmable mock health endpoint.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use url::Url;

use health_gate::config::GateConfig;
use health_gate::health::{HealthState, Monitor, SharedHealth};
use health_gate::http::GateServer;
use health_gate::lifecycle::Shutdown;

mod common;

/// Spin up the gate (server + monitor) against the given health endpoint.
/// Returns the gate's address and the shared health cell for observation.
async fn start_gate(
    health_endpoint: SocketAddr,
    shutdown: &Shutdown,
) -> (SocketAddr, Arc<SharedHealth>) {
    let config = GateConfig {
        target_url: Url::parse("https://example.com").unwrap(),
        health_check_url: Url::parse(&format!("http://{health_endpoint}/healthz")).unwrap(),
        interval: Duration::from_millis(100),
        timeout: Duration::from_millis(500),
        ..GateConfig::default()
    };

    let health = Arc::new(SharedHealth::new());

    let monitor = Monitor::new(&config, health.clone()).unwrap();
    let monitor_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        monitor.run(monitor_shutdown).await;
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = GateServer::new(&config, health.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, health)
}

/// Client that does not follow redirects, so the 307 itself is observable.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

async fn wait_for_state(health: &SharedHealth, wanted: HealthState) {
    for _ in 0..100 {
        if health.snapshot() == wanted {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("health state never reached {wanted:?}");
}

#[tokio::test]
async fn healthy_target_gets_redirect() {
    let endpoint = common::start_programmable_endpoint(|| async { (200, String::new()) }).await;
    let shutdown = Shutdown::new();
    let (gate, health) = start_gate(endpoint, &shutdown).await;

    wait_for_state(&health, HealthState::Healthy).await;

    let res = client()
        .get(format!("http://{gate}/"))
        .send()
        .await
        .expect("gate unreachable");
    assert_eq!(res.status(), 307);
    assert_eq!(
        res.headers().get("location").unwrap(),
        "https://example.com/"
    );

    // The original path rides along on the redirect.
    let res = client()
        .get(format!("http://{gate}/some/deep/path"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 307);
    assert_eq!(
        res.headers().get("location").unwrap(),
        "https://example.com/some/deep/path"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn unhealthy_target_gets_json_for_api_clients() {
    let endpoint = common::start_programmable_endpoint(|| async { (500, "down".into()) }).await;
    let shutdown = Shutdown::new();
    let (gate, health) = start_gate(endpoint, &shutdown).await;

    wait_for_state(&health, HealthState::Unhealthy).await;

    let res = client()
        .get(format!("http://{gate}/api/x"))
        .header("accept", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body = res.text().await.unwrap();
    assert_eq!(
        body,
        r#"{"status": "unavailable", "message": "service is currently undergoing a migration. Please try again later.", "detail": "service is currently undergoing a migration. Please try again later.", "code": 503}"#
    );

    shutdown.trigger();
}

#[tokio::test]
async fn unhealthy_target_gets_maintenance_page_for_browsers() {
    let endpoint = common::start_programmable_endpoint(|| async { (500, "down".into()) }).await;
    let shutdown = Shutdown::new();
    let (gate, health) = start_gate(endpoint, &shutdown).await;

    wait_for_state(&health, HealthState::Unhealthy).await;

    let res = client()
        .get(format!("http://{gate}/"))
        .header("accept", "text/html")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);
    assert_eq!(res.headers().get("content-type").unwrap(), "text/html");
    let body = res.text().await.unwrap();
    assert!(body.contains("<title>Server Migration</title>"));
    assert!(body.contains("We&rsquo;ll be back soon!"));

    shutdown.trigger();
}

#[tokio::test]
async fn gate_is_fail_closed_before_first_probe() {
    // No monitor running: the cell stays undetermined.
    let config = GateConfig::default();
    let health = Arc::new(SharedHealth::new());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let gate = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = GateServer::new(&config, health);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let res = client().get(format!("http://{gate}/")).send().await.unwrap();
    assert_eq!(res.status(), 503);

    shutdown.trigger();
}

#[tokio::test]
async fn gate_follows_health_flips() {
    let healthy = Arc::new(AtomicBool::new(true));
    let flag = healthy.clone();
    let endpoint = common::start_programmable_endpoint(move || {
        let flag = flag.clone();
        async move {
            if flag.load(Ordering::SeqCst) {
                (200, String::new())
            } else {
                (500, "dead".into())
            }
        }
    })
    .await;

    let shutdown = Shutdown::new();
    let (gate, health) = start_gate(endpoint, &shutdown).await;
    let client = client();

    wait_for_state(&health, HealthState::Healthy).await;
    let res = client.get(format!("http://{gate}/")).send().await.unwrap();
    assert_eq!(res.status(), 307);

    healthy.store(false, Ordering::SeqCst);
    wait_for_state(&health, HealthState::Unhealthy).await;
    let res = client.get(format!("http://{gate}/")).send().await.unwrap();
    assert_eq!(res.status(), 503);

    healthy.store(true, Ordering::SeqCst);
    wait_for_state(&health, HealthState::Healthy).await;
    let res = client.get(format!("http://{gate}/")).send().await.unwrap();
    assert_eq!(res.status(), 307);

    shutdown.trigger();
}
