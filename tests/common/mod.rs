//! Shared targets for the integration tests
#![allow(dead_code)]

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use gauntlet_config::ProbeConfig;
use gauntlet_http::{HttpClientConfig, ReqwestExecutor};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

/// Routes of the RustAPI benchmark server; every handler waits `latency` first
pub fn rustapi_app(latency: Duration) -> Router {
    Router::new()
        .route("/", get(plain_text))
        .route("/json", get(hello_json))
        .route("/users/{id}", get(user))
        .route("/users-list", get(users_list))
        .route("/create-user", post(create_user))
        .route("/error", get(server_error))
        .with_state(latency)
}

/// Same handlers on the Actix-web benchmark server's routes
pub fn actix_app(latency: Duration) -> Router {
    Router::new()
        .route("/", get(plain_text))
        .route("/json", get(hello_json))
        .route("/users/{id}", get(user))
        .route("/users", get(users_list).post(create_user))
        .with_state(latency)
}

async fn pause(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

async fn plain_text(State(latency): State<Duration>) -> &'static str {
    pause(latency).await;
    "Hello, World!"
}

async fn hello_json(State(latency): State<Duration>) -> Json<Value> {
    pause(latency).await;
    Json(json!({ "message": "Hello, World!" }))
}

async fn user(State(latency): State<Duration>, Path(id): Path<u64>) -> Json<Value> {
    pause(latency).await;
    Json(json!({ "id": id, "name": format!("User {}", id), "email": format!("user{}@example.com", id) }))
}

async fn users_list(State(latency): State<Duration>) -> Json<Value> {
    pause(latency).await;
    let users: Vec<Value> = (1..=10)
        .map(|id| json!({ "id": id, "name": format!("User {}", id) }))
        .collect();
    Json(Value::Array(users))
}

async fn create_user(State(latency): State<Duration>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    pause(latency).await;
    (StatusCode::CREATED, Json(json!({ "id": 1, "name": body["name"], "email": body["email"] })))
}

async fn server_error(State(latency): State<Duration>) -> StatusCode {
    pause(latency).await;
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Serve `app` on an ephemeral loopback port
pub async fn spawn_app(app: Router) -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("Test target error: {}", e);
        }
    });

    Ok(addr)
}

/// A port nothing listens on
pub fn refused_addr() -> Result<SocketAddr> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?)
}

/// Raw HTTP/1.1 target that answers `healthy` benchmark requests and then
/// crashes: the next benchmark request closes the listener and every open
/// connection. Probes of `/` are answered and not counted.
pub async fn spawn_crashing_target(healthy: u64) -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let served = Arc::new(AtomicU64::new(0));
    let (crash_tx, crash_rx) = watch::channel(false);
    let crash_tx = Arc::new(crash_tx);

    tokio::spawn(async move {
        let mut crashed = crash_rx.clone();
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let Ok((stream, _)) = accepted else { return };
                    let served = Arc::clone(&served);
                    let crash_tx = Arc::clone(&crash_tx);
                    let crashed = crash_rx.clone();
                    tokio::spawn(async move {
                        let _ = serve_until_crash(stream, served, healthy, crash_tx, crashed).await;
                    });
                }
                _ = wait_for_crash(&mut crashed) => return,
            }
        }
    });

    Ok(addr)
}

async fn serve_until_crash(
    stream: TcpStream,
    served: Arc<AtomicU64>,
    healthy: u64,
    crash_tx: Arc<watch::Sender<bool>>,
    mut crashed: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let (read, mut write) = stream.into_split();
    let mut reader = BufReader::new(read);

    loop {
        let request_line = tokio::select! {
            line = read_request(&mut reader) => line?,
            _ = wait_for_crash(&mut crashed) => return Ok(()),
        };
        let Some(request_line) = request_line else {
            return Ok(());
        };

        let is_probe = request_line.starts_with("GET / ");
        if !is_probe && served.fetch_add(1, Ordering::SeqCst) >= healthy {
            crash_tx.send_replace(true);
            return Ok(());
        }
        write
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ncontent-length: 2\r\n\r\nok")
            .await?;
    }
}

async fn wait_for_crash(crashed: &mut watch::Receiver<bool>) {
    while !*crashed.borrow_and_update() {
        if crashed.changed().await.is_err() {
            return;
        }
    }
}

/// Request line of the next request once its headers are read; `None` at EOF
async fn read_request(reader: &mut BufReader<OwnedReadHalf>) -> std::io::Result<Option<String>> {
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).await? == 0 {
        return Ok(None);
    }
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).await? == 0 {
            return Ok(None);
        }
        if header == "\r\n" || header == "\n" {
            return Ok(Some(request_line));
        }
    }
}

pub fn executor() -> Result<Arc<ReqwestExecutor>> {
    Ok(Arc::new(ReqwestExecutor::new(&HttpClientConfig::default())?))
}

/// Probe settings that give up within a few milliseconds
pub fn fast_probe(max_attempts: u32) -> ProbeConfig {
    ProbeConfig {
        max_attempts,
        initial_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
        ..ProbeConfig::default()
    }
}

pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}
