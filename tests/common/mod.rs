//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};

use api_gateway::config::GatewayConfig;
use api_gateway::gateway::build_client;
use api_gateway::{HttpServer, Shutdown};

/// A request as the mock upstream saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    /// Path and query exactly as received.
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What the mock upstream answers with.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
    pub body: &'static str,
    pub delay: Duration,
}

impl Canned {
    pub fn ok(body: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: Some("application/json"),
            body,
            delay: Duration::ZERO,
        }
    }
}

#[derive(Clone)]
struct MockState {
    canned: Canned,
    seen: Arc<Mutex<Vec<Captured>>>,
}

/// Handle to a running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<Captured>>>,
}

impl MockUpstream {
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.seen.lock().unwrap().clone()
    }

    pub fn single_request(&self) -> Captured {
        let seen = self.requests();
        assert_eq!(seen.len(), 1, "expected exactly one upstream call, got {seen:?}");
        seen.into_iter().next().unwrap()
    }
}

async fn record(State(state): State<MockState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    state.seen.lock().unwrap().push(Captured {
        method: parts.method,
        path_and_query: parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_owned())
            .unwrap_or_default(),
        headers: parts.headers,
        body,
    });

    let canned = state.canned;
    if !canned.delay.is_zero() {
        tokio::time::sleep(canned.delay).await;
    }

    let mut response = (canned.status, canned.body).into_response();
    // &str bodies come back as text/plain; replace or drop it per the canned reply.
    response.headers_mut().remove("content-type");
    if let Some(content_type) = canned.content_type {
        response
            .headers_mut()
            .insert("content-type", content_type.parse().unwrap());
    }
    response
}

/// Start an upstream that records every request and answers with `canned`.
pub async fn start_mock_upstream(canned: Canned) -> MockUpstream {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        canned,
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/", any(record))
        .route("/{*path}", any(record))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, seen }
}

/// Start a bare TCP upstream that hands its first connection to `serve`.
///
/// For replies an HTTP server would never produce on its own, such as a body
/// that stalls halfway.
pub async fn start_raw_upstream<F, Fut>(serve: F) -> SocketAddr
where
    F: FnOnce(TcpStream) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        serve(socket).await;
    });
    addr
}

/// Read from `socket` until the end of the request head.
pub async fn read_request_head(socket: &mut TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "connection closed before the request head ended");
        head.extend_from_slice(&buf[..n]);
    }
}

/// An address with nothing listening on it.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A running gateway bound to an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway with `/api` mounted in front of `origin`.
pub async fn start_gateway(origin: &str, timeout_ms: u64) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.origin = origin.into();
    config.upstream.mount = "/api".into();
    config.upstream.timeout_ms = timeout_ms;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, build_client().unwrap());
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestGateway { addr, shutdown }
}

/// Client used to talk to the gateway.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
