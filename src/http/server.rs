//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the wildcard mount
//! - Wire up middleware (request id, tracing)
//! - Hand each request to the forwarder and record its outcome
//! - Serve until the shutdown signal, then drain
//!
//! Every accepted connection is served concurrently; there is no admission
//! control or queueing in front of the forwarder. When a client disconnects
//! mid-request the handler future is dropped, which drops the outbound call
//! and disarms its deadline.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::gateway::{Forwarder, ProxyError};
use crate::http::request::{extract_inbound, request_id, MakeRequestUuid, Rejection};
use crate::lifecycle::shutdown;
use crate::observability::metrics::{self, Outcome};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
    pub mount: Arc<str>,
    pub max_body_bytes: usize,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server around an already-built outbound client.
    pub fn new(config: GatewayConfig, client: reqwest::Client) -> Self {
        let state = AppState {
            forwarder: Forwarder::new(client, &config.upstream),
            mount: Arc::from(config.upstream.mount.trim_end_matches('/')),
            max_body_bytes: config.upstream.max_body_bytes,
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let mount = state.mount.clone();
        let routes = if mount.is_empty() {
            Router::new()
                .route("/", any(forward_handler))
                .route("/{*path}", any(forward_handler))
        } else {
            Router::new()
                .route(&mount, any(forward_handler))
                .route(&format!("{mount}/"), any(forward_handler))
                .route(&format!("{mount}/{{*path}}"), any(forward_handler))
        };

        routes.with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request),
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// The router, for embedding or driving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.origin,
            mount = %self.config.upstream.mount,
            timeout_ms = self.config.upstream.timeout_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forward one request to the upstream and relay the result.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request).to_owned();
    let method = request.method().to_string();

    let inbound = match extract_inbound(request, &state.mount, state.max_body_bytes).await {
        Ok(inbound) => inbound,
        Err(Rejection::Proxy(err)) => {
            return forwarding_failed(&request_id, &method, err, start_time);
        }
        Err(rejection) => {
            let status = rejection.status();
            tracing::warn!(request_id = %request_id, method = %method, status = status.as_u16(), "Request rejected");
            metrics::record_request(&method, status.as_u16(), Outcome::from(&rejection), start_time);
            return rejection.into_response();
        }
    };

    match state.forwarder.forward(inbound).await {
        Ok(reply) => {
            metrics::record_request(&method, reply.status.as_u16(), Outcome::Completed, start_time);
            reply.into_response()
        }
        Err(err) => forwarding_failed(&request_id, &method, err, start_time),
    }
}

fn forwarding_failed(request_id: &str, method: &str, err: ProxyError, start_time: Instant) -> Response {
    tracing::warn!(
        request_id = %request_id,
        kind = err.kind().as_str(),
        detail = %err,
        "Forwarding failed"
    );
    metrics::record_request(method, 502, Outcome::from(&err), start_time);
    err.into_response()
}
