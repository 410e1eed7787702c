//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate or keep the inbound `x-request-id`
//! - Reduce an inbound axum request to an [`InboundRequest`]
//! - Refuse methods outside the forwarded set before any upstream work
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing; it is never sent upstream
//! - Only `content-type` is read from inbound headers
//! - GET and HEAD bodies are not read at all

use axum::body::{Body, Bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::gateway::{ForwardMethod, InboundRequest, ProxyError, ResidualPath};

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a UUID v4 request id for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Read the request id stamped by the request-id layer.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Why an inbound request was not turned into an upstream call.
#[derive(Debug)]
pub enum Rejection {
    /// Method outside GET/POST/PUT/PATCH/DELETE/HEAD/OPTIONS.
    MethodNotAllowed(Method),
    /// Path is not under the gateway's mount.
    OutsideMount,
    /// Body could not be read; reported like any other forwarding failure.
    Proxy(ProxyError),
}

/// Reduce an axum request to the parts the forwarder needs.
pub async fn extract_inbound(
    request: Request<Body>,
    mount: &str,
    max_body_bytes: usize,
) -> Result<InboundRequest, Rejection> {
    let (parts, body) = request.into_parts();

    let method = ForwardMethod::try_from(&parts.method).map_err(Rejection::MethodNotAllowed)?;
    let residual =
        ResidualPath::strip_mount(parts.uri.path(), mount).ok_or(Rejection::OutsideMount)?;
    let query = parts.uri.query().map(str::to_owned);
    let content_type = parts.headers.get(CONTENT_TYPE).cloned();

    let body = if method.carries_body() {
        axum::body::to_bytes(body, max_body_bytes)
            .await
            .map_err(|e| Rejection::Proxy(ProxyError::InboundBody(e.to_string())))?
    } else {
        Bytes::new()
    };

    Ok(InboundRequest {
        method,
        residual,
        query,
        content_type,
        body,
    })
}
