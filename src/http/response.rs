//! Response handling.
//!
//! - Upstream replies are relayed with their status, content type and body
//! - Every forwarding failure becomes `502` with the proxy error envelope
//! - Unlisted methods get `405` with an `Allow` header

use axum::http::header::{ALLOW, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::gateway::{ForwardMethod, ProxyError, UpstreamReply};
use crate::http::request::Rejection;

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        (self.status, [(CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, Json(self.envelope())).into_response()
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::MethodNotAllowed(_) => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(ALLOW, ForwardMethod::allow_header())],
            )
                .into_response(),
            Rejection::OutsideMount => StatusCode::NOT_FOUND.into_response(),
            Rejection::Proxy(err) => err.into_response(),
        }
    }
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Rejection::OutsideMount => StatusCode::NOT_FOUND,
            Rejection::Proxy(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
