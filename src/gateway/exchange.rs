//! Request-scoped values flowing through one forwarding operation.

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};

use crate::gateway::method::ForwardMethod;
use crate::gateway::target::{build_target_url, ResidualPath};

/// Content type used outbound when the caller sent none, and on replies
/// when the upstream sent none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// What the gateway reads from an inbound request. Every other header is ignored.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: ForwardMethod,
    pub residual: ResidualPath,
    /// Raw query text after `?`, untouched.
    pub query: Option<String>,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// The single upstream call derived from an [`InboundRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: ForwardMethod,
    pub url: String,
    pub content_type: HeaderValue,
    /// `None` for GET and HEAD.
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    pub fn derive(origin: &str, inbound: InboundRequest) -> Self {
        let url = build_target_url(origin, &inbound.residual, inbound.query.as_deref());
        let content_type = inbound
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        let body = inbound.method.carries_body().then_some(inbound.body);

        Self {
            method: inbound.method,
            url,
            content_type,
            body,
        }
    }
}

/// A completed upstream response, relayed verbatim.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub body: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound(method: ForwardMethod, body: &'static [u8]) -> InboundRequest {
        InboundRequest {
            method,
            residual: ResidualPath::from_segments(["deals"]),
            query: None,
            content_type: None,
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn get_and_head_carry_no_body() {
        for method in [ForwardMethod::Get, ForwardMethod::Head] {
            let out = OutboundRequest::derive("http://up", inbound(method, b"ignored"));
            assert_eq!(out.body, None);
        }
    }

    #[test]
    fn other_methods_carry_exact_bytes() {
        let payload: &'static [u8] = b"\x00{\"x\":1}\xff";
        for method in ForwardMethod::ALL.into_iter().filter(|m| m.carries_body()) {
            let out = OutboundRequest::derive("http://up", inbound(method, payload));
            assert_eq!(out.body.as_deref(), Some(payload));
        }
    }

    #[test]
    fn content_type_defaults_to_json() {
        let out = OutboundRequest::derive("http://up", inbound(ForwardMethod::Post, b"{\"x\":1}"));
        assert_eq!(out.content_type, DEFAULT_CONTENT_TYPE);
        assert_eq!(out.url, "http://up/deals");
    }

    #[test]
    fn inbound_content_type_is_kept() {
        let mut req = inbound(ForwardMethod::Put, b"a=1");
        req.content_type = Some(HeaderValue::from_static("application/x-www-form-urlencoded"));
        let out = OutboundRequest::derive("http://up/", req);
        assert_eq!(out.content_type, "application/x-www-form-urlencoded");
    }
}
