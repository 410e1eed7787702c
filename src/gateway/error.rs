//! Forwarding failures and the envelope they are reported in.
//!
//! Internally every failure has a kind; callers only ever see
//! `502 {"error":"proxy_error","detail":"..."}`.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Fixed `error` field of the envelope.
pub const PROXY_ERROR_CODE: &str = "proxy_error";

/// Where the deadline caught the outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPhase {
    AwaitingHeaders,
    ReadingBody,
}

impl fmt::Display for TimeoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutPhase::AwaitingHeaders => f.write_str("awaiting response headers"),
            TimeoutPhase::ReadingBody => f.write_str("reading response body"),
        }
    }
}

/// Closed enumeration of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyErrorKind {
    InvalidTarget,
    Unreachable,
    TimedOut,
    UpstreamStream,
    InboundBody,
    Request,
}

impl ProxyErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyErrorKind::InvalidTarget => "invalid_target",
            ProxyErrorKind::Unreachable => "unreachable",
            ProxyErrorKind::TimedOut => "timed_out",
            ProxyErrorKind::UpstreamStream => "upstream_stream",
            ProxyErrorKind::InboundBody => "inbound_body",
            ProxyErrorKind::Request => "request",
        }
    }
}

/// A forwarding attempt that did not produce an upstream response.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid upstream target `{url}`: {detail}")]
    InvalidTarget { url: String, detail: String },

    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    #[error("upstream timed out after {}ms while {phase}", .after.as_millis())]
    TimedOut { after: Duration, phase: TimeoutPhase },

    #[error("upstream response stream failed: {0}")]
    UpstreamStream(String),

    #[error("could not read request body: {0}")]
    InboundBody(String),

    #[error("upstream request failed: {0}")]
    Request(String),
}

impl ProxyError {
    pub fn kind(&self) -> ProxyErrorKind {
        match self {
            ProxyError::InvalidTarget { .. } => ProxyErrorKind::InvalidTarget,
            ProxyError::Unreachable(_) => ProxyErrorKind::Unreachable,
            ProxyError::TimedOut { .. } => ProxyErrorKind::TimedOut,
            ProxyError::UpstreamStream(_) => ProxyErrorKind::UpstreamStream,
            ProxyError::InboundBody(_) => ProxyErrorKind::InboundBody,
            ProxyError::Request(_) => ProxyErrorKind::Request,
        }
    }

    /// Classify a client error raised while sending or awaiting headers.
    pub fn from_send(err: reqwest::Error, url: &str) -> Self {
        if err.is_builder() {
            ProxyError::InvalidTarget {
                url: url.to_owned(),
                detail: error_chain(&err),
            }
        } else if err.is_connect() {
            ProxyError::Unreachable(error_chain(&err))
        } else {
            ProxyError::Request(error_chain(&err))
        }
    }

    /// Classify a client error raised while reading the response body.
    pub fn from_body(err: reqwest::Error) -> Self {
        ProxyError::UpstreamStream(error_chain(&err))
    }

    pub fn envelope(&self) -> ProxyErrorEnvelope {
        ProxyErrorEnvelope {
            error: PROXY_ERROR_CODE,
            detail: self.to_string(),
        }
    }
}

/// The JSON body returned for every forwarding failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProxyErrorEnvelope {
    pub error: &'static str,
    pub detail: String,
}

/// reqwest's Display stops at the outermost error; DNS and TLS causes live in `source()`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
