//! The outbound half of the gateway.
//!
//! One inbound request becomes exactly one upstream call:
//!
//! ```text
//! Idle ──dispatch──▶ Dispatched ──▶ Completed   (status, content-type, body relayed)
//!                         ├──────▶ TimedOut    ─┐
//!                         └──────▶ Failed      ─┴─▶ ProxyError (502 envelope)
//! ```
//!
//! There is no retry edge. The deadline is armed at dispatch and covers
//! headers and body together.

use std::time::{Duration, Instant};

use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;

use crate::config::UpstreamConfig;
use crate::gateway::error::{ProxyError, TimeoutPhase};
use crate::gateway::exchange::{InboundRequest, OutboundRequest, UpstreamReply, DEFAULT_CONTENT_TYPE};
use crate::gateway::target::trim_origin;
use crate::resilience::{DeadlineElapsed, DeadlineGuard};

/// Build the outbound HTTP client used for every forwarded call.
///
/// Ambient `HTTP_PROXY`-style variables are ignored: the origin is the only
/// place requests go.
pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().no_proxy().build()
}

/// Forwards requests to a single upstream origin.
///
/// Cheap to clone; holds only the shared client and read-only settings.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    origin: String,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(client: reqwest::Client, upstream: &UpstreamConfig) -> Self {
        Self::with_timeout(
            client,
            &upstream.origin,
            Duration::from_millis(upstream.timeout_ms),
        )
    }

    pub fn with_timeout(client: reqwest::Client, origin: &str, timeout: Duration) -> Self {
        Self {
            client,
            origin: trim_origin(origin).to_owned(),
            timeout,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Derive the outbound request for `inbound` without sending it.
    pub fn prepare(&self, inbound: InboundRequest) -> OutboundRequest {
        OutboundRequest::derive(&self.origin, inbound)
    }

    /// Issue the upstream call and relay its result.
    pub async fn forward(&self, inbound: InboundRequest) -> Result<UpstreamReply, ProxyError> {
        let outbound = self.prepare(inbound);
        self.dispatch(outbound).await
    }

    /// Send an already-derived request under a fresh deadline.
    pub async fn dispatch(&self, outbound: OutboundRequest) -> Result<UpstreamReply, ProxyError> {
        let started = Instant::now();
        let deadline = DeadlineGuard::arm(self.timeout);

        tracing::debug!(
            method = %outbound.method,
            upstream_url = %outbound.url,
            timeout_ms = self.timeout.as_millis() as u64,
            "Dispatching upstream request"
        );

        let url = outbound.url;
        let mut request = self
            .client
            .request(outbound.method.to_http(), url.as_str())
            .header(CONTENT_TYPE, outbound.content_type);
        if let Some(body) = outbound.body {
            request = request.body(body);
        }

        let response = match deadline.run(request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) if err.is_timeout() => {
                return Err(timed_out(self.timeout, TimeoutPhase::AwaitingHeaders));
            }
            Ok(Err(err)) => return Err(ProxyError::from_send(err, &url)),
            Err(DeadlineElapsed(after)) => {
                return Err(timed_out(after, TimeoutPhase::AwaitingHeaders));
            }
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

        let body = match deadline.run(response.bytes()).await {
            Ok(Ok(body)) => body,
            Ok(Err(err)) if err.is_timeout() => {
                return Err(timed_out(self.timeout, TimeoutPhase::ReadingBody));
            }
            Ok(Err(err)) => return Err(ProxyError::from_body(err)),
            Err(DeadlineElapsed(after)) => {
                return Err(timed_out(after, TimeoutPhase::ReadingBody));
            }
        };

        tracing::debug!(
            upstream_url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Upstream request completed"
        );

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}

fn timed_out(after: Duration, phase: TimeoutPhase) -> ProxyError {
    ProxyError::TimedOut { after, phase }
}
