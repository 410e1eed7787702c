//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, outcome
//! - `gateway_request_duration_seconds` (histogram): latency by method, outcome
//!
//! Recording goes through the `metrics` facade and is a no-op until an
//! exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::gateway::{ProxyError, ProxyErrorKind};
use crate::http::Rejection;

/// How a request left the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Upstream answered; its status was relayed.
    Completed,
    /// Deadline fired before the upstream finished.
    TimedOut,
    /// Any other forwarding failure.
    Failed,
    /// Refused before dispatch (method, mount).
    Rejected,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::TimedOut => "timed_out",
            Outcome::Failed => "failed",
            Outcome::Rejected => "rejected",
        }
    }
}

impl From<&ProxyError> for Outcome {
    fn from(err: &ProxyError) -> Self {
        match err.kind() {
            ProxyErrorKind::TimedOut => Outcome::TimedOut,
            _ => Outcome::Failed,
        }
    }
}

impl From<&Rejection> for Outcome {
    fn from(rejection: &Rejection) -> Self {
        match rejection {
            Rejection::Proxy(err) => Outcome::from(err),
            Rejection::MethodNotAllowed(_) | Rejection::OutsideMount => Outcome::Rejected,
        }
    }
}

/// Install the Prometheus exporter with its own scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, outcome: Outcome, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);

    metrics::histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string(),
        "outcome" => outcome.as_str()
    )
    .record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::TimeoutPhase;
    use std::time::Duration;

    #[test]
    fn outcome_from_error_kind() {
        let timeout = ProxyError::TimedOut {
            after: Duration::from_millis(1),
            phase: TimeoutPhase::ReadingBody,
        };
        assert_eq!(Outcome::from(&timeout), Outcome::TimedOut);
        assert_eq!(
            Outcome::from(&ProxyError::Unreachable("dns".into())),
            Outcome::Failed
        );
    }

    #[test]
    fn unreadable_body_counts_as_failed_not_rejected() {
        let body = Rejection::Proxy(ProxyError::InboundBody("length limit exceeded".into()));
        assert_eq!(Outcome::from(&body), Outcome::Failed);
        assert_eq!(
            Outcome::from(&Rejection::MethodNotAllowed(axum::http::Method::TRACE)),
            Outcome::Rejected
        );
        assert_eq!(Outcome::from(&Rejection::OutsideMount), Outcome::Rejected);
    }

    #[test]
    fn recording_without_exporter_is_harmless() {
        record_request("GET", 200, Outcome::Completed, Instant::now());
    }
}
