//! Gateway forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (method, residual path, query, content-type, body)
//!     → exchange.rs (derive OutboundRequest)
//!         → target.rs (origin + "/" + residual + query)
//!         → method.rs (GET/HEAD drop the body)
//!     → forwarder.rs (one call, one deadline)
//!     → UpstreamReply | ProxyError (error.rs)
//! ```
//!
//! # Design Decisions
//! - Exactly one outbound call per inbound request, never retried
//! - Only `content-type` crosses the boundary outbound
//! - Status, content type and body cross it back unchanged
//! - All failures share one public shape; the kind only shows in `detail`

pub mod error;
pub mod exchange;
pub mod forwarder;
pub mod method;
pub mod target;

pub use error::{ProxyError, ProxyErrorEnvelope, ProxyErrorKind, TimeoutPhase, PROXY_ERROR_CODE};
pub use exchange::{InboundRequest, OutboundRequest, UpstreamReply, DEFAULT_CONTENT_TYPE};
pub use forwarder::{build_client, Forwarder};
pub use method::ForwardMethod;
pub use target::{build_target_url, trim_origin, ResidualPath};
