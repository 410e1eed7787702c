//! API forwarding gateway.
//!
//! Accepts any request under a mount point, replays it against a single
//! upstream origin under a hard deadline, and relays the upstream's status,
//! content type and body, or a uniform `proxy_error` envelope on failure.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::GatewayConfig;
pub use gateway::{Forwarder, ProxyError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
