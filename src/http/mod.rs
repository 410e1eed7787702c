//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, tracing span)
//!     → request.rs (method check, mount strip, body read)
//!     → gateway::Forwarder (one upstream call under a deadline)
//!     → response.rs (relay upstream reply, or 502 envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, Rejection, X_REQUEST_ID};
pub use server::HttpServer;
