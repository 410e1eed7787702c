//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (arm deadline at dispatch)
//!     → forwarder races the call against the deadline token
//!     → guard dropped on completion, failure or cancellation
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every outbound call has a deadline
//! - No retries: a failure is terminal for that inbound request

pub mod timeouts;

pub use timeouts::{DeadlineElapsed, DeadlineGuard};
