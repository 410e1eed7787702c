//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     CLI → load + validate config → logging → metrics → client → bind → serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → stop accepting → drain in-flight → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Per-request failures never reach this layer

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
