//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional TOML file (loader.rs)
//!     → API_ORIGIN / CLI overrides (loader.rs)
//!     → origin normalized, validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → cloned into the forwarder and server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError, ConfigOverrides};
pub use schema::{
    GatewayConfig, ListenerConfig, LogFormat, ObservabilityConfig, UpstreamConfig,
    DEFAULT_TIMEOUT_MS, DEFAULT_UPSTREAM_ORIGIN,
};
