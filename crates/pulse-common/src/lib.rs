//! # pulse-common
//!
//! Shared utilities including configuration, error handling, the auth
//! session ports, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Identity, MemoryAuthSession, TokenStore};
pub use config::{ChannelConfig, ClientConfig, ConfigError, ReconnectConfig, RestConfig};
pub use error::{AppError, AppResult};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
