//! Client configuration structs
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub rest: RestConfig,
    pub channel: ChannelConfig,
}

/// REST API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl RestConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Realtime channel configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    pub url: String,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

/// Reconnection policy
///
/// Delays are drawn from the `[min_delay_ms, max_delay_ms]` window; attempts
/// are bounded so a dead server does not keep a background task spinning.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_reconnect_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_reconnect_attempts(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

// Default value functions
fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_reconnect_attempts() -> u32 {
    10
}

fn default_min_delay_ms() -> u64 {
    2_000
}

fn default_max_delay_ms() -> u64 {
    5_000
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            rest: RestConfig {
                base_url: env::var("PULSE_API_URL").map_err(|_| ConfigError::MissingVar("PULSE_API_URL"))?,
                request_timeout_ms: env::var("PULSE_REQUEST_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_request_timeout_ms),
            },
            channel: ChannelConfig {
                url: env::var("PULSE_CHANNEL_URL")
                    .map_err(|_| ConfigError::MissingVar("PULSE_CHANNEL_URL"))?,
                reconnect: ReconnectConfig {
                    max_attempts: env::var("PULSE_RECONNECT_ATTEMPTS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(default_reconnect_attempts),
                    min_delay_ms: env::var("PULSE_RECONNECT_MIN_DELAY_MS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(default_min_delay_ms),
                    max_delay_ms: env::var("PULSE_RECONNECT_MAX_DELAY_MS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(default_max_delay_ms),
                },
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
