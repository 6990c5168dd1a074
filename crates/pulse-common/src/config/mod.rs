mod client_config;

pub use client_config::{ChannelConfig, ClientConfig, ConfigError, ReconnectConfig, RestConfig};
