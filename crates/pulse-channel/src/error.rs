//! Channel error types

use thiserror::Error;

/// Errors from the realtime channel layer
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel closed")]
    Closed,

    #[error("Not connected")]
    NotConnected,

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Reconnect attempts exhausted after {attempts} tries")]
    RetriesExhausted { attempts: u32 },
}

impl ChannelError {
    /// Whether another connection attempt could still succeed
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Closed | Self::Transport(_) | Self::Handshake(_))
    }
}
