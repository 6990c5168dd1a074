//! Channel message format
//!
//! Every frame on the wire is a named event with a JSON payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use pulse_core::{ClientEvent, ServerEvent};

/// A single named-event frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// Event name (e.g. `comment_liked`)
    pub event: String,

    /// Event data payload
    #[serde(default)]
    pub data: Value,
}

impl ChannelMessage {
    /// Create a message from an event name and payload
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// The connect-time authentication handshake frame
    #[must_use]
    pub fn auth(token: Option<&str>) -> Self {
        Self::new("auth", serde_json::json!({ "token": token }))
    }

    /// Try to interpret this frame as a broadcast event.
    ///
    /// Returns `None` for unknown names and malformed payloads - those
    /// frames are dropped, never surfaced as errors.
    pub fn server_event(&self) -> Option<ServerEvent> {
        ServerEvent::parse(&self.event, &self.data)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<&ClientEvent> for ChannelMessage {
    fn from(event: &ClientEvent) -> Self {
        Self {
            event: event.event_type().to_string(),
            data: event.data(),
        }
    }
}

impl std::fmt::Display for ChannelMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChannelMessage(event={})", self.event)
    }
}
