//! Entity and room identifiers
//!
//! The upstream API hands out opaque object-id strings. `EntityId` wraps one
//! so ids cannot be mixed up with arbitrary strings, and `RoomId` names the
//! broadcast scope for one post.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque server-assigned entity identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create an `EntityId` from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Check if the id is empty (never produced by the server)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Broadcast scope for one post's realtime events
///
/// Rooms are ephemeral: a client is a member only while it is viewing the
/// post, and membership lives server-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Room for a single post's events
    pub fn post(post_id: &EntityId) -> Self {
        Self(format!("post:{post_id}"))
    }

    /// Get the room name as sent over the wire
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
