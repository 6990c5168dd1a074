//! Room membership tracker
//!
//! Tracks which rooms this client intends to be in. The server owns actual
//! membership; this set exists to deduplicate joins, to drive best-effort
//! leaves on teardown, and to re-issue joins after a reconnect (a fresh
//! transport has no server-side membership).

use parking_lot::Mutex;
use std::collections::HashSet;

use pulse_core::RoomId;

/// Client-side view of intended room membership
#[derive(Debug, Default)]
pub struct RoomTracker {
    joined: Mutex<HashSet<RoomId>>,
}

impl RoomTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a join; returns false for a duplicate (no emit needed)
    pub fn join(&self, room: &RoomId) -> bool {
        self.joined.lock().insert(room.clone())
    }

    /// Record a leave; returns false when the room was not joined
    pub fn leave(&self, room: &RoomId) -> bool {
        self.joined.lock().remove(room)
    }

    /// Check membership intent
    pub fn contains(&self, room: &RoomId) -> bool {
        self.joined.lock().contains(room)
    }

    /// All rooms this client intends to be in (for post-reconnect re-join)
    pub fn joined(&self) -> Vec<RoomId> {
        self.joined.lock().iter().cloned().collect()
    }

    /// Number of tracked rooms
    pub fn len(&self) -> usize {
        self.joined.lock().len()
    }

    /// Check if no rooms are tracked
    pub fn is_empty(&self) -> bool {
        self.joined.lock().is_empty()
    }

    /// Forget all rooms
    pub fn clear(&self) {
        self.joined.lock().clear();
    }
}
