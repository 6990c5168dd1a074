//! Event bus
//!
//! Routes inbound frames to per-event-name handlers. Every `subscribe`
//! returns a `Subscription` guard; dropping the guard unsubscribes, so a
//! torn-down view cannot keep mutating state through stale callbacks.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::protocol::ChannelMessage;

type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Registry of inbound event handlers
///
/// Uses `DashMap` for concurrent access from the connection task and view
/// lifecycles.
#[derive(Default)]
pub struct EventBus {
    handlers: DashMap<String, Vec<(u64, Handler)>>,
    next_id: AtomicU64,
}

impl EventBus {
    /// Create a new bus wrapped in Arc (subscriptions hold a weak handle)
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a handler for one event name.
    ///
    /// The returned guard unsubscribes on drop and must be kept alive for
    /// as long as the subscriber wants to receive events.
    pub fn subscribe(
        self: &Arc<Self>,
        event: &str,
        handler: impl Fn(&Value) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push((id, Arc::new(handler)));

        tracing::trace!(event = %event, id = id, "Handler subscribed");

        Subscription {
            bus: Arc::downgrade(self),
            event: event.to_string(),
            id,
        }
    }

    /// Dispatch an inbound frame to all handlers registered for its name
    pub fn dispatch(&self, message: &ChannelMessage) {
        // Snapshot the handler list first: a handler may (un)subscribe
        // while we iterate, which would deadlock on the shard lock.
        let handlers: Vec<Handler> = self
            .handlers
            .get(&message.event)
            .map(|entry| entry.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        if handlers.is_empty() {
            tracing::trace!(event = %message.event, "No handlers for event");
            return;
        }

        tracing::trace!(
            event = %message.event,
            handlers = handlers.len(),
            "Dispatching event"
        );

        for handler in handlers {
            handler(&message.data);
        }
    }

    /// Number of handlers registered for an event name
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, |entry| entry.len())
    }

    fn unsubscribe(&self, event: &str, id: u64) {
        if let Some(mut entry) = self.handlers.get_mut(event) {
            entry.retain(|(handler_id, _)| *handler_id != id);
        }
        self.handlers.retain(|_, handlers| !handlers.is_empty());

        tracing::trace!(event = %event, id = id, "Handler unsubscribed");
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.handlers.len())
            .finish()
    }
}

/// RAII guard for one handler registration
pub struct Subscription {
    bus: Weak<EventBus>,
    event: String,
    id: u64,
}

impl Subscription {
    /// The event name this subscription listens to
    pub fn event(&self) -> &str {
        &self.event
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(&self.event, self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("id", &self.id)
            .finish()
    }
}
