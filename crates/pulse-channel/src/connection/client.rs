//! Channel client
//!
//! Owns the single realtime connection for a client session: idempotent
//! connect, bounded jittered reconnect, outbound queue, inbound dispatch,
//! and room membership. Constructed once at the application root and handed
//! down; `disconnect` releases everything so a later `connect` starts fresh.

use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;

use pulse_common::{ChannelConfig, ReconnectConfig, TokenStore};
use pulse_core::{ClientEvent, RoomId};

use crate::dispatch::{EventBus, Subscription};
use crate::protocol::ChannelMessage;
use crate::rooms::RoomTracker;

use super::connector::{Connector, MessageSink, MessageStream};

/// The realtime channel client
pub struct ChannelClient {
    config: ChannelConfig,
    tokens: Arc<dyn TokenStore>,
    connector: Arc<dyn Connector>,
    bus: Arc<EventBus>,
    rooms: Arc<RoomTracker>,
    active: Mutex<Option<Active>>,
}

/// Handles for one running connection task
struct Active {
    outbound: mpsc::UnboundedSender<ChannelMessage>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ChannelClient {
    /// Create a disconnected client
    pub fn new(
        config: ChannelConfig,
        tokens: Arc<dyn TokenStore>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            config,
            tokens,
            connector,
            bus: EventBus::new(),
            rooms: Arc::new(RoomTracker::new()),
            active: Mutex::new(None),
        }
    }

    /// The inbound event bus
    pub fn bus(&self) -> Arc<EventBus> {
        self.bus.clone()
    }

    /// Register a handler for a named inbound event
    pub fn subscribe(
        &self,
        event: &str,
        handler: impl Fn(&Value) + Send + Sync + 'static,
    ) -> Subscription {
        self.bus.subscribe(event, handler)
    }

    /// Start the connection task.
    ///
    /// Idempotent: a running connection is reused. The bearer token is read
    /// from the store inside the task at every attempt, so connecting after
    /// a login picks up the fresh token.
    pub fn connect(&self) {
        let mut active = self.active.lock();
        if let Some(existing) = active.as_ref() {
            if !existing.task.is_finished() {
                tracing::debug!("Channel already connected or connecting");
                return;
            }
        }

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(run_connection(
            ConnectionTask {
                url: self.config.url.clone(),
                reconnect: self.config.reconnect.clone(),
                tokens: self.tokens.clone(),
                connector: self.connector.clone(),
                bus: self.bus.clone(),
                rooms: self.rooms.clone(),
            },
            outbound_rx,
            shutdown_rx,
        ));

        *active = Some(Active {
            outbound: outbound_tx,
            shutdown: shutdown_tx,
            task,
        });
    }

    /// Stop the connection task and release the connection.
    ///
    /// A later `connect()` creates a fresh connection.
    pub async fn disconnect(&self) {
        let active = self.active.lock().take();
        if let Some(active) = active {
            let _ = active.shutdown.send(true);
            if let Err(err) = active.task.await {
                tracing::debug!(error = %err, "Connection task ended abruptly");
            }
            tracing::info!("Channel disconnected");
        }
    }

    /// Check whether the connection task is alive (connected or retrying)
    pub fn is_running(&self) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|a| !a.task.is_finished())
    }

    /// Emit an event.
    ///
    /// Realtime traffic is additive: with no connection the event is logged
    /// and dropped rather than surfaced as an error.
    pub fn emit(&self, event: &ClientEvent) {
        let message = ChannelMessage::from(event);
        let active = self.active.lock();
        match active.as_ref() {
            Some(a) if !a.task.is_finished() => {
                if a.outbound.send(message).is_err() {
                    tracing::debug!(event = event.event_type(), "Outbound queue closed; event dropped");
                }
            }
            _ => {
                tracing::debug!(event = event.event_type(), "Channel not connected; event dropped");
            }
        }
    }

    /// Join a post's room; duplicate joins are deduplicated client-side
    pub fn join_room(&self, room: RoomId) {
        if self.rooms.join(&room) {
            tracing::debug!(room = %room, "Joining room");
            self.emit(&ClientEvent::JoinRoom { room });
        } else {
            tracing::trace!(room = %room, "Duplicate room join ignored");
        }
    }

    /// Leave a post's room (best-effort, on view teardown)
    pub fn leave_room(&self, room: &RoomId) {
        if self.rooms.leave(room) {
            tracing::debug!(room = %room, "Leaving room");
            self.emit(&ClientEvent::LeaveRoom { room: room.clone() });
        }
    }

    /// Number of rooms this client intends to be in
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl std::fmt::Debug for ChannelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelClient")
            .field("url", &self.config.url)
            .field("running", &self.is_running())
            .field("rooms", &self.rooms.len())
            .finish()
    }
}

/// Everything the connection task needs, detached from the client
struct ConnectionTask {
    url: String,
    reconnect: ReconnectConfig,
    tokens: Arc<dyn TokenStore>,
    connector: Arc<dyn Connector>,
    bus: Arc<EventBus>,
    rooms: Arc<RoomTracker>,
}

async fn run_connection(
    task: ConnectionTask,
    mut outbound: mpsc::UnboundedReceiver<ChannelMessage>,
    mut shutdown: watch::Receiver<bool>,
) {
    let session_id = Uuid::new_v4();
    let mut attempts = 0u32;

    loop {
        if should_stop(&shutdown) {
            break;
        }

        // Re-read the token on every attempt: a token refreshed after the
        // original connection must win on reconnect.
        let token = task.tokens.bearer_token();

        match task.connector.connect(&task.url, token.as_deref()).await {
            Ok((mut sink, mut stream)) => {
                attempts = 0;
                tracing::info!(session_id = %session_id, "Channel connected");

                // A fresh transport has no server-side membership
                for room in task.rooms.joined() {
                    let frame = ChannelMessage::from(&ClientEvent::JoinRoom { room });
                    if let Err(err) = sink.send(frame).await {
                        tracing::warn!(error = %err, "Room re-join failed after connect");
                    }
                }

                let reconnect =
                    drive(&task.bus, &mut sink, &mut stream, &mut outbound, &mut shutdown).await;
                if !reconnect {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(session_id = %session_id, error = %err, "Channel connect failed");
            }
        }

        attempts += 1;
        if attempts >= task.reconnect.max_attempts {
            tracing::error!(
                session_id = %session_id,
                attempts = attempts,
                "Channel reconnect attempts exhausted"
            );
            break;
        }

        let delay = reconnect_delay(&task.reconnect);
        tracing::debug!(
            session_id = %session_id,
            attempt = attempts,
            delay_ms = delay.as_millis() as u64,
            "Retrying channel connect"
        );
        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => {}
        }
    }

    tracing::debug!(session_id = %session_id, "Connection task ended");
}

fn should_stop(shutdown: &watch::Receiver<bool>) -> bool {
    // Sender gone means the client itself was dropped
    *shutdown.borrow() || shutdown.has_changed().is_err()
}

/// Pump one live connection. Returns true when the caller should reconnect.
async fn drive(
    bus: &EventBus,
    sink: &mut MessageSink,
    stream: &mut MessageStream,
    outbound: &mut mpsc::UnboundedReceiver<ChannelMessage>,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                let _ = sink.close().await;
                return false;
            }
            out = outbound.recv() => match out {
                Some(message) => {
                    if let Err(err) = sink.send(message).await {
                        tracing::warn!(error = %err, "Channel send failed");
                        return true;
                    }
                }
                // Client dropped its handle; nothing left to serve
                None => return false,
            },
            frame = stream.next() => match frame {
                Some(Ok(message)) => bus.dispatch(&message),
                Some(Err(err)) => {
                    tracing::warn!(error = %err, "Channel receive failed");
                    return true;
                }
                None => {
                    tracing::info!("Channel closed by server");
                    return true;
                }
            },
        }
    }
}

fn reconnect_delay(config: &ReconnectConfig) -> Duration {
    let min = config.min_delay_ms;
    let max = config.max_delay_ms.max(min);
    let ms = if max > min {
        rand::thread_rng().gen_range(min..=max)
    } else {
        min
    };
    Duration::from_millis(ms)
}
