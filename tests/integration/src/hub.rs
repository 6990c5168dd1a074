//! In-memory channel hub
//!
//! Stands in for the server side of the realtime channel: accepts
//! connections through the `Connector` seam, tracks room membership, and
//! fans confirmed mutations out to the other members of the room - the same
//! shape of traffic the production server produces.

use async_trait::async_trait;
use futures::channel::mpsc as fmpsc;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use pulse_channel::{ChannelError, ChannelMessage, Connector, MessageSink, MessageStream};

type Members = HashMap<u64, fmpsc::UnboundedSender<ChannelMessage>>;

/// Fake server hub shared by every client in a test
#[derive(Clone, Default)]
pub struct FakeHub {
    inner: Arc<HubInner>,
}

#[derive(Default)]
struct HubInner {
    rooms: Mutex<HashMap<String, Members>>,
    tokens: Mutex<Vec<Option<String>>>,
    frames: Mutex<Vec<ChannelMessage>>,
    next_conn: AtomicU64,
}

impl FakeHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every client-to-server frame seen so far
    pub fn frames(&self) -> Vec<ChannelMessage> {
        self.inner.frames.lock().clone()
    }

    /// Tokens presented at connect time, in connection order
    pub fn tokens(&self) -> Vec<Option<String>> {
        self.inner.tokens.lock().clone()
    }

    /// Current member count of a room
    pub fn room_size(&self, room: &str) -> usize {
        self.inner.rooms.lock().get(room).map_or(0, Members::len)
    }

    /// Push a server-originated broadcast to every member of a room
    pub fn broadcast(&self, room: &str, message: &ChannelMessage) {
        self.inner.broadcast_excluding(room, None, message);
    }
}

#[async_trait]
impl Connector for FakeHub {
    async fn connect(
        &self,
        _url: &str,
        token: Option<&str>,
    ) -> Result<(MessageSink, MessageStream), ChannelError> {
        self.inner.tokens.lock().push(token.map(String::from));

        let conn_id = self.inner.next_conn.fetch_add(1, Ordering::Relaxed);
        let (client_tx, from_client) = fmpsc::unbounded();
        let (to_client, client_rx) = fmpsc::unbounded();

        // The hub owns a serving task per accepted connection
        tokio::spawn(self.inner.clone().serve(conn_id, from_client, to_client));

        let sink: MessageSink =
            Box::pin(client_tx.sink_map_err(|e| ChannelError::Transport(e.to_string())));
        let stream: MessageStream = Box::pin(client_rx.map(Ok));
        Ok((sink, stream))
    }
}

impl HubInner {
    async fn serve(
        self: Arc<Self>,
        conn_id: u64,
        mut from_client: fmpsc::UnboundedReceiver<ChannelMessage>,
        to_client: fmpsc::UnboundedSender<ChannelMessage>,
    ) {
        while let Some(frame) = from_client.next().await {
            self.frames.lock().push(frame.clone());

            match frame.event.as_str() {
                "join_room" => {
                    if let Some(name) = frame.data["room"].as_str() {
                        self.rooms
                            .lock()
                            .entry(name.to_string())
                            .or_default()
                            .insert(conn_id, to_client.clone());
                    }
                }
                "leave_room" => {
                    if let Some(name) = frame.data["room"].as_str() {
                        if let Some(members) = self.rooms.lock().get_mut(name) {
                            members.remove(&conn_id);
                        }
                    }
                }
                _ => self.fan_out(conn_id, &frame),
            }
        }

        // Transport gone: membership evaporates with the connection
        for members in self.rooms.lock().values_mut() {
            members.remove(&conn_id);
        }
    }

    /// Server-side translation of a confirmed mutation into its broadcast,
    /// mirroring what the production server emits to the post's room
    fn fan_out(&self, conn_id: u64, frame: &ChannelMessage) {
        let data = &frame.data;
        let room = |post_id: &str| format!("post:{post_id}");

        match frame.event.as_str() {
            "comment_like" | "comment_dislike" => {
                let (Some(post_id), Some(comment_id), Some(user_id)) = (
                    data["postId"].as_str(),
                    data["commentId"].as_str(),
                    data["userId"].as_str(),
                ) else {
                    return;
                };
                let (event, likes, dislikes) = if frame.event == "comment_like" {
                    ("comment_liked", json!([user_id]), json!([]))
                } else {
                    ("comment_disliked", json!([]), json!([user_id]))
                };
                self.broadcast_excluding(
                    &room(post_id),
                    Some(conn_id),
                    &ChannelMessage::new(
                        event,
                        json!({
                            "postId": post_id,
                            "commentId": comment_id,
                            "likes": likes,
                            "dislikes": dislikes,
                        }),
                    ),
                );
            }
            "post_like" => {
                let Some(post_id) = data["postId"].as_str() else {
                    return;
                };
                // The production server computes `isLiked` per recipient;
                // the hub cannot know recipients' identities, so receivers
                // derive liked-ness from the likes array instead
                self.broadcast_excluding(
                    &room(post_id),
                    Some(conn_id),
                    &ChannelMessage::new(
                        "post_liked",
                        json!({
                            "postId": post_id,
                            "userId": data["userId"],
                            "likes": data["likes"],
                        }),
                    ),
                );
            }
            "comment_report" => {
                let Some(post_id) = data["postId"].as_str() else {
                    return;
                };
                self.broadcast_excluding(
                    &room(post_id),
                    Some(conn_id),
                    &ChannelMessage::new(
                        "comment_reported",
                        json!({
                            "commentId": data["commentId"],
                            "userId": data["userId"],
                            "reason": data["reason"],
                        }),
                    ),
                );
            }
            _ => {}
        }
    }

    fn broadcast_excluding(&self, room: &str, exclude: Option<u64>, message: &ChannelMessage) {
        let rooms = self.rooms.lock();
        let Some(members) = rooms.get(room) else {
            return;
        };
        for (conn_id, sender) in members {
            if Some(*conn_id) == exclude {
                continue;
            }
            let _ = sender.unbounded_send(message.clone());
        }
    }
}
