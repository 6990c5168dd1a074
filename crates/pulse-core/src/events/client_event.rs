//! Outbound channel emissions
//!
//! Sent after a mutation is server-confirmed so other room subscribers
//! converge, plus the room membership handshakes.

use serde_json::{json, Value};

use crate::entities::ReactionSet;
use crate::value_objects::{EntityId, RoomId};

/// Everything this client emits over the realtime channel
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    JoinRoom {
        room: RoomId,
    },
    LeaveRoom {
        room: RoomId,
    },
    CommentLike {
        post_id: EntityId,
        comment_id: EntityId,
        user_id: EntityId,
    },
    CommentDislike {
        post_id: EntityId,
        comment_id: EntityId,
        user_id: EntityId,
    },
    PostLike {
        post_id: EntityId,
        user_id: EntityId,
        likes: ReactionSet,
        is_liked: bool,
    },
    CommentReport {
        post_id: EntityId,
        comment_id: EntityId,
        user_id: EntityId,
        reason: String,
    },
}

impl ClientEvent {
    /// Get the event name sent on the wire
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::JoinRoom { .. } => "join_room",
            Self::LeaveRoom { .. } => "leave_room",
            Self::CommentLike { .. } => "comment_like",
            Self::CommentDislike { .. } => "comment_dislike",
            Self::PostLike { .. } => "post_like",
            Self::CommentReport { .. } => "comment_report",
        }
    }

    /// Build the event's JSON payload
    pub fn data(&self) -> Value {
        match self {
            Self::JoinRoom { room } | Self::LeaveRoom { room } => json!({ "room": room }),
            Self::CommentLike {
                post_id,
                comment_id,
                user_id,
            }
            | Self::CommentDislike {
                post_id,
                comment_id,
                user_id,
            } => json!({
                "postId": post_id,
                "commentId": comment_id,
                "userId": user_id,
            }),
            Self::PostLike {
                post_id,
                user_id,
                likes,
                is_liked,
            } => json!({
                "postId": post_id,
                "userId": user_id,
                "likes": likes,
                "isLiked": is_liked,
            }),
            Self::CommentReport {
                post_id,
                comment_id,
                user_id,
                reason,
            } => json!({
                "postId": post_id,
                "commentId": comment_id,
                "userId": user_id,
                "reason": reason,
            }),
        }
    }
}
