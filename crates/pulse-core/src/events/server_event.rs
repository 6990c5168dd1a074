//! Inbound broadcast events
//!
//! Everything another client's confirmed mutation (or an admin action) can
//! push at us over the realtime channel. Delivery is at-least-once with no
//! ordering guarantee, so every payload carries full replacement state for
//! the fields it covers, never a delta.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::ReactionSet;
use crate::value_objects::EntityId;

/// All broadcast events this client consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    PostLiked(PostLikedEvent),
    CommentLiked(CommentReactionEvent),
    CommentDisliked(CommentReactionEvent),
    CommentUpdated(CommentUpdatedEvent),
    CommentDeleted(CommentDeletedEvent),
    CommentReported(CommentReportedEvent),
    CommentApproved(CommentApprovedEvent),
}

impl ServerEvent {
    /// Every event name this client subscribes to
    pub const NAMES: [&'static str; 7] = [
        "post_liked",
        "comment_liked",
        "comment_disliked",
        "comment_updated",
        "comment_deleted",
        "comment_reported",
        "comment_approved",
    ];

    /// Parse a named event payload.
    ///
    /// Returns `None` for unknown event names and for malformed payloads:
    /// a broadcast we cannot read is dropped, never an error.
    pub fn parse(event: &str, data: &Value) -> Option<Self> {
        let parsed = match event {
            "post_liked" => Self::PostLiked(serde_json::from_value(data.clone()).ok()?),
            "comment_liked" => Self::CommentLiked(serde_json::from_value(data.clone()).ok()?),
            "comment_disliked" => Self::CommentDisliked(serde_json::from_value(data.clone()).ok()?),
            "comment_updated" => Self::CommentUpdated(serde_json::from_value(data.clone()).ok()?),
            "comment_deleted" => Self::CommentDeleted(serde_json::from_value(data.clone()).ok()?),
            "comment_reported" => Self::CommentReported(serde_json::from_value(data.clone()).ok()?),
            "comment_approved" => Self::CommentApproved(serde_json::from_value(data.clone()).ok()?),
            _ => return None,
        };
        Some(parsed)
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PostLiked(_) => "post_liked",
            Self::CommentLiked(_) => "comment_liked",
            Self::CommentDisliked(_) => "comment_disliked",
            Self::CommentUpdated(_) => "comment_updated",
            Self::CommentDeleted(_) => "comment_deleted",
            Self::CommentReported(_) => "comment_reported",
            Self::CommentApproved(_) => "comment_approved",
        }
    }

    /// The entity id the event targets
    pub fn target_id(&self) -> &EntityId {
        match self {
            Self::PostLiked(e) => &e.post_id,
            Self::CommentLiked(e) | Self::CommentDisliked(e) => &e.comment_id,
            Self::CommentUpdated(e) => &e.comment_id,
            Self::CommentDeleted(e) => &e.comment_id,
            Self::CommentReported(e) => &e.comment_id,
            Self::CommentApproved(e) => &e.comment_id,
        }
    }
}

/// Discriminator carried by the generic `comment_updated` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateKind {
    Like,
    Dislike,
    Edit,
    #[serde(other)]
    Other,
}

// ============================================================================
// Event Payloads
// ============================================================================

/// Another viewer liked or unliked a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLikedEvent {
    pub post_id: EntityId,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub likes: ReactionSet,
    #[serde(default)]
    pub like_count: Option<u32>,
    #[serde(default)]
    pub is_liked: bool,
}

/// Replacement reaction state for one comment (liked and disliked share it)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentReactionEvent {
    #[serde(default)]
    pub post_id: Option<EntityId>,
    pub comment_id: EntityId,
    #[serde(default)]
    pub likes: ReactionSet,
    #[serde(default)]
    pub dislikes: ReactionSet,
}

/// Generic comment change; `type` says which field group it carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpdatedEvent {
    pub comment_id: EntityId,
    #[serde(rename = "type", default)]
    pub kind: Option<UpdateKind>,
    #[serde(default)]
    pub likes: Option<ReactionSet>,
    #[serde(default)]
    pub dislikes: Option<ReactionSet>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub is_edited: Option<bool>,
}

/// A comment was deleted; descendant cleanup is server-authoritative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDeletedEvent {
    #[serde(default)]
    pub post_id: Option<EntityId>,
    pub comment_id: EntityId,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
}

/// A comment was reported and is now pending moderation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentReportedEvent {
    pub comment_id: EntityId,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Moderation resolved a comment's visibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentApprovedEvent {
    pub comment_id: EntityId,
    #[serde(default = "default_approved")]
    pub is_approved: bool,
}

fn default_approved() -> bool {
    true
}
