//! Gateway port - the REST surface the sync engine depends on
//!
//! The domain layer defines what it needs from the authoritative API and
//! the infrastructure layer provides the implementation, so the engine can
//! be exercised against a mock in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{Comment, ReactionSet};
use crate::error::DomainError;
use crate::value_objects::EntityId;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, DomainError>;

/// Confirmed reaction state for one comment, as returned by the like and
/// dislike endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentReactions {
    #[serde(default)]
    pub likes: ReactionSet,
    #[serde(default)]
    pub dislikes: ReactionSet,
}

/// Confirmed like state for one post; the endpoint answers with aggregates,
/// not a reaction array
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLikeState {
    pub like_count: u32,
    pub is_liked: bool,
}

/// The authoritative REST surface for reactions and replies
#[async_trait]
pub trait ReactionGateway: Send + Sync {
    /// Toggle the current user's like on a comment
    async fn like_comment(&self, comment_id: &EntityId) -> GatewayResult<CommentReactions>;

    /// Toggle the current user's dislike on a comment
    async fn dislike_comment(&self, comment_id: &EntityId) -> GatewayResult<CommentReactions>;

    /// Toggle the current user's like on a post
    async fn like_post(&self, post_id: &EntityId) -> GatewayResult<PostLikeState>;

    /// Report a comment for moderation
    async fn report_comment(&self, comment_id: &EntityId, reason: &str) -> GatewayResult<()>;

    /// Fetch the nested replies of one comment
    async fn fetch_replies(&self, comment_id: &EntityId) -> GatewayResult<Vec<Comment>>;
}
