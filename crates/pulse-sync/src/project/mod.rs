//! View state projection
//!
//! Render-ready aggregates derived from reconciled entity state. Nothing
//! here is stored; projections are recomputed from the single source of
//! truth on demand.

use pulse_core::{Comment, EntityId, Post, ReactionSet};

/// Check whether `user_id` has a reaction in the given set.
///
/// User references are already normalized to canonical ids at the
/// deserialization boundary, so this is a plain id comparison regardless of
/// the wire shape the reaction arrived in.
pub fn has_reacted(set: &ReactionSet, user_id: &EntityId) -> bool {
    set.contains(user_id)
}

/// Render-facing view of one comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub id: EntityId,
    pub like_count: usize,
    pub dislike_count: usize,
    pub liked_by_viewer: bool,
    pub disliked_by_viewer: bool,
    pub reply_count: u32,
    pub is_edited: bool,
    pub is_visible: bool,
}

/// Project one comment for a (possibly anonymous) viewer
pub fn project_comment(comment: &Comment, viewer: Option<&EntityId>) -> CommentView {
    CommentView {
        id: comment.id.clone(),
        like_count: comment.likes.len(),
        dislike_count: comment.dislikes.len(),
        liked_by_viewer: viewer.is_some_and(|v| has_reacted(&comment.likes, v)),
        disliked_by_viewer: viewer.is_some_and(|v| has_reacted(&comment.dislikes, v)),
        reply_count: comment.reply_count,
        is_edited: comment.is_edited,
        is_visible: comment.is_visible(),
    }
}

/// Render-facing view of one post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub id: EntityId,
    pub like_count: u32,
    pub liked_by_viewer: bool,
    pub comment_count: u32,
}

/// Project one post for a (possibly anonymous) viewer
pub fn project_post(post: &Post, viewer: Option<&EntityId>) -> PostView {
    PostView {
        id: post.id.clone(),
        like_count: post.effective_like_count(),
        // The server-fed flag and array membership can briefly disagree
        // around reconnects; either one means "liked"
        liked_by_viewer: post.is_liked || viewer.is_some_and(|v| has_reacted(&post.likes, v)),
        comment_count: post.comment_count,
    }
}
