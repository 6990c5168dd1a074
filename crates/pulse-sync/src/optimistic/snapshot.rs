//! Pre-mutation snapshots
//!
//! Each mutation invocation captures its own snapshot immediately before the
//! optimistic apply and rolls back to exactly that state on failure. Scoping
//! the snapshot to the invocation keeps rapid repeated clicks from clobbering
//! each other's rollback points.

use pulse_core::{Comment, Post};

use crate::store::ViewState;

/// Full pre-mutation copy of one comment
#[derive(Debug, Clone)]
pub(crate) struct CommentSnapshot {
    comment: Comment,
}

impl CommentSnapshot {
    pub(crate) fn capture(comment: &Comment) -> Self {
        Self {
            comment: comment.clone(),
        }
    }

    /// Restore the captured state, if the comment still exists
    pub(crate) fn restore(self, state: &mut ViewState) {
        if let Some(slot) = state.comment_mut(&self.comment.id) {
            *slot = self.comment;
        }
    }
}

/// Full pre-mutation copy of one post
#[derive(Debug, Clone)]
pub(crate) struct PostSnapshot {
    post: Post,
}

impl PostSnapshot {
    pub(crate) fn capture(post: &Post) -> Self {
        Self { post: post.clone() }
    }

    pub(crate) fn restore(self, state: &mut ViewState) {
        if let Some(slot) = state.post_mut(&self.post.id) {
            *slot = self.post;
        }
    }
}
