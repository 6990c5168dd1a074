//! Post entity (the subset the reaction layer cares about)

use serde::{Deserialize, Serialize};

use crate::value_objects::{EntityId, UserRef};

use super::ReactionSet;

/// A post's like state as held by one client view
///
/// `like_count` and `is_liked` are server aggregates: the like endpoint
/// confirms with them instead of a reaction array, so they are stored
/// alongside `likes` rather than always derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id", alias = "id")]
    pub id: EntityId,
    #[serde(default)]
    pub likes: ReactionSet,
    #[serde(default)]
    pub like_count: Option<u32>,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub comment_count: u32,
}

impl Post {
    /// Create a bare post with no recorded reactions
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            likes: ReactionSet::new(),
            like_count: None,
            is_liked: false,
            comment_count: 0,
        }
    }

    /// Toggle `user`'s like, keeping the aggregates in step.
    ///
    /// Returns true when the like is present after the toggle.
    pub fn toggle_like(&mut self, user: UserRef) -> bool {
        let before = self.effective_like_count();
        let liked = if self.likes.contains(user.id()) {
            self.likes.remove(user.id());
            false
        } else {
            self.likes.insert(user);
            true
        };

        self.like_count = Some(if liked { before + 1 } else { before.saturating_sub(1) });
        self.is_liked = liked;
        liked
    }

    /// Apply a confirmed `{likeCount, isLiked}` aggregate from the server,
    /// syncing the viewer's own membership in the likes set to match.
    pub fn apply_like_state(&mut self, like_count: u32, is_liked: bool, viewer: &EntityId) {
        self.like_count = Some(like_count);
        self.is_liked = is_liked;
        if is_liked {
            self.likes.insert(UserRef::new(viewer.clone()));
        } else {
            self.likes.remove(viewer);
        }
    }

    /// Replace the likes array wholesale with a broadcast payload
    pub fn replace_likes(&mut self, likes: ReactionSet, is_liked: bool) {
        self.like_count = Some(likes.len() as u32);
        self.likes = likes;
        self.is_liked = is_liked;
    }

    /// Display count: the server aggregate when known, the array length otherwise
    #[must_use]
    pub fn effective_like_count(&self) -> u32 {
        self.like_count.unwrap_or(self.likes.len() as u32)
    }
}
