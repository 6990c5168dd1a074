//! Comment entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{EntityId, UserRef};

use super::{ReactionKind, ReactionSet};

/// A comment on a post, optionally one level deep as a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id", alias = "id")]
    pub id: EntityId,
    pub post_id: EntityId,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    pub author: UserRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_edited: bool,
    #[serde(default)]
    pub likes: ReactionSet,
    #[serde(default)]
    pub dislikes: ReactionSet,
    #[serde(default)]
    pub reply_count: u32,
    #[serde(default = "default_approved")]
    pub is_approved: bool,
    #[serde(default)]
    pub needs_moderation: bool,
    #[serde(default)]
    pub moderation_reason: Option<String>,
}

fn default_approved() -> bool {
    true
}

impl Comment {
    /// Check whether this comment is a nested reply
    #[must_use]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Whether moderation state allows display
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.is_approved && !self.needs_moderation
    }

    /// Toggle `user`'s reaction of the given kind.
    ///
    /// Enforces the at-most-one-reaction invariant: an opposite-kind
    /// reaction by the same user is removed first. Returns true when the
    /// reaction is present after the toggle.
    pub fn toggle_reaction(&mut self, user: UserRef, kind: ReactionKind) -> bool {
        let (target, opposite) = match kind {
            ReactionKind::Like => (&mut self.likes, &mut self.dislikes),
            ReactionKind::Dislike => (&mut self.dislikes, &mut self.likes),
        };

        opposite.remove(user.id());
        if target.contains(user.id()) {
            target.remove(user.id());
            false
        } else {
            target.insert(user);
            true
        }
    }

    /// Replace both reaction sets wholesale with a server payload
    pub fn replace_reactions(&mut self, likes: ReactionSet, dislikes: ReactionSet) {
        self.likes = likes;
        self.dislikes = dislikes;
    }
}
