//! Reaction records - one user's stance on a post or comment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{EntityId, UserRef};

/// Which way a reaction points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    /// The mutually exclusive counterpart
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }

    /// Wire name used by the generic `comment_updated` discriminator
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::Dislike => "DISLIKE",
        }
    }
}

/// A single user's reaction on a target entity
///
/// The server sends reaction arrays either as bare user references or as
/// full records carrying a timestamp; both deserialize into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ReactionRepr")]
pub struct Reaction {
    pub user: UserRef,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    /// Create a reaction stamped with the current time
    pub fn new(user: UserRef) -> Self {
        Self {
            user,
            created_at: Utc::now(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReactionRepr {
    Full {
        user: UserRef,
        #[serde(rename = "createdAt", default = "Utc::now")]
        created_at: DateTime<Utc>,
    },
    Bare(UserRef),
}

impl From<ReactionRepr> for Reaction {
    fn from(repr: ReactionRepr) -> Self {
        match repr {
            ReactionRepr::Full { user, created_at } => Self { user, created_at },
            ReactionRepr::Bare(user) => Self::new(user),
        }
    }
}

/// The reaction set of one kind (likes or dislikes) owned by a target
///
/// Invariant: at most one entry per user. `insert` is a no-op for a user
/// already present, so replaying the same payload cannot double-count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionSet(Vec<Reaction>);

impl ReactionSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reactions in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether `user_id` has a reaction in this set
    pub fn contains(&self, user_id: &EntityId) -> bool {
        self.0.iter().any(|r| r.user.is(user_id))
    }

    /// Add `user`'s reaction; returns false if one was already present
    pub fn insert(&mut self, user: UserRef) -> bool {
        if self.contains(user.id()) {
            return false;
        }
        self.0.push(Reaction::new(user));
        true
    }

    /// Remove `user_id`'s reaction; returns true if one was present
    pub fn remove(&mut self, user_id: &EntityId) -> bool {
        let before = self.0.len();
        self.0.retain(|r| !r.user.is(user_id));
        self.0.len() != before
    }

    /// Iterate over the reactions
    pub fn iter(&self) -> impl Iterator<Item = &Reaction> {
        self.0.iter()
    }

    /// Iterate over the reacting user ids
    pub fn user_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.0.iter().map(|r| r.user.id())
    }
}

impl From<Vec<Reaction>> for ReactionSet {
    fn from(reactions: Vec<Reaction>) -> Self {
        Self(reactions)
    }
}

impl FromIterator<UserRef> for ReactionSet {
    fn from_iter<I: IntoIterator<Item = UserRef>>(iter: I) -> Self {
        let mut set = Self::new();
        for user in iter {
            set.insert(user);
        }
        set
    }
}
