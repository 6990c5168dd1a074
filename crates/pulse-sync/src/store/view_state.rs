//! Per-view client state
//!
//! Server baseline plus locally-applied optimistic deltas plus broadcast
//! deltas, keyed by entity id. Owned by whichever view is currently mounted;
//! there is no cross-view shared cache, so state converges through the
//! server, not through other local views.

use std::collections::HashMap;

use pulse_core::{Comment, EntityId, Post};

/// One mounted view's entity state
#[derive(Debug, Default)]
pub struct ViewState {
    posts: HashMap<EntityId, Post>,
    comments: HashMap<EntityId, Comment>,
    /// Lazily-fetched reply lists, keyed by parent comment id. Never merged
    /// into the flat comment map: collapsed threads stay out of the main
    /// reconciliation surface.
    replies: HashMap<EntityId, Vec<Comment>>,
}

impl ViewState {
    /// Create an empty view state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a server-fetched post baseline
    pub fn seed_post(&mut self, post: Post) {
        self.posts.insert(post.id.clone(), post);
    }

    /// Install a server-fetched flat comment list
    pub fn seed_comments(&mut self, comments: Vec<Comment>) {
        for comment in comments {
            self.comments.insert(comment.id.clone(), comment);
        }
    }

    /// Look up a post
    pub fn post(&self, id: &EntityId) -> Option<&Post> {
        self.posts.get(id)
    }

    /// Look up a post for mutation
    pub fn post_mut(&mut self, id: &EntityId) -> Option<&mut Post> {
        self.posts.get_mut(id)
    }

    /// Look up a comment in the flat list or any cached reply list
    pub fn comment(&self, id: &EntityId) -> Option<&Comment> {
        self.comments
            .get(id)
            .or_else(|| self.replies.values().flatten().find(|c| &c.id == id))
    }

    /// Look up a comment for mutation, searching reply caches too
    pub fn comment_mut(&mut self, id: &EntityId) -> Option<&mut Comment> {
        if self.comments.contains_key(id) {
            return self.comments.get_mut(id);
        }
        self.replies
            .values_mut()
            .flatten()
            .find(|c| &c.id == id)
    }

    /// Cached replies for a parent comment, if fetched
    pub fn replies(&self, parent_id: &EntityId) -> Option<&[Comment]> {
        self.replies.get(parent_id).map(Vec::as_slice)
    }

    /// Install (or refresh) the reply cache for one parent
    pub fn cache_replies(&mut self, parent_id: EntityId, replies: Vec<Comment>) {
        self.replies.insert(parent_id, replies);
    }

    /// Remove a comment wherever it lives and drop its reply cache.
    ///
    /// Only the named comment is removed: descendant cascade is
    /// server-authoritative and arrives as further delete events.
    pub fn remove_comment(&mut self, id: &EntityId) -> bool {
        let mut removed = self.comments.remove(id).is_some();

        for list in self.replies.values_mut() {
            let before = list.len();
            list.retain(|c| &c.id != id);
            removed |= list.len() != before;
        }

        self.replies.remove(id);
        removed
    }

    /// Number of comments in the flat list
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Iterate the flat comment list
    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: &str, parent: Option<&str>) -> Comment {
        serde_json::from_str(&format!(
            r#"{{
                "_id": "{id}",
                "postId": "p1",
                "parentId": {parent},
                "author": "a1",
                "content": "text",
                "createdAt": "2025-03-01T12:00:00Z"
            }}"#,
            parent = parent.map_or("null".to_string(), |p| format!("\"{p}\"")),
        ))
        .unwrap()
    }

    #[test]
    fn test_seed_and_lookup() {
        let mut state = ViewState::new();
        state.seed_post(Post::new("p1"));
        state.seed_comments(vec![comment("c1", None), comment("c2", None)]);

        assert!(state.post(&EntityId::new("p1")).is_some());
        assert_eq!(state.comment_count(), 2);
        assert!(state.comment(&EntityId::new("c1")).is_some());
        assert!(state.comment(&EntityId::new("missing")).is_none());
    }

    #[test]
    fn test_reply_cache_is_separate_from_flat_list() {
        let mut state = ViewState::new();
        state.seed_comments(vec![comment("c1", None)]);
        state.cache_replies(EntityId::new("c1"), vec![comment("r1", Some("c1"))]);

        assert_eq!(state.comment_count(), 1);
        assert_eq!(state.replies(&EntityId::new("c1")).map(<[Comment]>::len), Some(1));
        // Replies are still reachable for reconciliation
        assert!(state.comment(&EntityId::new("r1")).is_some());
        assert!(state.comment_mut(&EntityId::new("r1")).is_some());
    }

    #[test]
    fn test_remove_comment_drops_reply_cache() {
        let mut state = ViewState::new();
        state.seed_comments(vec![comment("c1", None)]);
        state.cache_replies(EntityId::new("c1"), vec![comment("r1", Some("c1"))]);

        assert!(state.remove_comment(&EntityId::new("c1")));
        assert!(state.comment(&EntityId::new("c1")).is_none());
        assert!(state.replies(&EntityId::new("c1")).is_none());
    }

    #[test]
    fn test_remove_reply_from_cache() {
        let mut state = ViewState::new();
        state.seed_comments(vec![comment("c1", None)]);
        state.cache_replies(
            EntityId::new("c1"),
            vec![comment("r1", Some("c1")), comment("r2", Some("c1"))],
        );

        assert!(state.remove_comment(&EntityId::new("r1")));
        assert_eq!(state.replies(&EntityId::new("c1")).map(<[Comment]>::len), Some(1));
    }
}
