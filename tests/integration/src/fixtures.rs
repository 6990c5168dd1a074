//! Entity fixtures and a scripted gateway

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use pulse_core::{
    Comment, CommentReactions, DomainError, EntityId, GatewayResult, Post, PostLikeState,
    ReactionGateway,
};

/// A post baseline as fetched over REST
#[must_use]
pub fn post(id: &str) -> Post {
    Post::new(id)
}

/// A comment baseline as fetched over REST
#[must_use]
pub fn comment(id: &str, post_id: &str) -> Comment {
    serde_json::from_str(&format!(
        r#"{{
            "_id": "{id}",
            "postId": "{post_id}",
            "author": "author1",
            "content": "text",
            "createdAt": "2025-03-01T12:00:00Z"
        }}"#
    ))
    .expect("fixture comment must parse")
}

/// Poll a condition until it holds or the test times out
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

/// Gateway returning canned payloads, switchable to failure
#[derive(Default)]
pub struct ScriptedGateway {
    pub reactions: Mutex<CommentReactions>,
    pub post_state: Mutex<PostLikeState>,
    pub replies: Mutex<Vec<Comment>>,
    fail: AtomicBool,
}

impl ScriptedGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> GatewayResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(DomainError::Gateway("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReactionGateway for ScriptedGateway {
    async fn like_comment(&self, _id: &EntityId) -> GatewayResult<CommentReactions> {
        self.check()?;
        Ok(self.reactions.lock().clone())
    }

    async fn dislike_comment(&self, _id: &EntityId) -> GatewayResult<CommentReactions> {
        self.check()?;
        Ok(self.reactions.lock().clone())
    }

    async fn like_post(&self, _id: &EntityId) -> GatewayResult<PostLikeState> {
        self.check()?;
        Ok(*self.post_state.lock())
    }

    async fn report_comment(&self, _id: &EntityId, _reason: &str) -> GatewayResult<()> {
        self.check()
    }

    async fn fetch_replies(&self, _id: &EntityId) -> GatewayResult<Vec<Comment>> {
        self.check()?;
        Ok(self.replies.lock().clone())
    }
}
