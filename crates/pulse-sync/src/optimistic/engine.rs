//! Optimistic mutation engine
//!
//! Gives the acting user immediate feedback while the authoritative request
//! is in flight. Per mutation: optimistic apply (with a per-invocation
//! snapshot), REST submit, then either wholesale replacement by the server
//! payload plus a channel broadcast, or rollback to the snapshot plus a
//! user-visible notice. No automatic retry; the user re-triggers.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use pulse_channel::ChannelClient;
use pulse_common::{AppError, AppResult, Identity};
use pulse_core::{
    ClientEvent, DomainError, EntityId, ReactionGateway, ReactionKind, UserRef,
};

use crate::notify::{Notice, NoticeSender};
use crate::store::ViewState;

use super::{CommentSnapshot, PostSnapshot};

/// Applies local mutations ahead of server confirmation
pub struct OptimisticEngine {
    state: Arc<Mutex<ViewState>>,
    gateway: Arc<dyn ReactionGateway>,
    channel: Arc<ChannelClient>,
    identity: Arc<dyn Identity>,
    notices: NoticeSender,
}

impl OptimisticEngine {
    /// Create an engine over one view's state
    pub fn new(
        state: Arc<Mutex<ViewState>>,
        gateway: Arc<dyn ReactionGateway>,
        channel: Arc<ChannelClient>,
        identity: Arc<dyn Identity>,
        notices: NoticeSender,
    ) -> Self {
        Self {
            state,
            gateway,
            channel,
            identity,
            notices,
        }
    }

    /// Toggle the current user's like or dislike on a comment.
    ///
    /// Returns whether the reaction is present after confirmation.
    #[instrument(skip(self))]
    pub async fn toggle_comment_reaction(
        &self,
        comment_id: &EntityId,
        kind: ReactionKind,
    ) -> AppResult<bool> {
        // Fail fast: no session means no state change and no request
        let user_id = self.require_user()?;

        let (snapshot, post_id) = {
            let mut state = self.state.lock();
            let comment = state
                .comment_mut(comment_id)
                .ok_or_else(|| AppError::from(DomainError::CommentNotFound(comment_id.clone())))?;
            let snapshot = CommentSnapshot::capture(comment);
            let post_id = comment.post_id.clone();
            comment.toggle_reaction(UserRef::new(user_id.clone()), kind);
            (snapshot, post_id)
        };

        let result = match kind {
            ReactionKind::Like => self.gateway.like_comment(comment_id).await,
            ReactionKind::Dislike => self.gateway.dislike_comment(comment_id).await,
        };

        match result {
            Ok(confirmed) => {
                // The response replaces the optimistic guess wholesale
                let present = {
                    let mut state = self.state.lock();
                    match state.comment_mut(comment_id) {
                        Some(comment) => {
                            comment.replace_reactions(confirmed.likes, confirmed.dislikes);
                            match kind {
                                ReactionKind::Like => comment.likes.contains(&user_id),
                                ReactionKind::Dislike => comment.dislikes.contains(&user_id),
                            }
                        }
                        // Deleted while in flight; nothing left to show
                        None => false,
                    }
                };

                info!(
                    comment_id = %comment_id,
                    kind = kind.as_str(),
                    present = present,
                    "Comment reaction confirmed"
                );

                let event = match kind {
                    ReactionKind::Like => ClientEvent::CommentLike {
                        post_id,
                        comment_id: comment_id.clone(),
                        user_id,
                    },
                    ReactionKind::Dislike => ClientEvent::CommentDislike {
                        post_id,
                        comment_id: comment_id.clone(),
                        user_id,
                    },
                };
                self.channel.emit(&event);

                Ok(present)
            }
            Err(err) => Err(self.roll_back_comment(snapshot, err)),
        }
    }

    /// Toggle the current user's like on a post.
    ///
    /// Returns the confirmed `isLiked` state.
    #[instrument(skip(self))]
    pub async fn toggle_post_like(&self, post_id: &EntityId) -> AppResult<bool> {
        let user_id = self.require_user()?;

        let snapshot = {
            let mut state = self.state.lock();
            let post = state
                .post_mut(post_id)
                .ok_or_else(|| AppError::from(DomainError::PostNotFound(post_id.clone())))?;
            let snapshot = PostSnapshot::capture(post);
            post.toggle_like(UserRef::new(user_id.clone()));
            snapshot
        };

        match self.gateway.like_post(post_id).await {
            Ok(confirmed) => {
                let likes = {
                    let mut state = self.state.lock();
                    match state.post_mut(post_id) {
                        Some(post) => {
                            post.apply_like_state(
                                confirmed.like_count,
                                confirmed.is_liked,
                                &user_id,
                            );
                            post.likes.clone()
                        }
                        None => pulse_core::ReactionSet::new(),
                    }
                };

                info!(
                    post_id = %post_id,
                    like_count = confirmed.like_count,
                    is_liked = confirmed.is_liked,
                    "Post like confirmed"
                );

                self.channel.emit(&ClientEvent::PostLike {
                    post_id: post_id.clone(),
                    user_id,
                    likes,
                    is_liked: confirmed.is_liked,
                });

                Ok(confirmed.is_liked)
            }
            Err(err) => {
                let err = AppError::from(err);
                {
                    let mut state = self.state.lock();
                    snapshot.restore(&mut state);
                }
                warn!(post_id = %post_id, error = %err, "Post like rolled back");
                self.notices.send(Notice::from_error(&err));
                Err(err)
            }
        }
    }

    /// Report a comment for moderation.
    #[instrument(skip(self, reason))]
    pub async fn report_comment(&self, comment_id: &EntityId, reason: &str) -> AppResult<()> {
        let user_id = self.require_user()?;

        let reason = reason.trim();
        if reason.is_empty() {
            let err = AppError::from(DomainError::EmptyReportReason);
            self.notices.send(Notice::from_error(&err));
            return Err(err);
        }

        let (snapshot, post_id) = {
            let mut state = self.state.lock();
            let comment = state
                .comment_mut(comment_id)
                .ok_or_else(|| AppError::from(DomainError::CommentNotFound(comment_id.clone())))?;
            let snapshot = CommentSnapshot::capture(comment);
            let post_id = comment.post_id.clone();
            comment.needs_moderation = true;
            comment.moderation_reason = Some(reason.to_string());
            (snapshot, post_id)
        };

        match self.gateway.report_comment(comment_id, reason).await {
            Ok(()) => {
                info!(comment_id = %comment_id, "Comment reported");
                self.channel.emit(&ClientEvent::CommentReport {
                    post_id,
                    comment_id: comment_id.clone(),
                    user_id,
                    reason: reason.to_string(),
                });
                Ok(())
            }
            Err(err) => Err(self.roll_back_comment(snapshot, err)),
        }
    }

    /// Fetch and cache the replies of one comment.
    ///
    /// Returns the number of replies cached. Read-only: no optimistic state,
    /// no rollback.
    #[instrument(skip(self))]
    pub async fn load_replies(&self, comment_id: &EntityId) -> AppResult<usize> {
        let replies = self.gateway.fetch_replies(comment_id).await?;
        let count = replies.len();
        self.state.lock().cache_replies(comment_id.clone(), replies);

        info!(comment_id = %comment_id, count = count, "Replies cached");
        Ok(count)
    }

    fn require_user(&self) -> AppResult<EntityId> {
        match self.identity.current_user() {
            Some(user_id) => Ok(user_id),
            None => {
                self.notices.send(Notice::LoginRequired);
                Err(AppError::Unauthenticated)
            }
        }
    }

    fn roll_back_comment(&self, snapshot: CommentSnapshot, err: DomainError) -> AppError {
        let err = AppError::from(err);
        {
            let mut state = self.state.lock();
            snapshot.restore(&mut state);
        }
        warn!(error = %err, "Comment mutation rolled back");
        self.notices.send(Notice::from_error(&err));
        err
    }
}

impl std::fmt::Debug for OptimisticEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimisticEngine").finish()
    }
}
