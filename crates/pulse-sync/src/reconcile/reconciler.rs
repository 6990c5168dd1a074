//! Event reconciler
//!
//! Merges externally-sourced broadcasts into local view state. Every merge
//! is a full replacement of the field group the payload covers, keyed by
//! server data - never an increment - so duplicate and out-of-order delivery
//! cannot double-count. Last write wins; an in-flight local mutation's own
//! confirmation simply overwrites again afterwards.

use parking_lot::Mutex;
use std::sync::Arc;

use pulse_channel::{EventBus, Subscription};
use pulse_core::events::{CommentUpdatedEvent, UpdateKind};
use pulse_core::{EntityId, ReactionSet, ServerEvent};

use crate::store::ViewState;

/// Applies inbound broadcasts to one view's state
pub struct Reconciler {
    state: Arc<Mutex<ViewState>>,
}

impl Reconciler {
    /// Create a reconciler over one view's state
    pub fn new(state: Arc<Mutex<ViewState>>) -> Arc<Self> {
        Arc::new(Self { state })
    }

    /// Subscribe to every broadcast event name on the bus.
    ///
    /// The returned guards must live as long as the view; dropping them
    /// unsubscribes every handler.
    pub fn attach(self: &Arc<Self>, bus: &Arc<EventBus>) -> Vec<Subscription> {
        ServerEvent::NAMES
            .iter()
            .map(|name| {
                let reconciler = self.clone();
                let event_name = *name;
                bus.subscribe(name, move |data| {
                    match ServerEvent::parse(event_name, data) {
                        Some(event) => reconciler.apply(&event),
                        // Malformed payloads are dropped, never thrown
                        None => tracing::debug!(
                            event = event_name,
                            "Ignoring malformed broadcast payload"
                        ),
                    }
                })
            })
            .collect()
    }

    /// Merge one event into local state
    pub fn apply(&self, event: &ServerEvent) {
        tracing::trace!(
            event = event.event_type(),
            target = %event.target_id(),
            "Reconciling broadcast"
        );

        match event {
            ServerEvent::PostLiked(e) => {
                let mut state = self.state.lock();
                match state.post_mut(&e.post_id) {
                    Some(post) => {
                        post.replace_likes(e.likes.clone(), e.is_liked);
                        if let Some(count) = e.like_count {
                            post.like_count = Some(count);
                        }
                    }
                    None => Self::unknown_target(event),
                }
            }

            // The dedicated like/dislike events and the generic update with a
            // LIKE/DISLIKE discriminator are the same underlying change and
            // must flow through the same merge
            ServerEvent::CommentLiked(e) | ServerEvent::CommentDisliked(e) => {
                self.merge_comment_reactions(&e.comment_id, Some(&e.likes), Some(&e.dislikes));
            }
            ServerEvent::CommentUpdated(e) => self.apply_comment_update(e),

            ServerEvent::CommentDeleted(e) => {
                let mut state = self.state.lock();
                if state.remove_comment(&e.comment_id) {
                    tracing::debug!(comment_id = %e.comment_id, "Comment removed by broadcast");
                } else {
                    Self::unknown_target(event);
                }
            }

            ServerEvent::CommentReported(e) => {
                let mut state = self.state.lock();
                match state.comment_mut(&e.comment_id) {
                    Some(comment) => {
                        comment.needs_moderation = true;
                        comment.moderation_reason = e.reason.clone();
                    }
                    None => Self::unknown_target(event),
                }
            }

            ServerEvent::CommentApproved(e) => {
                let mut state = self.state.lock();
                match state.comment_mut(&e.comment_id) {
                    Some(comment) => {
                        comment.is_approved = e.is_approved;
                        comment.needs_moderation = false;
                        comment.moderation_reason = None;
                    }
                    None => Self::unknown_target(event),
                }
            }
        }
    }

    fn apply_comment_update(&self, e: &CommentUpdatedEvent) {
        match e.kind {
            // Fallback path for reaction changes: same merge as the
            // dedicated events
            Some(UpdateKind::Like | UpdateKind::Dislike) => {
                self.merge_comment_reactions(&e.comment_id, e.likes.as_ref(), e.dislikes.as_ref());
            }
            _ => {
                let mut state = self.state.lock();
                let Some(comment) = state.comment_mut(&e.comment_id) else {
                    tracing::debug!(comment_id = %e.comment_id, "Update for unknown comment ignored");
                    return;
                };
                if let Some(likes) = &e.likes {
                    comment.likes = likes.clone();
                }
                if let Some(dislikes) = &e.dislikes {
                    comment.dislikes = dislikes.clone();
                }
                if let Some(content) = &e.content {
                    comment.content = content.clone();
                }
                if let Some(edited) = e.is_edited {
                    comment.is_edited = edited;
                }
            }
        }
    }

    /// The one merge function for comment reaction state: replace each
    /// present field group wholesale.
    fn merge_comment_reactions(
        &self,
        comment_id: &EntityId,
        likes: Option<&ReactionSet>,
        dislikes: Option<&ReactionSet>,
    ) {
        let mut state = self.state.lock();
        let Some(comment) = state.comment_mut(comment_id) else {
            tracing::debug!(comment_id = %comment_id, "Reaction event for unknown comment ignored");
            return;
        };

        let likes = likes.cloned().unwrap_or_else(|| comment.likes.clone());
        let dislikes = dislikes.cloned().unwrap_or_else(|| comment.dislikes.clone());
        comment.replace_reactions(likes, dislikes);
    }

    fn unknown_target(event: &ServerEvent) {
        tracing::debug!(
            event = event.event_type(),
            target = %event.target_id(),
            "Broadcast for unknown entity ignored"
        );
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish()
    }
}
