//! Client facade and per-post session lifecycle
//!
//! `PulseClient` is the composition root: constructed once at application
//! startup with an explicit lifecycle, never a module-level singleton.
//! `PostSession` scopes everything one mounted post view needs; dropping it
//! leaves the room and unsubscribes every listener, so an unmounted view
//! cannot keep mutating state through stale callbacks.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

use pulse_channel::{ChannelClient, Subscription, WsConnector};
use pulse_common::{ClientConfig, Identity, TokenStore};
use pulse_core::{Comment, EntityId, GatewayResult, Post, ReactionGateway, RoomId};

use crate::notify::{notice_channel, Notice, NoticeSender};
use crate::optimistic::OptimisticEngine;
use crate::project::{project_comment, project_post, CommentView, PostView};
use crate::reconcile::Reconciler;
use crate::rest::HttpReactionGateway;
use crate::store::ViewState;

/// Application-level entry point for the sync layer
pub struct PulseClient {
    channel: Arc<ChannelClient>,
    gateway: Arc<dyn ReactionGateway>,
    identity: Arc<dyn Identity>,
    notices: NoticeSender,
}

impl PulseClient {
    /// Build a client from configuration with the WebSocket transport.
    ///
    /// Returns the client and the receiving half of the notice stream.
    pub fn new(
        config: &ClientConfig,
        tokens: Arc<dyn TokenStore>,
        identity: Arc<dyn Identity>,
    ) -> GatewayResult<(Self, mpsc::UnboundedReceiver<Notice>)> {
        let gateway = Arc::new(HttpReactionGateway::new(&config.rest, tokens.clone())?);
        let channel = Arc::new(ChannelClient::new(
            config.channel.clone(),
            tokens,
            Arc::new(WsConnector::new()),
        ));
        Ok(Self::from_parts(channel, gateway, identity))
    }

    /// Assemble a client from already-built parts (custom transports, mock
    /// gateways)
    pub fn from_parts(
        channel: Arc<ChannelClient>,
        gateway: Arc<dyn ReactionGateway>,
        identity: Arc<dyn Identity>,
    ) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (notices, notice_rx) = notice_channel();
        (
            Self {
                channel,
                gateway,
                identity,
                notices,
            },
            notice_rx,
        )
    }

    /// Start the realtime connection (idempotent)
    pub fn connect(&self) {
        self.channel.connect();
    }

    /// Release the realtime connection
    pub async fn disconnect(&self) {
        self.channel.disconnect().await;
    }

    /// The underlying channel client
    pub fn channel(&self) -> &Arc<ChannelClient> {
        &self.channel
    }

    /// Open a session for one post view from its server-fetched baseline.
    ///
    /// Joins the post's room and attaches the reconciler; both are undone
    /// when the session is dropped.
    pub fn open_post(&self, post: Post, comments: Vec<Comment>) -> PostSession {
        PostSession::open(
            self.channel.clone(),
            self.gateway.clone(),
            self.identity.clone(),
            self.notices.clone(),
            post,
            comments,
        )
    }
}

impl std::fmt::Debug for PulseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PulseClient").finish()
    }
}

/// Everything one mounted post view owns
pub struct PostSession {
    post_id: EntityId,
    room: RoomId,
    state: Arc<Mutex<ViewState>>,
    engine: OptimisticEngine,
    channel: Arc<ChannelClient>,
    identity: Arc<dyn Identity>,
    // Dropping these detaches the reconciler from the bus
    _subscriptions: Vec<Subscription>,
}

impl PostSession {
    fn open(
        channel: Arc<ChannelClient>,
        gateway: Arc<dyn ReactionGateway>,
        identity: Arc<dyn Identity>,
        notices: NoticeSender,
        post: Post,
        comments: Vec<Comment>,
    ) -> Self {
        let post_id = post.id.clone();
        let room = RoomId::post(&post_id);

        let mut view = ViewState::new();
        view.seed_post(post);
        view.seed_comments(comments);
        let state = Arc::new(Mutex::new(view));

        let reconciler = Reconciler::new(state.clone());
        let subscriptions = reconciler.attach(&channel.bus());

        // Membership gates only reception of others' broadcasts; mutations
        // never wait for the join to complete
        channel.join_room(room.clone());

        let engine = OptimisticEngine::new(
            state.clone(),
            gateway,
            channel.clone(),
            identity.clone(),
            notices,
        );

        tracing::debug!(post_id = %post_id, "Post session opened");

        Self {
            post_id,
            room,
            state,
            engine,
            channel,
            identity,
            _subscriptions: subscriptions,
        }
    }

    /// The post this session is scoped to
    pub fn post_id(&self) -> &EntityId {
        &self.post_id
    }

    /// The mutation engine for this view
    pub fn engine(&self) -> &OptimisticEngine {
        &self.engine
    }

    /// Read from the view state under its lock
    pub fn with_state<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.state.lock())
    }

    /// Project the post for the current viewer
    pub fn post_view(&self) -> Option<PostView> {
        let viewer = self.identity.current_user();
        let state = self.state.lock();
        state
            .post(&self.post_id)
            .map(|post| project_post(post, viewer.as_ref()))
    }

    /// Project one comment for the current viewer
    pub fn comment_view(&self, comment_id: &EntityId) -> Option<CommentView> {
        let viewer = self.identity.current_user();
        let state = self.state.lock();
        state
            .comment(comment_id)
            .map(|comment| project_comment(comment, viewer.as_ref()))
    }
}

impl Drop for PostSession {
    fn drop(&mut self) {
        // Best-effort leave; listener guards detach themselves
        self.channel.leave_room(&self.room);
        tracing::debug!(post_id = %self.post_id, "Post session closed");
    }
}

impl std::fmt::Debug for PostSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostSession")
            .field("post_id", &self.post_id)
            .field("room", &self.room)
            .finish()
    }
}
