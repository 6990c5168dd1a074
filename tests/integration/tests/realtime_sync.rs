//! End-to-end scenarios: optimistic mutation, room fan-out, and
//! convergence across concurrently-viewing clients.

use std::sync::Arc;

use integration_tests::{comment, post, wait_until, FakeHub, ScriptedGateway};
use pulse_channel::{ChannelClient, ChannelMessage};
use pulse_common::{ChannelConfig, MemoryAuthSession, ReconnectConfig};
use pulse_core::{EntityId, PostLikeState, ReactionKind};
use pulse_sync::{Notice, PulseClient};
use serde_json::json;
use tokio::sync::mpsc;

/// One simulated browser tab
struct Tab {
    client: PulseClient,
    notices: mpsc::UnboundedReceiver<Notice>,
    gateway: Arc<ScriptedGateway>,
    auth: Arc<MemoryAuthSession>,
}

fn tab(hub: &FakeHub, auth: MemoryAuthSession) -> Tab {
    let auth = Arc::new(auth);
    let gateway = Arc::new(ScriptedGateway::new());
    let channel = Arc::new(ChannelClient::new(
        ChannelConfig {
            url: "ws://hub/channel".to_string(),
            reconnect: ReconnectConfig {
                max_attempts: 3,
                min_delay_ms: 5,
                max_delay_ms: 10,
            },
        },
        auth.clone(),
        Arc::new(hub.clone()),
    ));

    let (client, notices) = PulseClient::from_parts(channel, gateway.clone(), auth.clone());
    client.connect();

    Tab {
        client,
        notices,
        gateway,
        auth,
    }
}

#[tokio::test]
async fn test_two_tabs_converge_on_post_like() {
    let hub = FakeHub::new();
    let tab_a = tab(&hub, MemoryAuthSession::logged_in("u1", "tok-a"));
    let tab_b = tab(&hub, MemoryAuthSession::logged_in("u2", "tok-b"));

    let session_a = tab_a.client.open_post(post("p1"), vec![]);
    let session_b = tab_b.client.open_post(post("p1"), vec![]);
    wait_until(|| hub.room_size("post:p1") == 2).await;

    *tab_a.gateway.post_state.lock() = PostLikeState {
        like_count: 1,
        is_liked: true,
    };
    let liked = session_a
        .engine()
        .toggle_post_like(&EntityId::new("p1"))
        .await
        .unwrap();
    assert!(liked);

    // Tab B sees the new count over the channel, without any refetch
    wait_until(|| session_b.post_view().is_some_and(|v| v.like_count == 1)).await;
    let view_b = session_b.post_view().unwrap();
    assert!(!view_b.liked_by_viewer);

    // Tab A's own view reflects its confirmed like
    let view_a = session_a.post_view().unwrap();
    assert_eq!(view_a.like_count, 1);
    assert!(view_a.liked_by_viewer);
}

#[tokio::test]
async fn test_comment_like_fans_out_to_room() {
    let hub = FakeHub::new();
    let tab_a = tab(&hub, MemoryAuthSession::logged_in("u1", "tok-a"));
    let tab_b = tab(&hub, MemoryAuthSession::logged_in("u2", "tok-b"));

    let session_a = tab_a
        .client
        .open_post(post("p1"), vec![comment("c1", "p1")]);
    let session_b = tab_b
        .client
        .open_post(post("p1"), vec![comment("c1", "p1")]);
    wait_until(|| hub.room_size("post:p1") == 2).await;

    *tab_a.gateway.reactions.lock() =
        serde_json::from_str(r#"{"likes": ["u1"], "dislikes": []}"#).unwrap();
    session_a
        .engine()
        .toggle_comment_reaction(&EntityId::new("c1"), ReactionKind::Like)
        .await
        .unwrap();

    wait_until(|| {
        session_b
            .comment_view(&EntityId::new("c1"))
            .is_some_and(|v| v.like_count == 1)
    })
    .await;

    let view_b = session_b.comment_view(&EntityId::new("c1")).unwrap();
    assert!(!view_b.liked_by_viewer);
}

#[tokio::test]
async fn test_report_fans_out_moderation_state() {
    let hub = FakeHub::new();
    let tab_a = tab(&hub, MemoryAuthSession::logged_in("u1", "tok-a"));
    let tab_b = tab(&hub, MemoryAuthSession::logged_in("u2", "tok-b"));

    let session_a = tab_a
        .client
        .open_post(post("p1"), vec![comment("c1", "p1")]);
    let session_b = tab_b
        .client
        .open_post(post("p1"), vec![comment("c1", "p1")]);
    wait_until(|| hub.room_size("post:p1") == 2).await;

    session_a
        .engine()
        .report_comment(&EntityId::new("c1"), "spam")
        .await
        .unwrap();

    wait_until(|| {
        session_b
            .comment_view(&EntityId::new("c1"))
            .is_some_and(|v| !v.is_visible)
    })
    .await;
}

#[tokio::test]
async fn test_duplicate_and_reordered_broadcasts_converge() {
    let hub = FakeHub::new();
    let tab_b = tab(&hub, MemoryAuthSession::logged_in("u2", "tok-b"));
    let session_b = tab_b
        .client
        .open_post(post("p1"), vec![comment("c1", "p1")]);
    wait_until(|| hub.room_size("post:p1") == 1).await;

    let event_a = ChannelMessage::new(
        "comment_liked",
        json!({"commentId": "c1", "likes": ["u1"], "dislikes": []}),
    );
    let event_b = ChannelMessage::new(
        "comment_liked",
        json!({"commentId": "c1", "likes": ["u1", "u3"], "dislikes": []}),
    );

    // A, then B, then a duplicate of A: replacement merge means the last
    // processed payload wins - expected last-write-wins, not a bug
    hub.broadcast("post:p1", &event_a);
    hub.broadcast("post:p1", &event_b);
    hub.broadcast("post:p1", &event_a);

    wait_until(|| {
        session_b
            .comment_view(&EntityId::new("c1"))
            .is_some_and(|v| v.like_count == 1)
    })
    .await;

    // Replaying the same payload again changes nothing
    hub.broadcast("post:p1", &event_a);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(
        session_b
            .comment_view(&EntityId::new("c1"))
            .unwrap()
            .like_count,
        1
    );
}

#[tokio::test]
async fn test_unauthenticated_tab_cannot_react() {
    let hub = FakeHub::new();
    let mut tab_anon = tab(&hub, MemoryAuthSession::new());
    let session = tab_anon
        .client
        .open_post(post("p1"), vec![comment("c1", "p1")]);
    wait_until(|| hub.room_size("post:p1") == 1).await;

    let err = session
        .engine()
        .toggle_comment_reaction(&EntityId::new("c1"), ReactionKind::Like)
        .await
        .unwrap_err();

    assert!(err.requires_login());
    assert_eq!(tab_anon.notices.recv().await, Some(Notice::LoginRequired));
    // No optimistic change leaked into view state
    assert_eq!(
        session
            .comment_view(&EntityId::new("c1"))
            .unwrap()
            .like_count,
        0
    );
}

#[tokio::test]
async fn test_failed_mutation_rolls_back_and_notifies() {
    let hub = FakeHub::new();
    let mut tab_a = tab(&hub, MemoryAuthSession::logged_in("u1", "tok-a"));
    let session = tab_a
        .client
        .open_post(post("p1"), vec![comment("c1", "p1")]);
    wait_until(|| hub.room_size("post:p1") == 1).await;

    tab_a.gateway.failing(true);
    session
        .engine()
        .toggle_comment_reaction(&EntityId::new("c1"), ReactionKind::Like)
        .await
        .unwrap_err();

    assert_eq!(
        session
            .comment_view(&EntityId::new("c1"))
            .unwrap()
            .like_count,
        0
    );
    assert!(matches!(
        tab_a.notices.recv().await,
        Some(Notice::ActionFailed { .. })
    ));

    // No broadcast happened for the failed mutation
    assert!(!hub
        .frames()
        .iter()
        .any(|frame| frame.event == "comment_like"));
}

#[tokio::test]
async fn test_dropping_session_leaves_room_and_detaches_listeners() {
    let hub = FakeHub::new();
    let tab_a = tab(&hub, MemoryAuthSession::logged_in("u1", "tok-a"));
    let tab_b = tab(&hub, MemoryAuthSession::logged_in("u2", "tok-b"));

    let session_a = tab_a.client.open_post(post("p1"), vec![]);
    let session_b = tab_b.client.open_post(post("p1"), vec![]);
    wait_until(|| hub.room_size("post:p1") == 2).await;

    drop(session_b);
    wait_until(|| hub.room_size("post:p1") == 1).await;
    assert!(hub.frames().iter().any(|frame| frame.event == "leave_room"));

    // Tab A keeps working after B unmounts
    *tab_a.gateway.post_state.lock() = PostLikeState {
        like_count: 1,
        is_liked: true,
    };
    session_a
        .engine()
        .toggle_post_like(&EntityId::new("p1"))
        .await
        .unwrap();
    assert_eq!(session_a.post_view().unwrap().like_count, 1);
}

#[tokio::test]
async fn test_reconnect_presents_latest_token() {
    let hub = FakeHub::new();
    let tab_a = tab(&hub, MemoryAuthSession::logged_in("u1", "tok-old"));
    wait_until(|| hub.tokens().len() == 1).await;

    // Token refresh, then a fresh connection cycle
    tab_a.auth.set_token("tok-new");
    tab_a.client.disconnect().await;
    tab_a.client.connect();
    wait_until(|| hub.tokens().len() == 2).await;

    assert_eq!(
        hub.tokens(),
        vec![Some("tok-old".to_string()), Some("tok-new".to_string())]
    );
}
