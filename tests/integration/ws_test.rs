//! Integration tests for WebSocket handshake, presence, and typing.

use std::time::Duration;

use http::StatusCode;
use serde_json::json;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite;

use pulse_core::config::AppConfig;
use pulse_core::types::UserId;

use crate::helpers::{
    self, assert_no_event, recv_event, recv_event_within, recv_json, send_json, wait_for_close,
};

/// Connect and assert the handshake is rejected with the given status.
async fn assert_handshake_rejected(url: String, expected: StatusCode) {
    let err = connect_async(url)
        .await
        .err()
        .expect("Handshake should have been rejected");

    match err {
        tungstenite::Error::Http(response) => assert_eq!(response.status(), expected),
        other => panic!("Expected HTTP rejection, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_ws_upgrade_without_upgrade_headers() {
    let app = helpers::TestApp::new();

    // A plain GET to /ws is not a WebSocket handshake.
    let response = app.request("GET", "/ws", None, None).await;

    assert!(
        response.status == StatusCode::UPGRADE_REQUIRED
            || response.status == StatusCode::BAD_REQUEST,
        "Expected 426 or 400, got {}",
        response.status
    );
}

#[tokio::test]
async fn test_ws_handshake_rejects_missing_token() {
    let app = helpers::TestApp::new();
    let addr = app.spawn_server().await;

    assert_handshake_rejected(format!("ws://{}/ws", addr), StatusCode::UNAUTHORIZED).await;
}

#[tokio::test]
async fn test_ws_handshake_rejects_garbage_token() {
    let app = helpers::TestApp::new();
    let addr = app.spawn_server().await;

    assert_handshake_rejected(
        format!("ws://{}/ws?token=not.a.jwt", addr),
        StatusCode::UNAUTHORIZED,
    )
    .await;
}

#[tokio::test]
async fn test_ws_handshake_rejects_revoked_token() {
    let app = helpers::TestApp::new();
    let addr = app.spawn_server().await;

    let alice = UserId::new();
    let token = app.token_for(alice, "Aiko");
    app.gate.revoke(&token);

    assert_handshake_rejected(
        format!("ws://{}/ws?token={}", addr, token),
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(app.revocations.len(), 1);
}

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.get("status").unwrap().as_str().unwrap(), "ok");
}

#[tokio::test]
async fn test_detailed_health_check() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health/detailed", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.get("connections").is_some());
    assert_eq!(
        response.body.get("push").unwrap().as_str().unwrap(),
        "disabled"
    );
}

#[tokio::test]
async fn test_connect_emits_presence_then_greeting_then_count() {
    let app = helpers::TestApp::new();
    let addr = app.spawn_server().await;

    let alice = UserId::new();
    let token = app.token_for(alice, "Aiko");
    let mut ws = app.connect_ws(addr, &token).await;

    let online = recv_json(&mut ws).await;
    assert_eq!(online["type"], "user_online");
    assert_eq!(online["userId"], alice.to_string());
    assert_eq!(online["userName"], "Aiko");

    let greeting = recv_json(&mut ws).await;
    assert_eq!(greeting["type"], "connected");
    assert_eq!(greeting["userId"], alice.to_string());

    let count = recv_json(&mut ws).await;
    assert_eq!(count["type"], "connected_users_count");
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_presence_broadcast_on_join_and_leave() {
    let app = helpers::TestApp::new();
    let addr = app.spawn_server().await;

    let alice = UserId::new();
    let bob = UserId::new();

    let mut ws_a = app.connect_ws(addr, &app.token_for(alice, "Aiko")).await;
    recv_event(&mut ws_a, "connected_users_count").await;

    let mut ws_b = app.connect_ws(addr, &app.token_for(bob, "Botan")).await;

    let online = recv_event(&mut ws_a, "user_online").await;
    assert_eq!(online["userId"], bob.to_string());
    let count = recv_event(&mut ws_a, "connected_users_count").await;
    assert_eq!(count["count"], 2);

    ws_b.close(None).await.expect("Failed to close");

    let offline = recv_event(&mut ws_a, "user_offline").await;
    assert_eq!(offline["userId"], bob.to_string());
    let count = recv_event(&mut ws_a, "connected_users_count").await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn test_unresponsive_peer_is_disconnected_on_pong_timeout() {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.realtime.ping_interval_seconds = 1;
    config.realtime.ping_timeout_seconds = 1;
    let app = helpers::TestApp::with_config(config);
    let addr = app.spawn_server().await;

    let alice = UserId::new();
    let bob = UserId::new();

    let mut ws_a = app.connect_ws(addr, &app.token_for(alice, "Aiko")).await;
    recv_event(&mut ws_a, "connected_users_count").await;

    // Bob completes the handshake but never polls his stream afterwards,
    // so the client library never flushes a Pong back to the server.
    let _ws_b = app.connect_ws(addr, &app.token_for(bob, "Botan")).await;

    let online = recv_event(&mut ws_a, "user_online").await;
    assert_eq!(online["userId"], bob.to_string());

    // The server gives up on the silent peer and tears the session down;
    // Alice keeps answering pings because her stream is being polled.
    let offline = recv_event_within(&mut ws_a, "user_offline", Duration::from_secs(5)).await;
    assert_eq!(offline["userId"], bob.to_string());
    assert!(!app.engine.registry.is_live(bob));
}

#[tokio::test]
async fn test_second_login_supersedes_first() {
    let app = helpers::TestApp::new();
    let addr = app.spawn_server().await;

    let alice = UserId::new();
    let bob = UserId::new();

    let token_a = app.token_for(alice, "Aiko");
    let mut ws_b = app.connect_ws(addr, &app.token_for(bob, "Botan")).await;
    recv_event(&mut ws_b, "connected_users_count").await;

    let mut ws_a1 = app.connect_ws(addr, &token_a).await;
    recv_event(&mut ws_a1, "connected_users_count").await;

    // Same user connects again: the first socket is force-closed.
    let mut ws_a2 = app.connect_ws(addr, &token_a).await;
    recv_event(&mut ws_a2, "connected_users_count").await;
    wait_for_close(&mut ws_a1).await;

    // The replacement session is fully functional.
    send_json(
        &mut ws_a2,
        &json!({
            "type": "message",
            "receiverId": bob.to_string(),
            "text": "still here",
            "messageId": "m-1"
        }),
    )
    .await;

    let message = recv_event(&mut ws_b, "message").await;
    assert_eq!(message["senderId"], alice.to_string());
    assert_eq!(message["text"], "still here");
    assert_eq!(message["showNotification"], true);

    let ack = recv_event(&mut ws_a2, "message_delivered").await;
    assert_eq!(ack["messageId"], "m-1");
    assert_eq!(ack["receiverId"], bob.to_string());
}

#[tokio::test]
async fn test_typing_events_reach_receiver() {
    let app = helpers::TestApp::new();
    let addr = app.spawn_server().await;

    let alice = UserId::new();
    let bob = UserId::new();

    let mut ws_a = app.connect_ws(addr, &app.token_for(alice, "Aiko")).await;
    recv_event(&mut ws_a, "connected_users_count").await;
    let mut ws_b = app.connect_ws(addr, &app.token_for(bob, "Botan")).await;
    recv_event(&mut ws_b, "connected_users_count").await;

    send_json(
        &mut ws_a,
        &json!({"type": "typing", "receiverId": bob.to_string()}),
    )
    .await;

    let typing = recv_event(&mut ws_b, "typing").await;
    assert_eq!(typing["senderId"], alice.to_string());
    assert_eq!(typing["receiverId"], bob.to_string());

    send_json(
        &mut ws_a,
        &json!({"type": "stop_typing", "receiverId": bob.to_string()}),
    )
    .await;
    recv_event(&mut ws_b, "stop_typing").await;

    // Repeating stop_typing with no active indicator is a no-op.
    send_json(
        &mut ws_a,
        &json!({"type": "stop_typing", "receiverId": bob.to_string()}),
    )
    .await;
    assert_no_event(&mut ws_b, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_message_clears_typing_without_stop_event() {
    let app = helpers::TestApp::new();
    let addr = app.spawn_server().await;

    let alice = UserId::new();
    let bob = UserId::new();

    let mut ws_a = app.connect_ws(addr, &app.token_for(alice, "Aiko")).await;
    recv_event(&mut ws_a, "connected_users_count").await;
    let mut ws_b = app.connect_ws(addr, &app.token_for(bob, "Botan")).await;
    recv_event(&mut ws_b, "connected_users_count").await;

    send_json(
        &mut ws_a,
        &json!({"type": "typing", "receiverId": bob.to_string()}),
    )
    .await;
    recv_event(&mut ws_b, "typing").await;

    send_json(
        &mut ws_a,
        &json!({
            "type": "message",
            "receiverId": bob.to_string(),
            "text": "done typing",
            "messageId": "m-1"
        }),
    )
    .await;

    recv_event(&mut ws_b, "message").await;
    // The indicator is gone, but no stop_typing event was sent.
    assert_no_event(&mut ws_b, Duration::from_millis(300)).await;
    assert!(app.engine.typing.is_empty());
}

#[tokio::test]
async fn test_status_request_reports_online_and_offline() {
    let app = helpers::TestApp::new();
    let addr = app.spawn_server().await;

    let alice = UserId::new();
    let bob = UserId::new();
    let offline = UserId::new();

    let mut ws_a = app.connect_ws(addr, &app.token_for(alice, "Aiko")).await;
    recv_event(&mut ws_a, "connected_users_count").await;
    let mut ws_b = app.connect_ws(addr, &app.token_for(bob, "Botan")).await;
    recv_event(&mut ws_b, "connected_users_count").await;
    recv_event(&mut ws_a, "connected_users_count").await;

    send_json(
        &mut ws_a,
        &json!({
            "type": "request_user_statuses",
            "userIds": [bob.to_string(), offline.to_string()]
        }),
    )
    .await;

    let reply = recv_event(&mut ws_a, "user_statuses").await;
    let statuses = reply["statuses"].as_array().expect("statuses array");
    assert_eq!(statuses.len(), 2);

    assert_eq!(statuses[0]["userId"], bob.to_string());
    assert_eq!(statuses[0]["isOnline"], true);
    assert!(statuses[0]["lastSeen"].is_null());

    assert_eq!(statuses[1]["userId"], offline.to_string());
    assert_eq!(statuses[1]["isOnline"], false);
    assert!(statuses[1]["lastSeen"].is_string());

    // The reply goes only to the asker.
    assert_no_event(&mut ws_b, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_seen_receipt_routed_to_original_sender() {
    let app = helpers::TestApp::new();
    let addr = app.spawn_server().await;

    let alice = UserId::new();
    let bob = UserId::new();

    let mut ws_a = app.connect_ws(addr, &app.token_for(alice, "Aiko")).await;
    recv_event(&mut ws_a, "connected_users_count").await;
    let mut ws_b = app.connect_ws(addr, &app.token_for(bob, "Botan")).await;
    recv_event(&mut ws_b, "connected_users_count").await;

    // Bob confirms he has seen Alice's messages.
    send_json(
        &mut ws_b,
        &json!({
            "type": "message_seen",
            "messageIds": ["m-1", "m-2"],
            "senderId": alice.to_string()
        }),
    )
    .await;

    let seen = recv_event(&mut ws_a, "message_seen").await;
    assert_eq!(seen["senderId"], bob.to_string());
    assert_eq!(
        seen["messageIds"],
        json!(["m-1", "m-2"]),
    );
}

#[tokio::test]
async fn test_malformed_frames_are_dropped_without_closing() {
    let app = helpers::TestApp::new();
    let addr = app.spawn_server().await;

    let alice = UserId::new();
    let bob = UserId::new();

    let mut ws_a = app.connect_ws(addr, &app.token_for(alice, "Aiko")).await;
    recv_event(&mut ws_a, "connected_users_count").await;
    let mut ws_b = app.connect_ws(addr, &app.token_for(bob, "Botan")).await;
    recv_event(&mut ws_b, "connected_users_count").await;

    send_json(&mut ws_a, &json!({"type": "mystery"})).await;
    send_json(&mut ws_a, &json!({"type": "message"})).await;

    // The connection survives and still delivers.
    send_json(
        &mut ws_a,
        &json!({
            "type": "message",
            "receiverId": bob.to_string(),
            "text": "still alive",
            "messageId": "m-1"
        }),
    )
    .await;

    let message = recv_event(&mut ws_b, "message").await;
    assert_eq!(message["text"], "still alive");
}
