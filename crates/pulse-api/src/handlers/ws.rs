//! WebSocket upgrade and session loop.
//!
//! Authentication happens before the upgrade completes: a request with a
//! missing or bad token gets a plain 401 instead of a doomed socket. After
//! the upgrade the session splits into an inbound loop (this task) and an
//! outbound pump (spawned) that also owns the ping keepalive.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::Response;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

use pulse_auth::AuthenticatedUser;
use pulse_realtime::{ConnectionHandle, ServerEvent};

use crate::error::ApiError;
use crate::extractors::auth::bearer_token;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Access token; browsers cannot set headers on WebSocket requests.
    pub token: Option<String>,
}

/// `GET /ws?token=<jwt>`: authenticate, then upgrade.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let token = query.token.or_else(|| bearer_token(&headers));
    let user = state.gate.verify(token.as_deref())?;

    Ok(ws.on_upgrade(move |socket| run_session(state, user, socket)))
}

/// Drives one authenticated WebSocket session to completion.
async fn run_session(state: AppState, user: AuthenticatedUser, socket: WebSocket) {
    let (ws_tx, mut ws_rx) = socket.split();

    let (handle, outbound_rx) = state.engine.connect(user.user_id, user.display_name);
    info!(
        connection_id = %handle.id,
        user_id = %handle.user_id,
        "WebSocket session started"
    );

    let pump = tokio::spawn(pump_outbound(
        ws_tx,
        outbound_rx,
        handle.clone(),
        state.config.realtime.ping_interval_seconds,
        state.config.realtime.ping_timeout_seconds,
    ));

    loop {
        tokio::select! {
            incoming = ws_rx.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        state.engine.handle_event(&handle, text.as_str()).await;
                    }
                    Some(Ok(Message::Pong(_))) => handle.record_pong(),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(
                            connection_id = %handle.id,
                            error = %err,
                            "WebSocket read error"
                        );
                        break;
                    }
                }
            }
            // Fires when this session is superseded or the engine shuts down.
            _ = handle.closed.cancelled() => break,
        }
    }

    state.engine.disconnect(&handle);
    handle.close();
    let _ = pump.await;

    info!(
        connection_id = %handle.id,
        user_id = %handle.user_id,
        "WebSocket session closed"
    );
}

/// Serializes outbound events onto the wire and enforces the keepalive.
///
/// Exits when the event channel closes, the socket errors, the peer stops
/// answering pings, or the handle is cancelled.
async fn pump_outbound(
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut events: mpsc::Receiver<ServerEvent>,
    handle: Arc<ConnectionHandle>,
    ping_interval_seconds: u64,
    ping_timeout_seconds: u64,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(ping_interval_seconds));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let ping_timeout = Duration::from_secs(ping_timeout_seconds);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                let text = match serde_json::to_string(&event) {
                    Ok(text) => text,
                    Err(err) => {
                        warn!(
                            connection_id = %handle.id,
                            error = %err,
                            "Failed to serialize outbound event"
                        );
                        continue;
                    }
                };
                if ws_tx.send(Message::Text(text.into())).await.is_err() {
                    handle.close();
                    break;
                }
            }
            _ = ticker.tick() => {
                if handle.pong_age() > ping_timeout {
                    warn!(
                        connection_id = %handle.id,
                        user_id = %handle.user_id,
                        "Pong timeout, closing connection"
                    );
                    handle.close();
                    break;
                }
                if ws_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    handle.close();
                    break;
                }
            }
            _ = handle.closed.cancelled() => {
                let _ = ws_tx.send(Message::Close(None)).await;
                break;
            }
        }
    }
}
