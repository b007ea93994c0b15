//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use futures::{SinkExt, StreamExt};
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use pulse_api::{AppState, build_router};
use pulse_auth::{CredentialGate, JwtEncoder, RevocationList};
use pulse_core::AppResult;
use pulse_core::config::AppConfig;
use pulse_core::traits::PushProvider;
use pulse_core::types::UserId;
use pulse_push::{MemoryDeviceTokenStore, PushFallback};
use pulse_realtime::{MemoryNotificationLedger, RealtimeEngine};

/// A connected WebSocket client.
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Push provider stub that records every call instead of talking to FCM.
#[derive(Debug, Default)]
pub struct RecordingProvider {
    pub calls: AtomicUsize,
    pub sent: Mutex<Vec<(String, String, Value)>>,
}

#[async_trait]
impl PushProvider for RecordingProvider {
    async fn send(
        &self,
        _device_token: &str,
        title: &str,
        body: &str,
        data: Value,
    ) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string(), data));
        Ok(())
    }
}

impl RecordingProvider {
    /// Poll until the provider has seen `expected` calls.
    pub async fn wait_for_calls(&self, expected: usize) {
        for _ in 0..200 {
            if self.calls.load(Ordering::SeqCst) >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "push provider never reached {} calls (saw {})",
            expected,
            self.calls.load(Ordering::SeqCst)
        );
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Token encoder sharing the gate's secret
    pub encoder: JwtEncoder,
    /// Credential gate, exposed so tests can revoke tokens
    pub gate: Arc<CredentialGate>,
    /// Revocation list backing the gate
    pub revocations: Arc<RevocationList>,
    /// Realtime engine behind the router
    pub engine: Arc<RealtimeEngine>,
    /// Device token store behind the push fallback
    pub tokens: Arc<MemoryDeviceTokenStore>,
    /// Recording push provider
    pub provider: Arc<RecordingProvider>,
    /// In-memory notification ledger
    pub ledger: Arc<MemoryNotificationLedger>,
}

impl TestApp {
    /// Create a test application with in-memory collaborators.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.realtime.ping_interval_seconds = 30;
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        let revocations = Arc::new(RevocationList::new());
        let gate = Arc::new(CredentialGate::new(&config.auth, Arc::clone(&revocations)));
        let encoder = JwtEncoder::new(&config.auth);

        let tokens = Arc::new(MemoryDeviceTokenStore::new());
        let provider = Arc::new(RecordingProvider::default());
        let push = Arc::new(PushFallback::new(tokens.clone(), provider.clone()));
        let ledger = Arc::new(MemoryNotificationLedger::new());

        let engine = Arc::new(RealtimeEngine::new(
            config.realtime.clone(),
            push,
            ledger.clone(),
        ));
        engine.start_sweeper();

        let state = AppState::new(
            Arc::new(config.clone()),
            Arc::clone(&gate),
            Arc::clone(&engine),
            tokens.clone(),
        );
        let router = build_router(state);

        Self {
            router,
            config,
            encoder,
            gate,
            revocations,
            engine,
            tokens,
            provider,
            ledger,
        }
    }

    /// Issue a valid access token for a user.
    pub fn token_for(&self, user_id: UserId, name: &str) -> String {
        self.encoder
            .issue(user_id, Some(name), None)
            .expect("Failed to issue test token")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Serve the router on an ephemeral port for real WebSocket clients.
    pub async fn spawn_server(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server failed");
        });

        addr
    }

    /// Open an authenticated WebSocket connection.
    pub async fn connect_ws(&self, addr: SocketAddr, token: &str) -> WsClient {
        let url = format!("ws://{}/ws?token={}", addr, token);
        let (stream, _) = connect_async(url)
            .await
            .expect("WebSocket handshake failed");
        stream
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Send one JSON event frame.
pub async fn send_json(ws: &mut WsClient, value: &Value) {
    ws.send(WsMessage::Text(value.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Receive the next JSON text frame, skipping control frames.
pub async fn recv_json(ws: &mut WsClient) -> Value {
    recv_json_within(ws, Duration::from_secs(2)).await
}

/// Receive the next JSON text frame, waiting up to `wait` for it.
pub async fn recv_json_within(ws: &mut WsClient, wait: Duration) -> Value {
    loop {
        let msg = tokio::time::timeout(wait, ws.next())
            .await
            .expect("Timed out waiting for an event")
            .expect("Stream ended while waiting for an event")
            .expect("WebSocket error while waiting for an event");

        match msg {
            WsMessage::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Frame was not valid JSON");
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
            other => panic!("Unexpected frame: {:?}", other),
        }
    }
}

/// Receive frames until one has the given `type` tag.
pub async fn recv_event(ws: &mut WsClient, event_type: &str) -> Value {
    recv_event_within(ws, event_type, Duration::from_secs(2)).await
}

/// Receive frames until one has the given `type` tag, allowing `wait` of
/// silence per frame.
pub async fn recv_event_within(ws: &mut WsClient, event_type: &str, wait: Duration) -> Value {
    for _ in 0..20 {
        let event = recv_json_within(ws, wait).await;
        if event["type"] == event_type {
            return event;
        }
    }
    panic!("Never received a '{}' event", event_type);
}

/// Assert that no text frame arrives within `wait`.
pub async fn assert_no_event(ws: &mut WsClient, wait: Duration) {
    let result = tokio::time::timeout(wait, async {
        loop {
            match ws.next().await {
                Some(Ok(WsMessage::Text(text))) => return text.as_str().to_string(),
                Some(Ok(_)) => continue,
                _ => std::future::pending::<()>().await,
            }
        }
    })
    .await;

    if let Ok(text) = result {
        panic!("Expected no event, got: {}", text);
    }
}

/// Wait for the server to close the connection.
pub async fn wait_for_close(ws: &mut WsClient) {
    for _ in 0..20 {
        match tokio::time::timeout(Duration::from_secs(2), ws.next()).await {
            Ok(None) | Ok(Some(Ok(WsMessage::Close(_)))) | Ok(Some(Err(_))) => return,
            Ok(Some(Ok(_))) => continue,
            Err(_) => panic!("Connection was not closed"),
        }
    }
    panic!("Connection was not closed");
}
