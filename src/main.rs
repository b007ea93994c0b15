//! Pulse server binary.
//!
//! Wires the credential gate, push fallback, notification ledger, and
//! realtime engine together, then serves the HTTP/WebSocket surface until
//! a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use pulse_api::AppState;
use pulse_auth::{CredentialGate, RevocationList, run_pruner};
use pulse_core::config::AppConfig;
use pulse_core::error::AppError;
use pulse_core::traits::{DeviceTokenStore, NotificationLedger, PushProvider};
use pulse_push::{
    DisabledPushProvider, FcmClient, MemoryDeviceTokenStore, PushFallback, load_service_account,
};
use pulse_realtime::{MemoryNotificationLedger, RealtimeEngine};

#[tokio::main]
async fn main() {
    let env = std::env::var("PULSE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = AppConfig::load(&env).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {e}");
        std::process::exit(1);
    });

    init_logging(&config);

    if let Err(e) = run(config).await {
        error!(error = %e, "Server exited with an error");
        std::process::exit(1);
    }
}

/// Installs the global tracing subscriber per the logging config.
///
/// `RUST_LOG` overrides the configured level when set.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "pretty" => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    info!(version = env!("CARGO_PKG_VERSION"), "Starting Pulse");

    // ── Step 1: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 2: Credential gate ──────────────────────────────────
    let revocations = Arc::new(RevocationList::new());
    let gate = Arc::new(CredentialGate::new(&config.auth, Arc::clone(&revocations)));

    let prune_interval = Duration::from_secs(config.auth.revocation_prune_interval_hours * 3600);
    let pruner_handle = tokio::spawn(run_pruner(revocations, prune_interval, shutdown_rx));
    info!("Credential gate initialized");

    // ── Step 3: Device token store ───────────────────────────────
    let device_tokens: Arc<dyn DeviceTokenStore> = Arc::new(MemoryDeviceTokenStore::new());

    // ── Step 4: Push fallback ────────────────────────────────────
    let provider: Arc<dyn PushProvider> = if config.push.enabled {
        info!(path = %config.push.credentials_path, "Loading push credentials");
        let key = load_service_account(&config.push.credentials_path)?;
        let client = FcmClient::new(key, &config.push)?;
        info!("Push provider initialized");
        Arc::new(client)
    } else {
        info!("Push fallback disabled");
        Arc::new(DisabledPushProvider)
    };
    let push = Arc::new(PushFallback::new(Arc::clone(&device_tokens), provider));

    // ── Step 5: Notification ledger ──────────────────────────────
    let ledger: Arc<dyn NotificationLedger> = Arc::new(MemoryNotificationLedger::new());

    // ── Step 6: Realtime engine ──────────────────────────────────
    let engine = Arc::new(RealtimeEngine::new(config.realtime.clone(), push, ledger));
    engine.start_sweeper();
    info!("Realtime engine initialized");

    // ── Step 7: HTTP surface ─────────────────────────────────────
    let app_state = AppState::new(
        Arc::new(config.clone()),
        gate,
        Arc::clone(&engine),
        device_tokens,
    );
    let app = pulse_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Could not bind {addr}: {e}")))?;
    info!(%addr, "Pulse server listening");

    // ── Step 8: Serve until shutdown ─────────────────────────────
    // Closing the engine's connections lets axum drain the long-lived
    // WebSocket sessions instead of waiting on them forever.
    let engine_for_shutdown = Arc::clone(&engine);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received, draining");
            let _ = shutdown_tx.send(true);
            engine_for_shutdown.shutdown();
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 9: Background task teardown ─────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let _ = tokio::time::timeout(grace, pruner_handle).await;

    info!("Pulse server shut down cleanly");
    Ok(())
}

/// Resolves when the process receives Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Ctrl+C handler installation failed");
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{SignalKind, signal};
        signal(SignalKind::terminate())
            .expect("SIGTERM handler installation failed")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = sigterm => {}
    }
}
