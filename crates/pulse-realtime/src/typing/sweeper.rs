//! Periodic expiry of stale typing indicators.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use pulse_core::config::RealtimeConfig;

use super::store::TypingStore;

/// Sweeps the typing store every `typing_sweep_interval_seconds`, removing
/// entries idle beyond `typing_idle_seconds`, until shutdown is signalled.
pub async fn run_sweeper(
    store: Arc<TypingStore>,
    config: RealtimeConfig,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(
        config.typing_sweep_interval_seconds,
    ));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let idle = chrono::Duration::seconds(config.typing_idle_seconds as i64);

    info!(
        idle_secs = config.typing_idle_seconds,
        sweep_secs = config.typing_sweep_interval_seconds,
        "Typing sweeper started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = store.sweep(idle);
                if removed > 0 {
                    debug!(removed, remaining = store.len(), "Expired stale typing indicators");
                }
            }
            _ = shutdown.recv() => {
                info!("Typing sweeper stopping");
                break;
            }
        }
    }
}
