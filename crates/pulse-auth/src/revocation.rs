//! In-process token revocation list.
//!
//! Logout and moderation flows insert tokens here so the gate can reject
//! them before their natural expiry. Entries are keyed by a SHA-256
//! fingerprint of the raw token, so the list never stores credential
//! material, and a background pruner drops entries once the underlying
//! token would have expired anyway.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Fingerprints of revoked tokens, each paired with the token's expiry.
#[derive(Debug, Default)]
pub struct RevocationList {
    entries: DashMap<String, i64>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Mark a token as revoked until `expires_at` (seconds since the epoch).
    ///
    /// The entry only needs to outlive the token itself; once the token is
    /// past its `exp` the claims validation rejects it regardless.
    pub fn revoke(&self, token: &str, expires_at: i64) {
        self.entries.insert(fingerprint(token), expires_at);
    }

    /// Whether a token has been revoked.
    ///
    /// Expiry is deliberately not consulted here: a revoked token stays
    /// revoked until the pruner removes it, so the gate reports `Revoked`
    /// rather than `Expired` for tokens that are both.
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(&fingerprint(token))
    }

    /// Drop entries whose tokens have expired. Returns how many were removed.
    pub fn prune(&self) -> usize {
        self.prune_at(Utc::now().timestamp())
    }

    fn prune_at(&self, now: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn fingerprint(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Periodically prune the revocation list until shutdown is signalled.
pub async fn run_pruner(
    list: Arc<RevocationList>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; skip it so we start with a full
    // interval of quiet.
    ticker.tick().await;

    info!(interval_secs = interval.as_secs(), "Revocation pruner started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = list.prune();
                if removed > 0 {
                    debug!(removed, remaining = list.len(), "Pruned expired revocation entries");
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("Revocation pruner stopping");
                    break;
                }
            }
        }
    }
}
