//! Realtime engine settings.

use serde::{Deserialize, Serialize};

/// Connection, keepalive, and typing indicator knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// Outbound event buffer per connection. When full, events for that
    /// connection are dropped rather than blocking the sender.
    pub channel_buffer_size: usize,
    /// Seconds between keepalive pings.
    pub ping_interval_seconds: u64,
    /// Seconds of pong silence before a connection is declared dead.
    pub ping_timeout_seconds: u64,
    /// Seconds a typing indicator survives without a refresh.
    pub typing_idle_seconds: u64,
    /// Seconds between typing sweep passes.
    pub typing_sweep_interval_seconds: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: 256,
            ping_interval_seconds: 30,
            ping_timeout_seconds: 60,
            typing_idle_seconds: 10,
            typing_sweep_interval_seconds: 5,
        }
    }
}
