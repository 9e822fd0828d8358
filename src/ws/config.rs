use std::time::Duration;

const DEFAULT_SEND_INTERVAL_DURATION: Duration = Duration::from_millis(1000);
const DEFAULT_CONNECT_TIMEOUT_DURATION: Duration = Duration::from_secs(10);

/// Broadcast channel capacity for incoming messages.
const DEFAULT_BROADCAST_CAPACITY: usize = 1024;

/// Configuration for WebSocket client behavior.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Config {
    /// Interval between counted outbound messages once the connection is open
    pub send_interval: Duration,
    /// Maximum time to wait for the connection handshake to complete
    pub connect_timeout: Duration,
    /// Capacity of the broadcast channel fanning out inbound messages
    pub broadcast_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            send_interval: DEFAULT_SEND_INTERVAL_DURATION,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_DURATION,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}
