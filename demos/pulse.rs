//! Counted-pulse client against a local echo endpoint.
//!
//! Start the echo server first, then run the client:
//!
//! ```sh
//! cargo run --example echo_server
//! RUST_LOG=info cargo run --example pulse
//! ```
//!
//! Once the connection opens, the client emits `send message count: N`
//! every second; the echo server sends each frame back, and every echoed
//! frame is logged with its length, type, and payload.

use std::time::Duration;

use futures::StreamExt as _;
use tokio::time::timeout;
use tracing::{info, warn};
use wspulse::ws::LogRecord;
use wspulse::ws::config::Config;
use wspulse::{Client, DEFAULT_ENDPOINT};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = Client::connect(DEFAULT_ENDPOINT, Config::default())?;
    info!(endpoint = client.endpoint(), state = ?client.state(), "connecting");

    let stream = client.subscribe();
    let mut stream = Box::pin(stream);
    let mut received = 0_u32;

    while let Ok(Some(result)) = timeout(Duration::from_secs(5), stream.next()).await {
        match result {
            Ok(message) => {
                let record = LogRecord::new(&message);
                info!(record = %serde_json::to_string(&record)?, "echo");
                received += 1;
                if received >= 5 {
                    break;
                }
            }
            Err(e) => warn!(error = %e, "stream error"),
        }
    }
    info!(received, "done");

    client.close()?;
    client.closed().await;

    Ok(())
}
