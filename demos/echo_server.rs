//! Local WebSocket echo endpoint for the pulse demo.
//!
//! Accepts connections on `127.0.0.1:8080` and echoes every text or binary
//! frame back to the sender.
//!
//! ```sh
//! RUST_LOG=info cargo run --example echo_server
//! ```

use futures::{SinkExt as _, StreamExt as _};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let listener = TcpListener::bind("127.0.0.1:8080").await?;
    info!(addr = %listener.local_addr()?, "echo server listening");

    while let Ok((stream, peer)) = listener.accept().await {
        tokio::spawn(async move {
            let Ok(ws_stream) = tokio_tungstenite::accept_async(stream).await else {
                warn!(%peer, "handshake failed");
                return;
            };
            info!(%peer, "client connected");

            let (mut write, mut read) = ws_stream.split();
            while let Some(Ok(frame)) = read.next().await {
                if (frame.is_text() || frame.is_binary()) && write.send(frame).await.is_err() {
                    break;
                }
            }
            info!(%peer, "client disconnected");
        });
    }

    Ok(())
}
