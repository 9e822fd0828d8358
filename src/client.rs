use std::sync::Arc;

use async_stream::try_stream;
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;

use crate::Result;
use crate::ws::config::Config;
use crate::ws::connection::{ConnectionManager, ConnectionState};
use crate::ws::error::WsError;
use crate::ws::message::InboundMessage;

/// Duplex messaging client over one WebSocket connection.
///
/// Connecting starts the connection attempt in the background. Once the
/// connection opens, the periodic producer emits one counted text message
/// (`send message count: N`, 1-indexed) per configured interval, and every
/// inbound message is logged through the structured sink and fanned out to
/// subscribers.
///
/// # Examples
///
/// ```rust, no_run
/// use futures::StreamExt;
/// use wspulse::Client;
/// use wspulse::ws::config::Config;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = Client::connect("ws://127.0.0.1:8080", Config::default())?;
///
///     let stream = client.subscribe();
///     let mut stream = Box::pin(stream);
///
///     while let Some(message) = stream.next().await {
///         println!("Received: {:?}", message?);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    /// Endpoint this client connects to
    endpoint: String,
    /// Connection manager for the WebSocket
    connection: ConnectionManager,
}

impl Default for Client {
    fn default() -> Self {
        Self::connect(crate::DEFAULT_ENDPOINT, Config::default())
            .expect("client with default endpoint should succeed")
    }
}

impl Client {
    /// Start a connection attempt to `endpoint` and return the client handle.
    ///
    /// The attempt proceeds in the background; observe it through
    /// [`Client::state`] or [`Client::closed`]. A failed attempt is logged
    /// and settles the state at closed rather than panicking.
    pub fn connect(endpoint: &str, config: Config) -> Result<Self> {
        let connection = ConnectionManager::new(endpoint.to_owned(), config)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                endpoint: endpoint.to_owned(),
                connection,
            }),
        })
    }

    /// The endpoint this client connects to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Get the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.inner.connection.state()
    }

    /// Queue an application text frame for sending.
    ///
    /// Frames queued before the connection opens are written once it does;
    /// sends after the connection starts closing fail with
    /// [`WsError::SendAfterClose`].
    pub fn send_text(&self, text: &str) -> Result<()> {
        self.inner.connection.send(text)
    }

    /// Request a graceful close.
    pub fn close(&self) -> Result<()> {
        self.inner.connection.close()
    }

    /// Wait until the connection reaches the closed state.
    pub async fn closed(&self) {
        self.inner.connection.closed().await;
    }

    /// Subscribe to inbound messages.
    ///
    /// Each call returns a new independent stream yielding messages in
    /// arrival order. A subscriber that falls behind the broadcast capacity
    /// observes [`WsError::Lagged`].
    pub fn subscribe(&self) -> impl Stream<Item = Result<InboundMessage>> {
        let mut rx = self.inner.connection.subscribe();

        try_stream! {
            loop {
                match rx.recv().await {
                    Ok(message) => yield message,
                    Err(RecvError::Lagged(count)) => {
                        tracing::warn!(missed = count, "subscriber lagged");
                        Err(WsError::Lagged { count })?;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[test]
    fn connect_rejects_non_websocket_scheme() {
        let result = Client::connect("https://127.0.0.1:8080", Config::default());

        let error = result.expect_err("https endpoints must be rejected");
        assert_eq!(error.kind(), Kind::Validation);
    }

    #[tokio::test]
    async fn endpoint_is_reported_back() {
        let client =
            Client::connect("ws://127.0.0.1:9", Config::default()).expect("valid endpoint");

        assert_eq!(client.endpoint(), "ws://127.0.0.1:9");
    }
}
