#![expect(
    clippy::module_name_repetitions,
    reason = "Connection types expose their domain in the name for clarity"
)]

use std::time::{Duration, Instant};

use futures::{SinkExt as _, StreamExt as _};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{MissedTickBehavior, interval, timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use super::config::Config;
use super::error::WsError;
use super::message::InboundMessage;
use super::sink;
use crate::{Result, error::Error};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection state tracking.
///
/// The lifecycle is strictly forward: `Connecting → Open → Closed`, with
/// `Open → Closing → Closed` on a graceful shutdown from either side. There
/// is no transition back to `Connecting`.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Connection attempt in progress
    Connecting,
    /// Successfully connected
    Open {
        /// When the connection was established
        since: Instant,
    },
    /// Close initiated; remaining frames may still drain
    Closing,
    /// Connection ended, gracefully or after a failure
    Closed,
}

impl ConnectionState {
    /// Check if the connection is currently open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Check if the connection has ended.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Commands accepted by the connection task.
#[derive(Debug)]
enum Command {
    /// Send an application text frame
    Send(String),
    /// Initiate a graceful close
    Close,
}

/// Owns one duplex messaging session to a fixed endpoint.
///
/// The manager establishes the connection in a background task. Once the
/// connection opens it drives the periodic counted-text producer, and for
/// the connection's whole lifetime it dispatches every inbound data frame
/// to the logging sink and to broadcast subscribers, in arrival order.
///
/// Transport faults are never silently ignored: connection failures and
/// mid-stream errors are logged, the producer is halted, and the state
/// moves to [`ConnectionState::Closed`].
///
/// # Example
///
/// ```ignore
/// let connection = ConnectionManager::new("ws://127.0.0.1:8080".to_owned(), config)?;
///
/// // Subscribe to inbound messages
/// let mut rx = connection.subscribe();
/// while let Ok(msg) = rx.recv().await {
///     println!("Received: {msg:?}");
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ConnectionManager {
    /// Watch channel sender for state changes (for handing out receivers)
    state_tx: watch::Sender<ConnectionState>,
    /// Watch channel receiver for state changes (for checking the current state)
    state_rx: watch::Receiver<ConnectionState>,
    /// Sender channel for commands to the connection task
    command_tx: mpsc::UnboundedSender<Command>,
    /// Broadcast sender for incoming messages
    broadcast_tx: broadcast::Sender<InboundMessage>,
}

impl ConnectionManager {
    /// Validate the endpoint and start the connection attempt.
    ///
    /// Returns immediately; the connection proceeds in a background task.
    /// The endpoint must be a `ws://` or `wss://` URL.
    pub fn new(endpoint: String, config: Config) -> Result<Self> {
        let parsed = url::Url::parse(&endpoint)?;
        match parsed.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(Error::validation(format!(
                    "unsupported endpoint scheme '{other}': expected ws or wss"
                )));
            }
        }

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (broadcast_tx, _) = broadcast::channel(config.broadcast_capacity);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);

        let broadcast_tx_clone = broadcast_tx.clone();
        let state_tx_clone = state_tx.clone();

        tokio::spawn(async move {
            Self::connection_task(endpoint, config, command_rx, broadcast_tx_clone, state_tx_clone)
                .await;
        });

        Ok(Self {
            state_tx,
            state_rx,
            command_tx,
            broadcast_tx,
        })
    }

    /// Single connection attempt followed by the session loop.
    async fn connection_task(
        endpoint: String,
        config: Config,
        mut command_rx: mpsc::UnboundedReceiver<Command>,
        broadcast_tx: broadcast::Sender<InboundMessage>,
        state_tx: watch::Sender<ConnectionState>,
    ) {
        _ = state_tx.send(ConnectionState::Connecting);

        let ws_stream = match timeout(config.connect_timeout, connect_async(&endpoint)).await {
            Ok(Ok((ws_stream, _))) => ws_stream,
            Ok(Err(e)) => {
                let error: Error = WsError::from_transport(e).into();
                tracing::warn!(%endpoint, %error, "unable to connect");
                _ = state_tx.send(ConnectionState::Closed);
                return;
            }
            Err(_elapsed) => {
                tracing::warn!(%endpoint, connect_timeout = ?config.connect_timeout, "connection attempt timed out");
                _ = state_tx.send(ConnectionState::Closed);
                return;
            }
        };

        _ = state_tx.send(ConnectionState::Open {
            since: Instant::now(),
        });
        tracing::debug!(%endpoint, "connection open");

        if let Err(e) =
            Self::handle_connection(ws_stream, &mut command_rx, &broadcast_tx, &state_tx, &config)
                .await
        {
            tracing::warn!(%endpoint, error = %e, "connection ended with error");
        }

        _ = state_tx.send(ConnectionState::Closed);
        tracing::debug!(%endpoint, "connection closed");
    }

    /// Handle an active WebSocket connection until it ends.
    async fn handle_connection(
        ws_stream: WsStream,
        command_rx: &mut mpsc::UnboundedReceiver<Command>,
        broadcast_tx: &broadcast::Sender<InboundMessage>,
        state_tx: &watch::Sender<ConnectionState>,
        config: &Config,
    ) -> Result<()> {
        let (mut write, mut read) = ws_stream.split();

        // Channel carrying counted messages from the producer to the writer
        let (produced_tx, mut produced_rx) = mpsc::unbounded_channel();
        let producer_state = state_tx.subscribe();
        let send_interval = config.send_interval;

        let producer_handle = tokio::spawn(async move {
            Self::producer_loop(produced_tx, producer_state, send_interval).await;
        });

        let mut close_sent = false;

        let result = loop {
            tokio::select! {
                // Handle incoming frames
                inbound = read.next() => {
                    match inbound {
                        Some(Ok(Message::Close(frame))) => {
                            tracing::debug!(?frame, "close frame received");
                            _ = state_tx.send(ConnectionState::Closing);
                            if !close_sent {
                                _ = write.send(Message::Close(None)).await;
                            }
                            break Ok(());
                        }
                        Some(Ok(frame)) => {
                            // Data frames are tagged once here; control frames
                            // (ping/pong) are handled by the transport.
                            if let Some(message) = InboundMessage::from_frame(frame) {
                                sink::log_inbound(&message);
                                _ = broadcast_tx.send(message);
                            }
                        }
                        Some(Err(e)) => {
                            break Err(WsError::from_transport(e).into());
                        }
                        None => break Ok(()),
                    }
                }

                // Handle caller commands
                Some(command) = command_rx.recv() => {
                    match command {
                        Command::Send(text) => {
                            if write.send(Message::Text(text.into())).await.is_err() {
                                break Err(WsError::SendAfterClose.into());
                            }
                        }
                        Command::Close => {
                            _ = state_tx.send(ConnectionState::Closing);
                            if !close_sent {
                                close_sent = true;
                                _ = write.send(Message::Close(None)).await;
                            }
                        }
                    }
                }

                // Handle counted messages from the producer
                Some(text) = produced_rx.recv() => {
                    if write.send(Message::Text(text.into())).await.is_err() {
                        break Err(WsError::SendAfterClose.into());
                    }
                }
            }
        };

        // The producer must never outlive the connection.
        producer_handle.abort();

        result
    }

    /// Periodic producer: one counted text message per tick while the
    /// connection is open.
    ///
    /// The interval's first tick resolves immediately and is consumed up
    /// front, so message `n` goes out `n` full periods after open. Missed
    /// ticks are skipped rather than replayed in a burst; the count stays
    /// strictly increasing either way.
    async fn producer_loop(
        produced_tx: mpsc::UnboundedSender<String>,
        state_rx: watch::Receiver<ConnectionState>,
        send_interval: Duration,
    ) {
        let mut ticker = interval(send_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        let mut count: u64 = 0;

        loop {
            ticker.tick().await;

            // Only the open state enables the producer.
            if !state_rx.borrow().is_open() {
                break;
            }

            count += 1;
            tracing::trace!(count, "producer tick");
            if produced_tx
                .send(format!("send message count: {count}"))
                .is_err()
            {
                break;
            }
        }
    }

    /// Queue an application text frame for sending.
    ///
    /// Frames queued while still connecting are written once the connection
    /// opens; nothing hits the wire before the open state. Sends after the
    /// connection starts closing fail with [`WsError::SendAfterClose`].
    pub fn send(&self, text: &str) -> Result<()> {
        let state = *self.state_rx.borrow();
        if matches!(state, ConnectionState::Closing | ConnectionState::Closed) {
            return Err(WsError::SendAfterClose.into());
        }
        self.command_tx
            .send(Command::Send(text.to_owned()))
            .map_err(|_e| WsError::SendAfterClose)?;
        Ok(())
    }

    /// Request a graceful close.
    ///
    /// The close frame is sent to the peer, the producer halts, and the
    /// state settles at [`ConnectionState::Closed`] once the peer
    /// acknowledges or the stream ends.
    pub fn close(&self) -> Result<()> {
        self.command_tx
            .send(Command::Close)
            .map_err(|_e| WsError::ConnectionClosed)?;
        Ok(())
    }

    /// Get the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Subscribe to incoming messages.
    ///
    /// Each call returns a new independent receiver. Multiple subscribers
    /// can receive messages concurrently without blocking each other.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<InboundMessage> {
        self.broadcast_tx.subscribe()
    }

    /// Subscribe to connection state changes.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Wait until the connection reaches the closed state.
    pub async fn closed(&self) {
        let mut state_rx = self.state_rx.clone();
        _ = state_rx.wait_for(|state| state.is_closed()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_state_is_open() {
        let state = ConnectionState::Open {
            since: Instant::now(),
        };

        assert!(state.is_open());
        assert!(!state.is_closed());
    }

    #[test]
    fn terminal_states_are_not_open() {
        assert!(!ConnectionState::Connecting.is_open());
        assert!(!ConnectionState::Closing.is_open());
        assert!(!ConnectionState::Closed.is_open());
        assert!(ConnectionState::Closed.is_closed());
    }

    #[test]
    fn non_websocket_scheme_is_rejected() {
        let result = ConnectionManager::new("http://127.0.0.1:8080".to_owned(), Config::default());

        let error = result.expect_err("http endpoints must be rejected");
        assert_eq!(error.kind(), crate::error::Kind::Validation);
    }

    #[test]
    fn unparseable_endpoint_is_rejected() {
        let result = ConnectionManager::new("not an endpoint".to_owned(), Config::default());

        let error = result.expect_err("garbage endpoints must be rejected");
        assert_eq!(error.kind(), crate::error::Kind::Internal);
    }
}
