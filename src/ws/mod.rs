//! Core WebSocket infrastructure.
//!
//! This module owns the full lifecycle of one duplex messaging session:
//! establishing the connection, driving the periodic counted-text producer
//! once the connection is open, and dispatching every inbound frame to the
//! structured logging sink and to subscribers.
//!
//! # Architecture
//!
//! - [`ConnectionManager`]: connection lifecycle, producer and inbound dispatch
//! - [`InboundMessage`]: inbound payloads, tagged once at the transport boundary
//! - [`sink`]: the structured log record emitted for every inbound message
//!
//! # Example
//!
//! ```ignore
//! let connection = ConnectionManager::new(endpoint, Config::default())?;
//!
//! let mut rx = connection.subscribe();
//! while let Ok(msg) = rx.recv().await {
//!     println!("Received: {msg:?}");
//! }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod message;
pub mod sink;

pub use connection::{ConnectionManager, ConnectionState};
#[expect(
    clippy::module_name_repetitions,
    reason = "WsError includes module name for clarity when used outside this module"
)]
pub use error::WsError;
pub use message::{InboundMessage, PayloadKind};
pub use sink::LogRecord;
