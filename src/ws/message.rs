#![expect(
    clippy::module_name_repetitions,
    reason = "Message types expose their domain in the name for clarity"
)]

use std::fmt;

use serde::Serialize;
use tokio_tungstenite::tungstenite::Message;

/// An inbound payload, tagged once at the transport boundary.
///
/// Control frames (ping, pong, close) never become an `InboundMessage`; they
/// are handled by the connection loop. Everything downstream of the boundary
/// pattern-matches this sum type instead of inspecting frames.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InboundMessage {
    /// UTF-8 text frame
    Text(String),
    /// Opaque binary frame
    Binary(Vec<u8>),
}

impl InboundMessage {
    /// Convert a transport frame into a tagged payload.
    ///
    /// Returns `None` for control frames.
    pub(crate) fn from_frame(frame: Message) -> Option<Self> {
        match frame {
            Message::Text(text) => Some(Self::Text(text.as_str().to_owned())),
            Message::Binary(bytes) => Some(Self::Binary(bytes.to_vec())),
            _ => None,
        }
    }

    /// The payload classification of this message.
    #[must_use]
    pub const fn kind(&self) -> PayloadKind {
        match self {
            Self::Text(_) => PayloadKind::Text,
            Self::Binary(_) => PayloadKind::Binary,
        }
    }

    /// Payload length: character count for text, byte count for binary.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    /// Check if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text payload, if this is a text message.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    /// The binary payload, if this is a binary message.
    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(bytes) => Some(bytes),
            Self::Text(_) => None,
        }
    }
}

/// Payload classification reported in log records.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    Text,
    Binary,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Binary => write!(f, "binary"),
        }
    }
}
