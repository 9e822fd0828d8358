#![expect(
    clippy::module_name_repetitions,
    reason = "Error types include the module name to indicate their scope"
)]

use std::error::Error as StdError;
use std::fmt;

/// WebSocket error variants.
#[non_exhaustive]
#[derive(Debug)]
pub enum WsError {
    /// Error connecting to or communicating with the WebSocket server
    ConnectionFailed(tokio_tungstenite::tungstenite::Error),
    /// A send was attempted after the connection left the open state
    SendAfterClose,
    /// The transport rejected an inbound frame (invalid or oversized payload)
    MalformedPayload(String),
    /// WebSocket connection was closed
    ConnectionClosed,
    /// Subscriber stream lagged and missed messages
    Lagged {
        /// Number of messages that were missed
        count: u64,
    },
}

impl WsError {
    /// Classify a transport error into this module's failure taxonomy.
    pub(crate) fn from_transport(error: tokio_tungstenite::tungstenite::Error) -> Self {
        use tokio_tungstenite::tungstenite::Error as Transport;

        match error {
            Transport::Capacity(_) | Transport::Protocol(_) => {
                Self::MalformedPayload(error.to_string())
            }
            Transport::ConnectionClosed | Transport::AlreadyClosed => Self::ConnectionClosed,
            other => Self::ConnectionFailed(other),
        }
    }
}

impl fmt::Display for WsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed(e) => write!(f, "WebSocket connection error: {e}"),
            Self::SendAfterClose => write!(f, "send attempted on a closed connection"),
            Self::MalformedPayload(reason) => write!(f, "malformed inbound payload: {reason}"),
            Self::ConnectionClosed => write!(f, "WebSocket connection closed"),
            Self::Lagged { count } => write!(f, "subscriber lagged, missed {count} messages"),
        }
    }
}

impl StdError for WsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::ConnectionFailed(e) => Some(e),
            _ => None,
        }
    }
}

// Integration with main Error type
impl From<WsError> for crate::error::Error {
    fn from(e: WsError) -> Self {
        crate::error::Error::with_source(crate::error::Kind::WebSocket, e)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for crate::error::Error {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        crate::error::Error::with_source(crate::error::Kind::WebSocket, WsError::from_transport(e))
    }
}

#[cfg(test)]
mod tests {
    use tokio_tungstenite::tungstenite::Error as Transport;
    use tokio_tungstenite::tungstenite::error::CapacityError;

    use super::*;

    #[test]
    fn capacity_errors_classify_as_malformed_payload() {
        let transport = Transport::Capacity(CapacityError::MessageTooLong {
            size: 1024,
            max_size: 64,
        });

        assert!(matches!(
            WsError::from_transport(transport),
            WsError::MalformedPayload(_)
        ));
    }

    #[test]
    fn closed_transport_classifies_as_connection_closed() {
        assert!(matches!(
            WsError::from_transport(Transport::ConnectionClosed),
            WsError::ConnectionClosed
        ));
    }

    #[test]
    fn ws_error_maps_to_websocket_kind() {
        let error: crate::error::Error = WsError::SendAfterClose.into();

        assert_eq!(error.kind(), crate::error::Kind::WebSocket);
        assert!(matches!(
            error.downcast_ref::<WsError>(),
            Some(WsError::SendAfterClose)
        ));
    }
}
