//! Structured logging sink for inbound messages.
//!
//! Every inbound message produces exactly one record with three fields:
//! `message_length` (characters for text, bytes for binary), `message_type`
//! (`"text"` or `"binary"`), and `message_data` (the raw payload).

use serde::Serialize;

use super::message::{InboundMessage, PayloadKind};

/// One log record per inbound message.
///
/// Records are ephemeral: built from a received message, emitted, and
/// dropped. The type is [`Serialize`] so sinks can render it as JSON.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Character count for text payloads, byte count for binary payloads
    pub message_length: usize,
    /// Payload classification
    pub message_type: PayloadKind,
    /// The raw payload
    pub message_data: InboundMessage,
}

impl LogRecord {
    #[must_use]
    pub fn new(message: &InboundMessage) -> Self {
        Self {
            message_length: message.len(),
            message_type: message.kind(),
            message_data: message.clone(),
        }
    }
}

impl From<&InboundMessage> for LogRecord {
    fn from(message: &InboundMessage) -> Self {
        Self::new(message)
    }
}

/// Emit the log record for one inbound message.
///
/// This path never fails: the payload was already classified at the
/// transport boundary, so there is nothing left to go wrong here.
pub fn log_inbound(message: &InboundMessage) {
    match message {
        InboundMessage::Text(text) => {
            tracing::info!(
                message_length = message.len(),
                message_type = %PayloadKind::Text,
                message_data = %text,
                "inbound message"
            );
        }
        InboundMessage::Binary(bytes) => {
            tracing::info!(
                message_length = bytes.len(),
                message_type = %PayloadKind::Binary,
                message_data = ?bytes,
                "inbound message"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_for_text_reports_character_length() {
        let message = InboundMessage::Text("hello".to_owned());
        let record = LogRecord::new(&message);

        assert_eq!(record.message_length, 5);
        assert_eq!(record.message_type, PayloadKind::Text);
        assert_eq!(record.message_data, message);
    }

    #[test]
    fn record_for_binary_reports_byte_length() {
        let message = InboundMessage::Binary(vec![0xAB; 10]);
        let record = LogRecord::new(&message);

        assert_eq!(record.message_length, 10);
        assert_eq!(record.message_type, PayloadKind::Binary);
    }

    #[test]
    fn record_serializes_with_all_three_fields() {
        let message = InboundMessage::Text("hello".to_owned());
        let record = LogRecord::from(&message);

        let json = serde_json::to_value(&record).expect("record must serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "message_length": 5,
                "message_type": "text",
                "message_data": "hello",
            })
        );
    }

    #[test]
    fn binary_record_serializes_payload_as_bytes() {
        let message = InboundMessage::Binary(vec![1, 2, 3]);
        let record = LogRecord::new(&message);

        let json = serde_json::to_value(&record).expect("record must serialize");
        assert_eq!(json["message_type"], "binary");
        assert_eq!(json["message_data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn logging_any_payload_does_not_panic() {
        log_inbound(&InboundMessage::Text(String::new()));
        log_inbound(&InboundMessage::Text("\u{fffd}\u{0}".to_owned()));
        log_inbound(&InboundMessage::Binary(vec![]));
        log_inbound(&InboundMessage::Binary(vec![0xFF; 64]));
    }
}
