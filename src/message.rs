//! Message record reconstructed from an export.
//!
//! This module provides [`Message`], the normalized representation of one
//! SMS or MMS record. The record parser produces them, the
//! [`MessageStore`](crate::store::MessageStore) orders them and the writers
//! turn them into transcripts and attachment files.
//!
//! # Examples
//!
//! ```
//! use smsxtract::message::{Direction, Message, MessageKind};
//!
//! let msg = Message::text("5551234567", Direction::Outgoing, 1000, "Jan 1, 2015", "Bob", "hi");
//! assert_eq!(msg.kind(), MessageKind::Text);
//! assert!(msg.payload().is_none());
//! ```
//!
//! Attachments always carry their bytes:
//!
//! ```
//! use smsxtract::message::{Direction, Message};
//!
//! let msg = Message::attachment(
//!     "5551234567",
//!     Direction::Incoming,
//!     2000,
//!     "Jan 1, 2015",
//!     "Bob",
//!     "look",
//!     vec![0xFF, 0xD8],
//!     "img_001.jpg",
//! );
//! assert!(msg.is_attachment());
//! assert_eq!(msg.payload_name(), Some("img_001.jpg"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record kind, decided by which marker triggered detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain SMS (`<sms protocol ...>` line)
    Text,
    /// MMS part carrying an image or video
    Attachment,
}

/// Whether a message was sent or received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Received from the contact
    Incoming,
    /// Sent to the contact
    Outgoing,
    /// Source code was neither `1` nor `2`
    #[default]
    Unknown,
}

impl Direction {
    /// Maps the SMS `type` attribute: `1` is received, `2` is sent.
    ///
    /// ```
    /// use smsxtract::message::Direction;
    ///
    /// assert_eq!(Direction::from_code("1"), Direction::Incoming);
    /// assert_eq!(Direction::from_code("2"), Direction::Outgoing);
    /// assert_eq!(Direction::from_code("5"), Direction::Unknown);
    /// ```
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => Direction::Incoming,
            "2" => Direction::Outgoing,
            _ => Direction::Unknown,
        }
    }

    /// Transcript header prefix placed before the display date.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Incoming => "Received on ",
            Direction::Outgoing => "Sent on ",
            Direction::Unknown => "",
        }
    }
}

/// A single message or attachment record.
///
/// | Field | Description |
/// |-------|-------------|
/// | `address` | Normalized grouping key (see [`normalize_address`](crate::parsing::normalize_address)) |
/// | `direction` | Sent / received |
/// | `timestamp` | Source `date` in epoch milliseconds, sorts as an integer |
/// | `display_date` | Source `readable_date`, shown verbatim |
/// | `contact_name` | Name shown next to the address |
/// | `body` | Text, or the attachment caption |
/// | `payload` | Decoded bytes, attachments only |
/// | `payload_name` | File name for the payload |
///
/// The payload is left out of serialized output; only its name and size
/// matter outside the writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    kind: MessageKind,
    pub address: String,
    pub direction: Direction,
    pub timestamp: i64,
    pub display_date: String,
    pub contact_name: String,
    pub body: String,
    #[serde(skip)]
    payload: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_name: Option<String>,
}

impl Message {
    /// Creates a text message.
    pub fn text(
        address: impl Into<String>,
        direction: Direction,
        timestamp: i64,
        display_date: impl Into<String>,
        contact_name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            kind: MessageKind::Text,
            address: address.into(),
            direction,
            timestamp,
            display_date: display_date.into(),
            contact_name: contact_name.into(),
            body: body.into(),
            payload: None,
            payload_name: None,
        }
    }

    /// Creates an attachment-bearing message.
    #[allow(clippy::too_many_arguments)]
    pub fn attachment(
        address: impl Into<String>,
        direction: Direction,
        timestamp: i64,
        display_date: impl Into<String>,
        contact_name: impl Into<String>,
        body: impl Into<String>,
        payload: Vec<u8>,
        payload_name: impl Into<String>,
    ) -> Self {
        Self {
            kind: MessageKind::Attachment,
            address: address.into(),
            direction,
            timestamp,
            display_date: display_date.into(),
            contact_name: contact_name.into(),
            body: body.into(),
            payload: Some(payload),
            payload_name: Some(payload_name.into()),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn is_attachment(&self) -> bool {
        self.kind == MessageKind::Attachment
    }

    /// Decoded attachment bytes; `None` for text messages.
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// File name the payload is written under; `None` for text messages.
    pub fn payload_name(&self) -> Option<&str> {
        self.payload_name.as_deref()
    }

    /// Timestamp as a UTC datetime, when it is in range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_attachment() -> Message {
        Message::attachment(
            "5551234567",
            Direction::Outgoing,
            5,
            "Jan 1, 2015",
            "Bob",
            "",
            vec![1, 2, 3],
            "photo.png",
        )
    }

    #[test]
    fn test_text_has_no_payload() {
        let msg = Message::text("1", Direction::Incoming, 0, "", "", "hi");
        assert_eq!(msg.kind(), MessageKind::Text);
        assert!(!msg.is_attachment());
        assert!(msg.payload().is_none());
        assert!(msg.payload_name().is_none());
    }

    #[test]
    fn test_attachment_has_payload() {
        let msg = sample_attachment();
        assert_eq!(msg.kind(), MessageKind::Attachment);
        assert_eq!(msg.payload(), Some(&[1u8, 2, 3][..]));
        assert_eq!(msg.payload_name(), Some("photo.png"));
    }

    #[test]
    fn test_direction_labels() {
        assert_eq!(Direction::Incoming.label(), "Received on ");
        assert_eq!(Direction::Outgoing.label(), "Sent on ");
        assert_eq!(Direction::Unknown.label(), "");
    }

    #[test]
    fn test_direction_from_code_trims() {
        assert_eq!(Direction::from_code(" 2 "), Direction::Outgoing);
        assert_eq!(Direction::from_code(""), Direction::Unknown);
    }

    #[test]
    fn test_datetime_from_millis() {
        let msg = Message::text("1", Direction::Incoming, 1_420_070_400_000, "", "", "");
        let dt = msg.datetime().unwrap();
        assert_eq!(dt.to_rfc3339(), "2015-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_serialize_skips_payload() {
        let json = serde_json::to_string(&sample_attachment()).unwrap();
        assert!(json.contains("\"kind\":\"attachment\""));
        assert!(json.contains("photo.png"));
        assert!(!json.contains("payload\":["));
    }
}
