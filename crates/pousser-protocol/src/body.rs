//! JSON request bodies for the publish endpoints.
//!
//! Field order is part of the wire contract: the `body_md5` parameter is
//! computed over the exact serialized bytes, so structs are serialized in
//! declaration order and never re-encoded after hashing.

use serde::{Deserialize, Serialize};

/// Body of a single-event publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishBody {
    /// Event name.
    #[serde(rename = "eventName")]
    pub event_name: String,
    /// Event payload, already JSON-encoded.
    pub data: String,
    /// Target channels.
    pub channels: Vec<String>,
    /// Connection to exclude from delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
}

impl PublishBody {
    /// Create a publish body without an excluded socket.
    #[must_use]
    pub fn new(event_name: impl Into<String>, data: impl Into<String>, channels: Vec<String>) -> Self {
        Self {
            event_name: event_name.into(),
            data: data.into(),
            channels,
            socket_id: None,
        }
    }

    /// Exclude a connection from delivery.
    #[must_use]
    pub fn with_socket_id(mut self, socket_id: impl Into<String>) -> Self {
        self.socket_id = Some(socket_id.into());
        self
    }

    /// Serialize to the exact JSON string sent on the wire.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One event inside a batch publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Target channel.
    pub channel: String,
    /// Event name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Event payload, already JSON-encoded.
    pub data: String,
    /// Connection to exclude from delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
}

/// Body of a batch publish.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchBody {
    /// Events in submission order.
    pub batch: Vec<BatchItem>,
}

impl BatchBody {
    /// Serialize to the exact JSON string sent on the wire.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_body_field_order() {
        let body = PublishBody::new("msg", r#"{"text":"hi"}"#, vec!["room1".to_string()]);
        assert_eq!(
            body.to_json().unwrap(),
            r#"{"eventName":"msg","data":"{\"text\":\"hi\"}","channels":["room1"]}"#
        );
    }

    #[test]
    fn test_publish_body_socket_id() {
        let body = PublishBody::new("msg", "x", vec!["a".to_string()]).with_socket_id("1.2");
        let json = body.to_json().unwrap();
        assert!(json.ends_with(r#""socket_id":"1.2"}"#));
    }

    #[test]
    fn test_batch_body_omits_absent_fields() {
        let body = BatchBody {
            batch: vec![BatchItem {
                channel: "a".to_string(),
                event: None,
                data: "1".to_string(),
                socket_id: None,
            }],
        };
        assert_eq!(
            body.to_json().unwrap(),
            r#"{"batch":[{"channel":"a","data":"1"}]}"#
        );
    }
}
