//! Incoming webhook verification.
//!
//! The service signs each webhook body with the app secret and names the app
//! key in a header. Both must match before the body is trusted.

use pousser_protocol::auth::verify_webhook_signature;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::client::Pousser;

/// Header naming the app key.
pub const KEY_HEADER: &str = "x-pousser-key";

/// Header carrying the hex HMAC-SHA256 of the body.
pub const SIGNATURE_HEADER: &str = "x-pousser-signature";

/// Webhook verification errors.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The key header names a different app.
    #[error("Webhook key does not match this client")]
    InvalidKey,

    /// The signature does not match the body.
    #[error("Webhook signature is invalid")]
    InvalidSignature,

    /// The body is not a webhook document.
    #[error("Malformed webhook body: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A verified webhook.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Webhook {
    /// Time the webhook was generated, in Unix milliseconds.
    pub time_ms: u64,
    /// Events in the order they occurred.
    pub events: Vec<WebhookEvent>,
}

/// One event inside a webhook.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookEvent {
    /// Event kind, e.g. `channel_occupied` or `member_added`.
    pub name: String,
    /// Channel the event concerns.
    #[serde(default)]
    pub channel: Option<String>,
    /// Client event name, for `client_event`.
    #[serde(default)]
    pub event: Option<String>,
    /// Client event payload, still JSON-encoded.
    #[serde(default)]
    pub data: Option<String>,
    /// Connection that sent a client event.
    #[serde(default)]
    pub socket_id: Option<String>,
    /// Presence member, for `member_added` and `member_removed`.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Pousser {
    /// Verify and decode a webhook.
    ///
    /// `key` and `signature` are the values of [`KEY_HEADER`] and
    /// [`SIGNATURE_HEADER`]; `body` is the raw request body.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or signature does not match, or the body
    /// cannot be decoded.
    pub fn webhook(&self, key: &str, signature: &str, body: &[u8]) -> Result<Webhook, WebhookError> {
        if key != self.credentials.key() {
            warn!("Webhook rejected: key mismatch");
            return Err(WebhookError::InvalidKey);
        }
        if !verify_webhook_signature(self.credentials.secret(), body, signature) {
            warn!("Webhook rejected: signature mismatch");
            return Err(WebhookError::InvalidSignature);
        }
        Ok(serde_json::from_slice(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, Settings};
    use pousser_protocol::auth::webhook_signature;

    fn client() -> Pousser {
        Pousser::new(
            Credentials::new("app-key", "app-secret", "1"),
            Settings {
                host: "api.pousser.io".to_string(),
                ..Settings::default()
            },
        )
        .unwrap()
    }

    const BODY: &[u8] =
        br#"{"time_ms":1700000000000,"events":[{"name":"channel_occupied","channel":"room1"}]}"#;

    #[test]
    fn test_valid_webhook() {
        let signature = webhook_signature("app-secret", BODY);
        let webhook = client().webhook("app-key", &signature, BODY).unwrap();

        assert_eq!(webhook.time_ms, 1_700_000_000_000);
        assert_eq!(webhook.events.len(), 1);
        assert_eq!(webhook.events[0].name, "channel_occupied");
        assert_eq!(webhook.events[0].channel.as_deref(), Some("room1"));
    }

    #[test]
    fn test_webhook_optional_fields() {
        let body = br#"{"time_ms":1,"events":[
            {"name":"member_added","channel":"presence-room","user_id":"u1"},
            {"name":"client_event","channel":"private-room","event":"client-typing","data":"{}","socket_id":"1.2"}
        ]}"#;
        let signature = webhook_signature("app-secret", body);
        let webhook = client().webhook("app-key", &signature, body).unwrap();

        let member = &webhook.events[0];
        assert_eq!(member.user_id.as_deref(), Some("u1"));
        assert!(member.event.is_none() && member.socket_id.is_none());

        let client_event = &webhook.events[1];
        assert_eq!(client_event.event.as_deref(), Some("client-typing"));
        assert_eq!(client_event.data.as_deref(), Some("{}"));
        assert_eq!(client_event.socket_id.as_deref(), Some("1.2"));
        assert!(client_event.user_id.is_none());
    }

    #[test]
    fn test_webhook_wrong_key() {
        let signature = webhook_signature("app-secret", BODY);
        assert!(matches!(
            client().webhook("other-key", &signature, BODY),
            Err(WebhookError::InvalidKey)
        ));
    }

    #[test]
    fn test_webhook_wrong_signature() {
        let signature = webhook_signature("other-secret", BODY);
        assert!(matches!(
            client().webhook("app-key", &signature, BODY),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn test_webhook_malformed_body() {
        let body = b"not json";
        let signature = webhook_signature("app-secret", body);
        assert!(matches!(
            client().webhook("app-key", &signature, body),
            Err(WebhookError::Malformed(_))
        ));
    }
}
