//! Private and presence channel authorization.
//!
//! A client connection asks the backend to authorize a subscription; the
//! backend answers with `{"auth": "key:signature", "channel_data"?: ...}`.

use pousser_protocol::auth::socket_signature;
use serde::Serialize;
use serde_json::{json, Value};

use crate::channel::{validate_channel, validate_socket_id};
use crate::client::Pousser;
use crate::error::PousserError;

/// Authorization returned to a connecting client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelAuth {
    /// `key:signature`
    pub auth: String,
    /// Signed channel data, for presence channels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<String>,
}

impl ChannelAuth {
    /// JSON document to send back to the client.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Pousser {
    /// Authorize `socket_id` to subscribe to a private channel.
    ///
    /// `custom_data`, when given, is signed and returned as `channel_data`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad channel name or socket id.
    pub fn authorize_channel(
        &self,
        channel: &str,
        socket_id: &str,
        custom_data: Option<&str>,
    ) -> Result<ChannelAuth, PousserError> {
        validate_channel(channel)?;
        validate_socket_id(socket_id)?;

        let signature = socket_signature(self.credentials.secret(), socket_id, channel, custom_data);
        Ok(ChannelAuth {
            auth: format!("{}:{signature}", self.credentials.key()),
            channel_data: custom_data.map(str::to_string),
        })
    }

    /// Authorize `socket_id` to join a presence channel as `user_id`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad channel name or socket id.
    pub fn authorize_presence_channel(
        &self,
        channel: &str,
        socket_id: &str,
        user_id: &str,
        user_info: Option<&Value>,
    ) -> Result<ChannelAuth, PousserError> {
        let mut member = json!({ "user_id": user_id });
        if let Some(info) = user_info {
            member["user_info"] = info.clone();
        }
        self.authorize_channel(channel, socket_id, Some(&member.to_string()))
    }
}
