//! Channel and presence queries.

use pousser_protocol::auth::{unix_timestamp, QueryParams};
use serde_json::{json, Value};
use tracing::debug;

use crate::channel::validate_channel;
use crate::client::Pousser;
use crate::error::PousserError;
use crate::log::{context, LogLevel};
use crate::response::{decode_query, QueryFailure, Response};

/// One occupied channel from [`Pousser::get_channels`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    /// Channel name.
    pub name: String,
    /// Distinct users, when requested via `info=user_count`.
    pub user_count: Option<u64>,
    /// Connections, when requested via `info=subscription_count`.
    pub subscription_count: Option<u64>,
    /// Occupancy flag, when present.
    pub occupied: Option<bool>,
}

impl ChannelEntry {
    fn from_info(name: &str, info: &Value) -> Self {
        Self {
            name: name.to_string(),
            user_count: info.get("user_count").and_then(Value::as_u64),
            subscription_count: info.get("subscription_count").and_then(Value::as_u64),
            occupied: info.get("occupied").and_then(Value::as_bool),
        }
    }
}

/// A user connected to a presence channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceUser {
    /// User id, as given at authorization.
    pub id: String,
}

/// Flatten `{"channels": {name: info, ...}}` into a list.
fn flatten_channels(decoded: &Value) -> Vec<ChannelEntry> {
    decoded
        .get("channels")
        .and_then(Value::as_object)
        .map(|channels| {
            channels
                .iter()
                .map(|(name, info)| ChannelEntry::from_info(name, info))
                .collect()
        })
        .unwrap_or_default()
}

/// Extract `{"users": [{"id": ...}, ...]}`. Numeric ids are stringified.
fn presence_users(decoded: &Value) -> Vec<PresenceUser> {
    decoded
        .get("users")
        .and_then(Value::as_array)
        .map(|users| {
            users
                .iter()
                .filter_map(|user| match user.get("id")? {
                    Value::String(id) => Some(id.clone()),
                    Value::Number(id) => Some(id.to_string()),
                    _ => None,
                })
                .map(|id| PresenceUser { id })
                .collect()
        })
        .unwrap_or_default()
}

impl Pousser {
    /// Signed GET of an app-scoped path, e.g. `/channels`.
    ///
    /// Returns the response with its decoded JSON body on `200`, `None` for
    /// anything else. Failures are logged.
    pub fn get(&mut self, path: &str, params: &QueryParams) -> Option<Response> {
        let request = self
            .requests()
            .get(&self.app_path(path), params, unix_timestamp());
        let response = self.dispatch(&request);

        match decode_query(response) {
            Ok(response) => Some(response),
            Err(QueryFailure::Status(status)) => {
                debug!(path, status, "Query returned no result");
                None
            }
            Err(QueryFailure::Decode(error)) => {
                self.log(
                    LogLevel::Error,
                    "GET {path} returned a body that is not JSON: {error}",
                    &context([("path", json!(path)), ("error", json!(error.to_string()))]),
                );
                None
            }
        }
    }

    /// Information about one channel.
    ///
    /// # Errors
    ///
    /// Returns [`PousserError::InvalidChannelName`] before sending anything.
    pub fn get_channel_info(
        &mut self,
        channel: &str,
        params: &QueryParams,
    ) -> Result<Option<Value>, PousserError> {
        validate_channel(channel)?;
        Ok(self
            .get(&format!("/channels/{channel}"), params)
            .and_then(|response| response.decoded))
    }

    /// All occupied channels, as a flat list.
    pub fn get_channels(&mut self, params: &QueryParams) -> Option<Vec<ChannelEntry>> {
        let response = self.get("/channels", params)?;
        response.decoded.as_ref().map(flatten_channels)
    }

    /// Raw users response for a presence channel.
    ///
    /// # Errors
    ///
    /// Returns [`PousserError::InvalidChannelName`] before sending anything.
    pub fn get_users_info(&mut self, channel: &str) -> Result<Option<Response>, PousserError> {
        validate_channel(channel)?;
        Ok(self.get(&format!("/channels/{channel}/users"), &QueryParams::new()))
    }

    /// Users connected to a presence channel.
    ///
    /// # Errors
    ///
    /// Returns [`PousserError::InvalidChannelName`] before sending anything.
    pub fn get_users(&mut self, channel: &str) -> Result<Option<Vec<PresenceUser>>, PousserError> {
        Ok(self
            .get_users_info(channel)?
            .and_then(|response| response.decoded)
            .map(|decoded| presence_users(&decoded)))
    }
}
