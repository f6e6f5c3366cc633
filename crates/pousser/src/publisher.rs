//! Event publishing.
//!
//! `trigger` sends one event to up to [`MAX_CHANNELS`](crate::channel::MAX_CHANNELS)
//! channels. `trigger_batch` sends many events in one request; it checks each
//! entry's channel but puts no limit on the number of entries.

use pousser_protocol::auth::{unix_timestamp, QueryParams};
use pousser_protocol::{BatchBody, BatchItem, PublishBody};
use serde::Serialize;
use serde_json::{json, Value};

use crate::channel::{validate_channel, validate_channels, validate_socket_id, Channels};
use crate::client::Pousser;
use crate::error::PousserError;
use crate::log::{context, LogLevel};
use crate::metrics;
use crate::response::{publish_outcome, Outcome};

/// Per-call options for [`Pousser::trigger_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerOptions {
    /// Connection to exclude from delivery.
    pub socket_id: Option<String>,
    /// Return the raw response for this call.
    pub debug: bool,
    /// `data` is already a JSON string and must not be encoded again.
    pub already_encoded: bool,
}

/// Per-call options for [`Pousser::trigger_batch_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Return the raw response for this call.
    pub debug: bool,
    /// String data is already encoded; non-string data is expected not to occur.
    pub already_encoded: bool,
}

/// One event in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    /// Target channel.
    pub channel: String,
    /// Event name.
    pub event: Option<String>,
    /// Payload. Strings are sent as-is, anything else is JSON-encoded.
    pub data: Value,
    /// Connection to exclude from delivery.
    pub socket_id: Option<String>,
}

impl BatchEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(channel: impl Into<String>, event: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            channel: channel.into(),
            event: Some(event.into()),
            data: data.into(),
            socket_id: None,
        }
    }

    /// Exclude a connection from delivery.
    #[must_use]
    pub fn with_socket_id(mut self, socket_id: impl Into<String>) -> Self {
        self.socket_id = Some(socket_id.into());
        self
    }
}

/// Encode event data for a single trigger.
///
/// With `already_encoded`, a string value is used verbatim.
fn encode_event_data<T: Serialize + ?Sized>(
    data: &T,
    already_encoded: bool,
) -> Result<String, serde_json::Error> {
    if already_encoded {
        match serde_json::to_value(data)? {
            Value::String(encoded) => Ok(encoded),
            other => Ok(other.to_string()),
        }
    } else {
        serde_json::to_string(data)
    }
}

impl Pousser {
    /// Publish `event` with `data` to one or more channels.
    ///
    /// # Errors
    ///
    /// Returns a validation error before anything is sent. Delivery failures
    /// are reported as `Outcome::Success(false)` (or the raw response in
    /// debug mode), never as an error.
    pub fn trigger<T: Serialize + ?Sized>(
        &mut self,
        channels: impl Into<Channels>,
        event: &str,
        data: &T,
    ) -> Result<Outcome, PousserError> {
        self.trigger_with(channels, event, data, &TriggerOptions::default())
    }

    /// [`trigger`](Self::trigger) with per-call options.
    ///
    /// # Errors
    ///
    /// Returns [`PousserError::NoChannels`], [`PousserError::TooManyChannels`],
    /// [`PousserError::InvalidChannelName`] or [`PousserError::InvalidSocketId`].
    pub fn trigger_with<T: Serialize + ?Sized>(
        &mut self,
        channels: impl Into<Channels>,
        event: &str,
        data: &T,
        options: &TriggerOptions,
    ) -> Result<Outcome, PousserError> {
        let channels = channels.into();
        if channels.is_empty() {
            return Err(PousserError::NoChannels);
        }
        validate_channels(channels.as_slice())?;
        if let Some(socket_id) = &options.socket_id {
            validate_socket_id(socket_id)?;
        }

        let data = match encode_event_data(data, options.already_encoded) {
            Ok(encoded) => encoded,
            Err(error) => {
                self.log(
                    LogLevel::Warn,
                    "Failed to encode data for event {event}: {error}; sending empty data",
                    &context([("event", json!(event)), ("error", json!(error.to_string()))]),
                );
                String::new()
            }
        };

        let channel_count = channels.len();
        let body = PublishBody {
            event_name: event.to_string(),
            data,
            channels: channels.into_vec(),
            socket_id: options.socket_id.clone(),
        };
        let body = self.encode_body(&body);

        let request = self.requests().post(
            &self.app_path("/publish"),
            &QueryParams::new(),
            body,
            unix_timestamp(),
        );
        let response = self.dispatch(&request);
        if response.is_ok() {
            metrics::record_published(channel_count);
        }

        Ok(publish_outcome(response, options.debug || self.settings.debug))
    }

    /// Publish several events in one request.
    ///
    /// # Errors
    ///
    /// Returns [`PousserError::InvalidChannelName`] or
    /// [`PousserError::InvalidSocketId`] for the first bad entry.
    pub fn trigger_batch(&mut self, entries: &[BatchEntry]) -> Result<Outcome, PousserError> {
        self.trigger_batch_with(entries, &BatchOptions::default())
    }

    /// [`trigger_batch`](Self::trigger_batch) with per-call options.
    ///
    /// # Errors
    ///
    /// See [`trigger_batch`](Self::trigger_batch).
    pub fn trigger_batch_with(
        &mut self,
        entries: &[BatchEntry],
        options: &BatchOptions,
    ) -> Result<Outcome, PousserError> {
        let mut batch = Vec::with_capacity(entries.len());
        for entry in entries {
            validate_channel(&entry.channel)?;
            if let Some(socket_id) = &entry.socket_id {
                validate_socket_id(socket_id)?;
            }

            let data = match &entry.data {
                Value::String(encoded) => encoded.clone(),
                other => {
                    if options.already_encoded {
                        self.log(
                            LogLevel::Warn,
                            "Batch data for channel {channel} marked as encoded but is not a string; encoding it",
                            &context([("channel", json!(entry.channel))]),
                        );
                    }
                    other.to_string()
                }
            };

            batch.push(BatchItem {
                channel: entry.channel.clone(),
                event: entry.event.clone(),
                data,
                socket_id: entry.socket_id.clone(),
            });
        }

        let body = self.encode_body(&BatchBody { batch });
        let request = self.requests().post(
            &self.app_path("/batch_events"),
            &QueryParams::new(),
            body,
            unix_timestamp(),
        );
        let response = self.dispatch(&request);
        if response.is_ok() {
            metrics::record_published(entries.len());
        }

        Ok(publish_outcome(response, options.debug || self.settings.debug))
    }

    fn encode_body<B: Serialize>(&self, body: &B) -> String {
        serde_json::to_string(body).unwrap_or_else(|error| {
            self.log(
                LogLevel::Warn,
                "Failed to encode request body: {error}",
                &context([("error", json!(error.to_string()))]),
            );
            String::new()
        })
    }
}
