//! Error types for the Pousser client.

use pousser_transport::TransportError;
use thiserror::Error;

use crate::channel::MAX_CHANNELS;
use crate::config::ConfigError;

/// Errors returned by the client.
///
/// Only construction problems and input validation surface here. A request
/// that reaches the transport never produces an error: transport failures
/// and non-200 statuses are logged and reported through the return value.
#[derive(Debug, Error)]
pub enum PousserError {
    /// Channel name contains characters outside `[-a-zA-Z0-9_=@,.;]` or is empty.
    #[error("Invalid channel name: {0:?}")]
    InvalidChannelName(String),

    /// A trigger named no channels.
    #[error("At least one channel is required")]
    NoChannels,

    /// More channels than a single trigger accepts.
    #[error("Too many channels: {0} (maximum {MAX_CHANNELS})")]
    TooManyChannels(usize),

    /// Socket id is not of the form `<digits>.<digits>`.
    #[error("Invalid socket id: {0:?}")]
    InvalidSocketId(String),

    /// Key, secret or app id missing.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(&'static str),

    /// Settings failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The default transport could not be set up.
    #[error("Transport setup failed: {0}")]
    Transport(#[from] TransportError),
}
