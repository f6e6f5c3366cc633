//! # pousser
//!
//! Server-side client for the Pousser realtime pub/sub service.
//!
//! - **Publishing** - [`Pousser::trigger`] and [`Pousser::trigger_batch`]
//! - **Queries** - [`Pousser::get`], [`Pousser::get_channel_info`],
//!   [`Pousser::get_channels`], [`Pousser::get_users_info`]
//! - **Authorization** - [`Pousser::authorize_channel`] and
//!   [`Pousser::authorize_presence_channel`]
//! - **Webhooks** - [`Pousser::webhook`]
//!
//! ## Request flow
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌────────────────┐   ┌───────────┐   ┌──────────┐
//! │ validate │──▶│ sign       │──▶│ RequestBuilder │──▶│ Transport │──▶│ Response │
//! │ channels │   │ (HMAC)     │   │ url/headers    │   │ (reqwest) │   │ / Outcome│
//! └──────────┘   └────────────┘   └────────────────┘   └───────────┘   └──────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use pousser::{Credentials, Pousser, Settings};
//! use serde_json::json;
//!
//! let mut client = Pousser::new(
//!     Credentials::new("app-key", "app-secret", "1"),
//!     Settings::default(),
//! )?;
//!
//! let outcome = client.trigger("room1", "msg", &json!({"text": "hi"}))?;
//! assert!(outcome.is_success());
//! # Ok::<(), pousser::PousserError>(())
//! ```

pub mod auth;
pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod log;
pub mod metrics;
pub mod publisher;
pub mod query;
pub mod request;
pub mod response;
pub mod webhook;

pub use auth::ChannelAuth;
pub use channel::{validate_channel, validate_channels, validate_socket_id, Channels, MAX_CHANNELS};
pub use client::{Pousser, PousserBuilder};
pub use config::{ConfigError, Credentials, Endpoint, Settings};
pub use error::PousserError;
pub use log::{LogContext, LogLevel, Logger, NoopLogger, TracingLogger};
pub use publisher::{BatchEntry, BatchOptions, TriggerOptions};
pub use query::{ChannelEntry, PresenceUser};
pub use request::RequestBuilder;
pub use response::{Outcome, Response};
pub use webhook::{Webhook, WebhookError, WebhookEvent};

pub use pousser_protocol::{ParamValue, QueryParams};
pub use pousser_transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};
