//! Blocking HTTP transport built on `reqwest`.
//!
//! The `reqwest` client is created lazily on the first request and reused for
//! every request after that.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, trace, warn};

use crate::traits::{HttpRequest, HttpResponse, Method, Transport, TransportError};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for [`ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Total time allowed for one request.
    pub timeout: Duration,
    /// Time allowed to establish the connection.
    pub connect_timeout: Option<Duration>,
    /// Proxy URL applied to all requests.
    pub proxy: Option<String>,
    /// Override for the `user-agent` header.
    pub user_agent: Option<String>,
    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl TransportOptions {
    /// Options with the given timeout and nothing else set.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: None,
            proxy: None,
            user_agent: None,
            accept_invalid_certs: false,
        }
    }

    /// Apply raw per-transport overrides.
    ///
    /// Recognized keys: `connect_timeout` (seconds), `proxy`, `user_agent`,
    /// `danger_accept_invalid_certs` (`true`/`false`). Unknown keys are
    /// logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Config`] if a recognized key has an
    /// unparsable value.
    pub fn from_map(timeout: Duration, raw: &BTreeMap<String, String>) -> Result<Self, TransportError> {
        let mut options = Self::new(timeout);

        for (key, value) in raw {
            match key.as_str() {
                "connect_timeout" => {
                    let secs: u64 = value.parse().map_err(|_| {
                        TransportError::Config(format!("connect_timeout must be seconds, got {value:?}"))
                    })?;
                    options.connect_timeout = Some(Duration::from_secs(secs));
                }
                "proxy" => options.proxy = Some(value.clone()),
                "user_agent" => options.user_agent = Some(value.clone()),
                "danger_accept_invalid_certs" => {
                    options.accept_invalid_certs = value.parse().map_err(|_| {
                        TransportError::Config(format!(
                            "danger_accept_invalid_certs must be true or false, got {value:?}"
                        ))
                    })?;
                }
                other => warn!(option = %other, "Ignoring unknown transport option"),
            }
        }

        Ok(options)
    }
}

/// Transport backed by a blocking `reqwest` client.
pub struct ReqwestTransport {
    options: TransportOptions,
    client: Option<Client>,
}

impl ReqwestTransport {
    /// Create a transport. No connection is made until the first request.
    #[must_use]
    pub fn new(options: TransportOptions) -> Self {
        Self {
            options,
            client: None,
        }
    }

    /// Get the transport options.
    #[must_use]
    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Whether the underlying client has been created yet.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    fn handle(&mut self) -> Result<&Client, TransportError> {
        if self.client.is_none() {
            debug!(timeout_ms = self.options.timeout.as_millis() as u64, "Creating HTTP client");
            self.client = Some(build_client(&self.options)?);
        }
        self.client
            .as_ref()
            .ok_or_else(|| TransportError::Other("HTTP client unavailable".into()))
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(TransportOptions::default())
    }
}

fn build_client(options: &TransportOptions) -> Result<Client, TransportError> {
    let mut builder = Client::builder()
        .timeout(options.timeout)
        .danger_accept_invalid_certs(options.accept_invalid_certs);

    if let Some(connect_timeout) = options.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }
    if let Some(proxy) = &options.proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| TransportError::Config(format!("invalid proxy {proxy:?}: {e}")))?;
        builder = builder.proxy(proxy);
    }
    if let Some(user_agent) = &options.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }

    builder
        .build()
        .map_err(|e| TransportError::Config(e.to_string()))
}

fn map_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}

impl Transport for ReqwestTransport {
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let client = self.handle()?;

        let mut builder = match request.method {
            Method::Get => client.get(&request.url),
            Method::Post => client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        trace!(method = %request.method, url = %request.url, "Sending request");
        let response = builder.send().map_err(map_error)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        trace!(status, bytes = body.len(), "Received response");
        Ok(HttpResponse { status, body })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}
