//! The Pousser client and its dispatch loop.

use std::sync::Arc;
use std::time::Instant;

use pousser_transport::{HttpRequest, ReqwestTransport, Transport, TransportOptions};
use serde_json::json;
use tracing::debug;

use crate::config::{Credentials, Endpoint, Settings};
use crate::error::PousserError;
use crate::log::{context, LogLevel, Logger, TracingLogger};
use crate::metrics;
use crate::request::RequestBuilder;
use crate::response::Response;

/// Server-side client for the Pousser REST API.
///
/// Each client owns its transport and sends one request at a time; every
/// dispatching method takes `&mut self`. Share a client across threads by
/// wrapping it in a `Mutex`, or give each thread its own.
pub struct Pousser {
    pub(crate) credentials: Credentials,
    pub(crate) settings: Settings,
    pub(crate) endpoint: Endpoint,
    pub(crate) logger: Arc<dyn Logger>,
    transport: Box<dyn Transport>,
    dispatched: bool,
}

impl std::fmt::Debug for Pousser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pousser")
            .field("credentials", &self.credentials)
            .field("endpoint", &self.endpoint)
            .field("transport", &self.transport.name())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Pousser`].
pub struct PousserBuilder {
    credentials: Credentials,
    settings: Settings,
    logger: Option<Arc<dyn Logger>>,
    transport: Option<Box<dyn Transport>>,
}

impl PousserBuilder {
    /// Use these settings instead of the defaults.
    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Send log records to `logger` instead of `tracing`.
    #[must_use]
    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Share an existing logger.
    #[must_use]
    pub fn shared_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Use a custom transport instead of the default `reqwest` one.
    ///
    /// `transport_options` and `timeout` from the settings are then the
    /// transport's own business.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Validate everything and create the client.
    ///
    /// # Errors
    ///
    /// Returns an error for empty credentials, invalid settings, or
    /// transport options the default transport cannot use.
    pub fn build(self) -> Result<Pousser, PousserError> {
        self.credentials.validate()?;
        let endpoint = self.settings.endpoint()?;
        metrics::describe_metrics();

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let options = TransportOptions::from_map(
                    self.settings.timeout(),
                    &self.settings.transport_options,
                )?;
                Box::new(ReqwestTransport::new(options)) as Box<dyn Transport>
            }
        };

        debug!(
            app_id = %self.credentials.app_id(),
            origin = %endpoint.origin(),
            environment = %self.settings.environment,
            transport = transport.name(),
            "Pousser client created"
        );

        Ok(Pousser {
            credentials: self.credentials,
            settings: self.settings,
            endpoint,
            logger: self.logger.unwrap_or_else(|| Arc::new(TracingLogger)),
            transport,
            dispatched: false,
        })
    }
}

impl Pousser {
    /// Start building a client.
    #[must_use]
    pub fn builder(credentials: Credentials) -> PousserBuilder {
        PousserBuilder {
            credentials,
            settings: Settings::default(),
            logger: None,
            transport: None,
        }
    }

    /// Create a client with the default transport and logger.
    ///
    /// # Errors
    ///
    /// See [`PousserBuilder::build`].
    pub fn new(credentials: Credentials, settings: Settings) -> Result<Self, PousserError> {
        Self::builder(credentials).settings(settings).build()
    }

    /// Application credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Client settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolved API endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub(crate) fn requests(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.credentials, &self.endpoint)
    }

    /// Sub-path scoped to this app and, outside production, its environment.
    pub(crate) fn app_path(&self, suffix: &str) -> String {
        if self.settings.is_production() {
            format!("/app/{}{}", self.credentials.app_id(), suffix)
        } else {
            format!(
                "/app/{}/environment/{}{}",
                self.credentials.app_id(),
                self.settings.environment,
                suffix
            )
        }
    }

    pub(crate) fn log(&self, level: LogLevel, template: &str, ctx: &crate::log::LogContext) {
        self.logger.log(level, template, ctx);
    }

    /// Send a request. Never fails: transport errors come back as status 0.
    pub(crate) fn dispatch(&mut self, request: &HttpRequest) -> Response {
        if self.dispatched {
            self.transport.reset();
        }
        self.dispatched = true;

        let method = request.method.as_str();
        let path = request
            .url
            .split_once('?')
            .map_or(request.url.as_str(), |(path, _)| path)
            .to_string();

        metrics::record_request(method);
        let started = Instant::now();
        let result = self.transport.execute(request);
        metrics::record_latency(started.elapsed());

        match result {
            Ok(http) => {
                let response = Response::from(http);
                if response.is_ok() {
                    self.log(
                        LogLevel::Debug,
                        "{method} {url} succeeded",
                        &context([("method", json!(method)), ("url", json!(path))]),
                    );
                } else {
                    metrics::record_failure("status");
                    self.log(
                        LogLevel::Error,
                        "{method} {url} failed with status {status}: {body}",
                        &context([
                            ("method", json!(method)),
                            ("url", json!(path)),
                            ("status", json!(response.status)),
                            ("body", json!(response.body)),
                        ]),
                    );
                }
                response
            }
            Err(error) => {
                metrics::record_failure("transport");
                self.log(
                    LogLevel::Error,
                    "{method} {url} transport error: {error}",
                    &context([
                        ("method", json!(method)),
                        ("url", json!(path)),
                        ("error", json!(error.to_string())),
                    ]),
                );
                Response::from_transport_error(&error)
            }
        }
    }
}
