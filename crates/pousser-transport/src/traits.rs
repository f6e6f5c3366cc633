//! Transport abstraction traits for Pousser.
//!
//! A transport executes one fully built HTTP request and hands back the
//! status and body. Everything above it (signing, validation, interpreting
//! the status) is transport-agnostic.

use std::fmt;
use thiserror::Error;

/// HTTP method used by the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read-only query.
    Get,
    /// Publish.
    Post,
}

impl Method {
    /// Upper-case method name, as used in the signature payload.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    /// Header name/value pairs, in insertion order.
    pub headers: Vec<(String, String)>,
    /// Raw body, sent verbatim.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and body returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Create a new response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Could not connect to the host.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The request failed after the connection was made.
    #[error("Request failed: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// A transport option was invalid.
    #[error("Invalid transport option: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Executes HTTP requests for a client.
///
/// A transport is owned by exactly one client and used for one request at a
/// time, hence `&mut self`. It is `Send` so a client can move between
/// threads, but it is not shared.
pub trait Transport: Send {
    /// Execute a request and return the status and body.
    ///
    /// # Errors
    ///
    /// Returns an error if no HTTP response was obtained.
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Clear any per-request state left over from the previous request.
    ///
    /// Called before every dispatch except the first. The underlying handle
    /// is kept.
    fn reset(&mut self) {}

    /// Get the transport name (e.g., "reqwest").
    fn name(&self) -> &'static str;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let request = HttpRequest {
            method: Method::Get,
            url: "http://localhost/".into(),
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: None,
        };
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("hash"), None);
    }

    struct Fixed;

    impl Transport for Fixed {
        fn execute(&mut self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse::new(204, ""))
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_boxed_transport_delegates() {
        let mut boxed: Box<dyn Transport> = Box::new(Fixed);
        let request = HttpRequest {
            method: Method::Post,
            url: "http://localhost/".into(),
            headers: Vec::new(),
            body: Some("{}".into()),
        };
        assert_eq!(boxed.name(), "fixed");
        assert_eq!(boxed.execute(&request).unwrap().status, 204);
    }
}
