//! Interpretation of HTTP responses.

use pousser_transport::{HttpResponse, TransportError};
use serde_json::Value;

/// Raw result of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status; `0` when no response was received.
    pub status: u16,
    /// Response body, or the transport error message when `status` is `0`.
    pub body: String,
    /// Decoded JSON body, set by successful queries.
    pub decoded: Option<Value>,
}

impl Response {
    /// Whether the service answered `200`.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub(crate) fn from_transport_error(error: &TransportError) -> Self {
        Self {
            status: 0,
            body: error.to_string(),
            decoded: None,
        }
    }
}

impl From<HttpResponse> for Response {
    fn from(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            body: response.body,
            decoded: None,
        }
    }
}

/// Result of a publish.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Debug mode off: whether the service answered `200`.
    Success(bool),
    /// Debug mode on: the raw response, whatever the status.
    Debug(Response),
}

impl Outcome {
    /// Whether the publish was accepted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Success(ok) => *ok,
            Outcome::Debug(response) => response.is_ok(),
        }
    }

    /// The raw response, in debug mode.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Debug(response) => Some(response),
        }
    }
}

/// Map a publish response to an [`Outcome`].
pub(crate) fn publish_outcome(response: Response, debug: bool) -> Outcome {
    if debug {
        Outcome::Debug(response)
    } else {
        Outcome::Success(response.is_ok())
    }
}

/// Decode a query response.
///
/// Only a `200` with a JSON body counts as a result.
pub(crate) fn decode_query(mut response: Response) -> Result<Response, QueryFailure> {
    if !response.is_ok() {
        return Err(QueryFailure::Status(response.status));
    }
    let decoded = serde_json::from_str(&response.body).map_err(QueryFailure::Decode)?;
    response.decoded = Some(decoded);
    Ok(response)
}

/// Why a query produced no result.
#[derive(Debug)]
pub(crate) enum QueryFailure {
    Status(u16),
    Decode(serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> Response {
        Response::from(HttpResponse::new(status, body))
    }

    #[test]
    fn test_publish_outcome_boolean() {
        assert_eq!(publish_outcome(response(200, "{}"), false), Outcome::Success(true));
        assert_eq!(publish_outcome(response(500, "oops"), false), Outcome::Success(false));
        assert_eq!(publish_outcome(response(202, ""), false), Outcome::Success(false));
    }

    #[test]
    fn test_publish_outcome_debug_keeps_response() {
        let outcome = publish_outcome(response(403, "forbidden"), true);
        let raw = outcome.response().unwrap();
        assert_eq!(raw.status, 403);
        assert_eq!(raw.body, "forbidden");
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_transport_error_is_status_zero() {
        let raw = Response::from_transport_error(&TransportError::Timeout);
        assert_eq!(raw.status, 0);
        assert!(!raw.is_ok());
        assert_eq!(raw.body, "Request timed out");
    }

    #[test]
    fn test_decode_query() {
        let ok = decode_query(response(200, r#"{"occupied":true}"#)).unwrap();
        assert_eq!(ok.decoded.unwrap()["occupied"], Value::Bool(true));

        assert!(matches!(
            decode_query(response(404, "{}")),
            Err(QueryFailure::Status(404))
        ));
        assert!(matches!(
            decode_query(response(200, "not json")),
            Err(QueryFailure::Decode(_))
        ));
    }
}
