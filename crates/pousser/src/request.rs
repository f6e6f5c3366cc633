//! Signed request construction.
//!
//! A request is stamped once: the same `auth_timestamp` and parameter set
//! produce both the URL query string and the `hash` header. POST bodies are
//! hashed into `body_md5` and then passed through untouched.

use pousser_protocol::auth::{
    body_md5, build_auth_header, canonical_string, stamp, QueryParams, BODY_MD5,
};
use pousser_protocol::version::{library_identifier, LIBRARY_HEADER};
use pousser_transport::{HttpRequest, Method};

use crate::config::{Credentials, Endpoint};

/// Builds signed requests for one set of credentials and one endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    credentials: &'a Credentials,
    endpoint: &'a Endpoint,
}

impl<'a> RequestBuilder<'a> {
    /// Create a builder.
    #[must_use]
    pub fn new(credentials: &'a Credentials, endpoint: &'a Endpoint) -> Self {
        Self {
            credentials,
            endpoint,
        }
    }

    /// Signed GET with no body and no `body_md5`.
    #[must_use]
    pub fn get(&self, sub_path: &str, params: &QueryParams, timestamp: u64) -> HttpRequest {
        self.build(Method::Get, sub_path, params.clone(), None, timestamp)
    }

    /// Signed POST carrying `body` verbatim.
    ///
    /// `body_md5` is computed over exactly these bytes and added to the
    /// signed parameters, replacing any caller value under that key.
    #[must_use]
    pub fn post(&self, sub_path: &str, params: &QueryParams, body: String, timestamp: u64) -> HttpRequest {
        let mut params = params.clone();
        params.insert(BODY_MD5.to_string(), body_md5(body.as_bytes()).into());
        self.build(Method::Post, sub_path, params, Some(body), timestamp)
    }

    fn build(
        &self,
        method: Method,
        sub_path: &str,
        params: QueryParams,
        body: Option<String>,
        timestamp: u64,
    ) -> HttpRequest {
        let stamped = stamp(&params, timestamp);
        let path = self.endpoint.path(sub_path);
        let query = canonical_string(&stamped);
        let hash = build_auth_header(self.credentials.secret(), method.as_str(), &path, &stamped);

        HttpRequest {
            method,
            url: format!("{}{}?{}", self.endpoint.origin(), path, query),
            headers: vec![
                ("key".to_string(), self.credentials.key().to_string()),
                ("secret".to_string(), self.credentials.secret().to_string()),
                ("hash".to_string(), hash),
                ("content-type".to_string(), "application/json".to_string()),
                (LIBRARY_HEADER.to_string(), library_identifier()),
            ],
            body,
        }
    }
}
