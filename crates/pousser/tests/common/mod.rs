//! Shared test doubles: a scripted transport and a capturing logger.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use hmac::{Hmac, Mac};
use pousser::{
    Credentials, HttpRequest, HttpResponse, LogContext, LogLevel, Logger, Pousser, Settings,
    Transport, TransportError,
};
use sha2::Sha256;

/// State shared between a [`MockTransport`] and the test body.
#[derive(Default)]
pub struct MockState {
    pub requests: Vec<HttpRequest>,
    pub responses: VecDeque<Result<HttpResponse, TransportError>>,
    pub resets: usize,
}

/// Transport that records requests and replays scripted responses.
///
/// With nothing scripted it answers `200 {}`.
#[derive(Clone, Default)]
pub struct MockTransport {
    pub state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn respond(&self, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .responses
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, error: TransportError) {
        self.state.lock().unwrap().responses.push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }

    pub fn resets(&self) -> usize {
        self.state.lock().unwrap().resets
    }
}

impl Transport for MockTransport {
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "{}")))
    }

    fn reset(&mut self) {
        self.state.lock().unwrap().resets += 1;
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Logger that keeps every record.
#[derive(Clone, Default)]
pub struct CapturingLogger {
    pub records: Arc<Mutex<Vec<(LogLevel, String, LogContext)>>>,
}

impl CapturingLogger {
    pub fn levels(&self) -> Vec<LogLevel> {
        self.records.lock().unwrap().iter().map(|r| r.0).collect()
    }

    pub fn has(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .lock()
            .unwrap()
            .iter()
            .any(|(l, template, _)| *l == level && template.contains(needle))
    }
}

impl Logger for CapturingLogger {
    fn log(&self, level: LogLevel, template: &str, context: &LogContext) {
        self.records
            .lock()
            .unwrap()
            .push((level, template.to_string(), context.clone()));
    }
}

pub const KEY: &str = "app-key";
pub const SECRET: &str = "app-secret";

pub fn production_settings() -> Settings {
    Settings {
        environment: "production".to_string(),
        host: "api.pousser.io".to_string(),
        ..Settings::default()
    }
}

/// Client wired to a fresh mock transport and capturing logger.
pub fn client_with(settings: Settings) -> (Pousser, MockTransport, CapturingLogger) {
    let transport = MockTransport::default();
    let logger = CapturingLogger::default();
    let client = Pousser::builder(Credentials::new(KEY, SECRET, "1"))
        .settings(settings)
        .transport(transport.clone())
        .logger(logger.clone())
        .build()
        .unwrap();
    (client, transport, logger)
}

pub fn client() -> (Pousser, MockTransport, CapturingLogger) {
    client_with(production_settings())
}

/// Split a request URL into its path and decoded query pairs.
pub fn split_url(url: &str) -> (String, BTreeMap<String, String>) {
    let (base, query) = url.split_once('?').unwrap_or((url, ""));
    let path = base
        .split_once("://")
        .and_then(|(_, rest)| rest.find('/').map(|i| rest[i..].to_string()))
        .unwrap_or_default();
    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    (path, params)
}

/// Recompute the `hash` header the way the service does.
pub fn expected_signature(method: &str, path: &str, query: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());
    mac.update(query.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
