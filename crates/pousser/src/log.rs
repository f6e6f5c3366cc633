//! Pluggable logging sink.
//!
//! The client reports request failures and degraded calls through a
//! [`Logger`] supplied at construction. A logger receives a message template
//! with `{placeholders}`, the values for those placeholders, and a level.
//! [`TracingLogger`] (the default) renders the template and emits a `tracing`
//! event; [`NoopLogger`] drops everything.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Fine-grained diagnostics.
    Trace,
    /// Successful requests.
    Debug,
    /// Notable but expected events.
    Info,
    /// Degraded calls that still went out, e.g. data that could not be encoded.
    Warn,
    /// Failed requests and undecodable responses.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// Values substituted into a template.
pub type LogContext = BTreeMap<String, Value>;

/// Build a [`LogContext`] from key/value pairs.
pub fn context<I, K, V>(pairs: I) -> LogContext
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Logging capability injected into the client.
pub trait Logger: Send + Sync {
    /// Record a message.
    fn log(&self, level: LogLevel, template: &str, context: &LogContext);
}

/// Replace `{key}` placeholders with values from `context`.
///
/// String values are inserted as-is, other values as compact JSON. Unknown
/// placeholders are left untouched.
#[must_use]
pub fn interpolate(template: &str, context: &LogContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match context.get(key) {
                    Some(Value::String(s)) => out.push_str(s),
                    Some(other) => out.push_str(&other.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Logger that forwards to `tracing` under the `pousser` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, template: &str, context: &LogContext) {
        let message = interpolate(template, context);
        match level {
            LogLevel::Trace => tracing::trace!(target: "pousser", "{message}"),
            LogLevel::Debug => tracing::debug!(target: "pousser", "{message}"),
            LogLevel::Info => tracing::info!(target: "pousser", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "pousser", "{message}"),
            LogLevel::Error => tracing::error!(target: "pousser", "{message}"),
        }
    }
}

/// Logger that discards all records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    #[inline(always)]
    fn log(&self, _level: LogLevel, _template: &str, _context: &LogContext) {}
}
