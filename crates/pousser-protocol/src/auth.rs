//! Request signing for the Pousser REST API.
//!
//! Every request carries a canonical query string (parameters sorted by key,
//! joined as `key=value` pairs with `&`) and a `hash` header holding the
//! lowercase hex HMAC-SHA256 of `method + path + canonical query string`.
//! POST bodies are bound to the signature through the `body_md5` parameter.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use md5::Md5;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Query parameter carrying the request time in Unix seconds.
pub const AUTH_TIMESTAMP: &str = "auth_timestamp";

/// Query parameter carrying the MD5 of the POST body.
pub const BODY_MD5: &str = "body_md5";

/// A single query parameter value.
///
/// List values are comma-joined when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Plain scalar value.
    Single(String),
    /// List value, rendered as `a,b,c`.
    List(Vec<String>),
}

impl ParamValue {
    /// Render the value as it appears in the query string.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            ParamValue::Single(value) => value.clone(),
            ParamValue::List(values) => values.join(","),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Single(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Single(s)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(str::to_string).collect())
    }
}

macro_rules! param_value_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Single(value.to_string())
                }
            }
        )*
    };
}

param_value_from_display!(i32, i64, u16, u32, u64, usize, bool);

/// Query parameters, kept ordered by key.
///
/// `BTreeMap` orders `String` keys by byte value, which is the ascending
/// lexicographic order the signature is computed over.
///
/// Keys and values are not escaped. The service signs and parses the raw
/// `key=value&...` string, so a value containing `&`, `=` or `#` is read back
/// as a different parameter set than the caller built. Pass only values that
/// are already safe to place in a query string.
pub type QueryParams = BTreeMap<String, ParamValue>;

/// Current Unix time in seconds.
#[must_use]
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Insert `auth_timestamp` and then merge the caller's parameters on top.
///
/// Caller values are merged last, so a caller-supplied `auth_timestamp`
/// replaces the generated one.
#[must_use]
pub fn stamp(params: &QueryParams, timestamp: u64) -> QueryParams {
    let mut stamped = QueryParams::new();
    stamped.insert(AUTH_TIMESTAMP.to_string(), ParamValue::from(timestamp));
    stamped.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));
    stamped
}

/// Join parameters as `key=value` pairs separated by `&`, in key order.
///
/// Values are placed verbatim; see [`QueryParams`].
#[must_use]
pub fn canonical_string(params: &QueryParams) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={}", value.render()))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical query string stamped with the current time.
#[must_use]
pub fn build_query_string(params: &QueryParams) -> String {
    build_query_string_at(params, unix_timestamp())
}

/// Build the canonical query string stamped with `timestamp`.
#[must_use]
pub fn build_query_string_at(params: &QueryParams, timestamp: u64) -> String {
    canonical_string(&stamp(params, timestamp))
}

/// Compute the `hash` header for a request.
///
/// The parameters are canonicalized here, independently of any query string
/// the caller already built. No timestamp is injected: pass the stamped set
/// when signing a real request.
#[must_use]
pub fn build_auth_header(secret: &str, method: &str, path: &str, params: &QueryParams) -> String {
    let payload = format!("{method}{path}{}", canonical_string(params));
    hmac_hex(secret, payload.as_bytes())
}

/// Lowercase hex MD5 of the exact body bytes.
#[must_use]
pub fn body_md5(body: &[u8]) -> String {
    hex::encode(Md5::digest(body))
}

/// Signature authorizing `socket_id` to join `channel`.
///
/// Signs `socket_id:channel`, or `socket_id:channel:custom_data` for presence
/// channels and other channels carrying channel data.
#[must_use]
pub fn socket_signature(
    secret: &str,
    socket_id: &str,
    channel: &str,
    custom_data: Option<&str>,
) -> String {
    let payload = match custom_data {
        Some(data) => format!("{socket_id}:{channel}:{data}"),
        None => format!("{socket_id}:{channel}"),
    };
    hmac_hex(secret, payload.as_bytes())
}

/// HMAC-SHA256 of a webhook body, as sent in the signature header.
#[must_use]
pub fn webhook_signature(secret: &str, body: &[u8]) -> String {
    hmac_hex(secret, body)
}

/// Check a hex webhook signature against the body in constant time.
///
/// Malformed hex never matches.
#[must_use]
pub fn verify_webhook_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    let expected = hmac_bytes(secret, body);
    expected.ct_eq(&provided).into()
}

fn hmac_bytes(secret: &str, payload: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

fn hmac_hex(secret: &str, payload: &[u8]) -> String {
    hex::encode(hmac_bytes(secret, payload))
}
