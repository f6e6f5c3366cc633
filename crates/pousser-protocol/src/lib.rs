//! # pousser-protocol
//!
//! Wire-level pieces of the Pousser REST API.
//!
//! - `auth` - canonical query strings, request signatures, `body_md5`,
//!   channel authorization and webhook signatures
//! - `body` - JSON bodies for single and batch publishes
//! - `version` - client identifier header
//!
//! ## Example
//!
//! ```rust
//! use pousser_protocol::auth::{build_auth_header, stamp, QueryParams};
//!
//! let params = stamp(&QueryParams::new(), 1_700_000_000);
//! let hash = build_auth_header("secret", "GET", "/api/app/1/channels", &params);
//! assert_eq!(hash.len(), 64);
//! ```

pub mod auth;
pub mod body;
pub mod version;

pub use auth::{
    body_md5, build_auth_header, build_query_string, build_query_string_at, canonical_string,
    stamp, ParamValue, QueryParams, AUTH_TIMESTAMP, BODY_MD5,
};
pub use body::{BatchBody, BatchItem, PublishBody};
pub use version::{library_identifier, LIBRARY_HEADER};
