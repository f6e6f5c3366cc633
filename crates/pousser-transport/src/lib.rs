//! # pousser-transport
//!
//! Transport layer for the Pousser REST client.
//!
//! The client builds and signs requests; a [`Transport`] only executes them.
//! [`ReqwestTransport`] is the default, blocking implementation. Tests and
//! callers with their own HTTP stack can plug in anything implementing the
//! trait.
//!
//! ```rust,ignore
//! use pousser_transport::{HttpRequest, Method, ReqwestTransport, Transport};
//!
//! let mut transport = ReqwestTransport::default();
//! let response = transport.execute(&HttpRequest {
//!     method: Method::Get,
//!     url: "https://api.pousser.io:443/api/app/1/channels?...".into(),
//!     headers: Vec::new(),
//!     body: None,
//! })?;
//! ```

pub mod http;
pub mod traits;

pub use http::{ReqwestTransport, TransportOptions, DEFAULT_TIMEOUT};
pub use traits::{HttpRequest, HttpResponse, Method, Transport, TransportError};
