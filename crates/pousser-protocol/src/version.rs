//! Client identification sent with every request.

/// Library name reported to the service.
pub const LIBRARY_NAME: &str = "pousser-rust";

/// Library version reported to the service.
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying the client identifier.
pub const LIBRARY_HEADER: &str = "x-pousser-library";

/// Client identifier, e.g. `pousser-rust/0.1.0`.
#[must_use]
pub fn library_identifier() -> String {
    format!("{LIBRARY_NAME}/{LIBRARY_VERSION}")
}
