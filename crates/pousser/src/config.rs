//! Client configuration.
//!
//! [`Settings`] can be built in code (`Settings { .. Settings::default() }`),
//! deserialized from TOML, or loaded from a file. Defaults may be overridden
//! through environment variables (`POUSSER_HOST`, `POUSSER_ENVIRONMENT`).
//! [`Settings::endpoint`] validates the result.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::error::PousserError;

/// Default API host.
pub const DEFAULT_HOST: &str = "api.pousser.io";

/// Default path prefix of the REST API.
pub const DEFAULT_BASE_PATH: &str = "/api";

/// Name of the production environment.
pub const PRODUCTION: &str = "production";

const ENVIRONMENT_PATTERN: &str = r"^[A-Za-z0-9_-]+$";

fn environment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ENVIRONMENT_PATTERN).expect("environment pattern compiles"))
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Scheme other than `http` or `https`.
    #[error("Unsupported scheme: {0:?}")]
    InvalidScheme(String),

    /// Host is empty.
    #[error("Host must not be empty")]
    EmptyHost,

    /// Base path does not start with `/`.
    #[error("Base path must be empty or start with '/': {0:?}")]
    InvalidBasePath(String),

    /// Environment name is empty or not a single path segment.
    #[error("Environment must match [A-Za-z0-9_-]+: {0:?}")]
    InvalidEnvironment(String),

    /// Timeout of zero seconds.
    #[error("Timeout must be at least one second")]
    ZeroTimeout,
}

/// Application credentials.
///
/// The secret is only ever exposed to the signer and the `secret` request
/// header; `Debug` output redacts it.
#[derive(Debug)]
pub struct Credentials {
    key: String,
    secret: SecretString,
    app_id: String,
}

impl Credentials {
    /// Create credentials.
    #[must_use]
    pub fn new(key: impl Into<String>, secret: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: SecretString::from(secret.into()),
            app_id: app_id.into(),
        }
    }

    /// Application key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Application id.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub(crate) fn secret(&self) -> &str {
        self.secret.expose_secret()
    }

    pub(crate) fn validate(&self) -> Result<(), PousserError> {
        if self.key.is_empty() {
            return Err(PousserError::InvalidCredentials("key is empty"));
        }
        if self.secret().is_empty() {
            return Err(PousserError::InvalidCredentials("secret is empty"));
        }
        if self.app_id.is_empty() {
            return Err(PousserError::InvalidCredentials("app id is empty"));
        }
        Ok(())
    }
}

/// Client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Target environment. `production` (or `prod`) publishes to the app
    /// directly; anything else is routed to that named environment.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// `http` or `https`. Derived from `use_tls` when unset.
    #[serde(default)]
    pub scheme: Option<String>,

    /// API host.
    #[serde(default = "default_host")]
    pub host: String,

    /// API port. Derived from the scheme when unset.
    #[serde(default)]
    pub port: Option<u16>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Return raw responses instead of booleans for every call.
    #[serde(default)]
    pub debug: bool,

    /// Path prefix of the REST API.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Raw per-transport overrides, passed to the transport untouched.
    #[serde(default)]
    pub transport_options: BTreeMap<String, String>,

    /// Shorthand for `https` on port 443, applied only where scheme or port
    /// are unset.
    #[serde(default = "default_true", alias = "useTLS")]
    pub use_tls: bool,
}

// Default value functions
fn default_environment() -> String {
    std::env::var("POUSSER_ENVIRONMENT").unwrap_or_else(|_| PRODUCTION.to_string())
}

fn default_host() -> String {
    std::env::var("POUSSER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string())
}

fn default_timeout() -> u64 {
    30
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            scheme: None,
            host: default_host(),
            port: None,
            timeout: default_timeout(),
            debug: false,
            base_path: default_base_path(),
            transport_options: BTreeMap::new(),
            use_tls: true,
        }
    }
}

impl Settings {
    /// Parse settings from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Whether requests target the production environment.
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), PRODUCTION | "prod")
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Resolve scheme, port and base path into a validated endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported scheme, an empty host, a base path
    /// not starting with `/`, an environment that is not a plain name, or a
    /// zero timeout.
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        let scheme = match &self.scheme {
            Some(scheme) => scheme.to_ascii_lowercase(),
            None if self.use_tls => "https".to_string(),
            None => "http".to_string(),
        };
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::InvalidScheme(scheme));
        }

        let port = match self.port {
            Some(port) => port,
            None if self.use_tls || scheme == "https" => 443,
            None => 80,
        };

        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            return Err(ConfigError::InvalidBasePath(self.base_path.clone()));
        }
        if !environment_regex().is_match(&self.environment) {
            return Err(ConfigError::InvalidEnvironment(self.environment.clone()));
        }
        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Endpoint {
            scheme,
            host: self.host.trim().to_string(),
            port,
            base_path: self.base_path.trim_end_matches('/').to_string(),
        })
    }
}

/// Validated location of the REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// `http` or `https`.
    pub scheme: String,
    /// Host name.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Path prefix without a trailing slash.
    pub base_path: String,
}

impl Endpoint {
    /// `scheme://host:port`
    #[must_use]
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Full request path for a sub-path; this is the path that gets signed.
    #[must_use]
    pub fn path(&self, sub_path: &str) -> String {
        format!("{}{}", self.base_path, sub_path)
    }
}
