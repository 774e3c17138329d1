//! Session configuration, optionally loaded from a TOML file.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Path prefix of the iControl REST API on the management host.
pub const API_PREFIX: &str = "/mgmt/tm/";

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// URL scheme used to reach the management endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// TLS, the only scheme real appliances serve the API on.
    #[default]
    Https,
    /// Plain HTTP.
    Http,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Https => write!(f, "https"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Immutable session configuration handed to the client at creation.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Host or IP (optionally `host:port`) of the management endpoint.
    pub address: String,
    /// Basic-auth user.
    pub user: String,
    /// Basic-auth password.
    pub password: String,
    /// URL scheme.
    pub scheme: Scheme,
    /// Per-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    /// Accept self-signed or otherwise unverifiable certificates.
    pub accept_invalid_certs: bool,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("address", &self.address)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("scheme", &self.scheme)
            .field("timeout", &self.timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// On-disk layout of a session file.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    session: SessionSection,
}

#[derive(Debug, Deserialize)]
struct SessionSection {
    address: String,
    user: String,
    password: String,
    #[serde(default)]
    scheme: Scheme,
    timeout_secs: Option<u64>,
    #[serde(default)]
    accept_invalid_certs: bool,
}

impl From<SessionSection> for SessionConfig {
    fn from(section: SessionSection) -> Self {
        Self {
            address: section.address,
            user: section.user,
            password: section.password,
            scheme: section.scheme,
            timeout: section.timeout_secs.map(Duration::from_secs),
            accept_invalid_certs: section.accept_invalid_certs,
        }
    }
}

impl SessionConfig {
    /// Creates an HTTPS session with the transport's default timeout and
    /// certificate verification.
    pub fn new(address: &str, user: &str, password: &str) -> Self {
        Self {
            address: address.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            scheme: Scheme::default(),
            timeout: None,
            accept_invalid_certs: false,
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed or validated.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let config = Self::from(file.session);
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    /// Returns error if the address or either credential is missing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "address cannot be empty".to_string(),
            ));
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "user cannot be empty".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(ConfigError::InvalidValue(
                "password cannot be empty".to_string(),
            ));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::InvalidValue(
                "timeout must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Base URL every request path is appended to.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.address.trim(), API_PREFIX)
    }

    /// Sets the URL scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Accepts certificates that cannot be verified.
    #[must_use]
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}
