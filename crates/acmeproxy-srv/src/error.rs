//! Error types for the acmeproxy server.
//!
//! [`ConfigError`]s are fatal and reported all at once at startup.
//! [`ChallengeError`]s belong to a single request and become HTTP responses.

use acmeproxy_core::AdapterError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in acmeproxy-srv operations.
#[derive(Error, Debug)]
pub enum SrvError {
    /// Config file could not be read or parsed.
    #[error("config file {}: {message}", .path.display())]
    ConfigFile { path: PathBuf, message: String },

    /// Config was parsed but describes an unusable setup.
    #[error(transparent)]
    Config(#[from] ConfigErrors),

    /// HTTP server failed to bind or stopped with an error.
    #[error("http server error: {0}")]
    Server(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One configuration defect.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Provider spec has no zone.
    #[error("provider {provider}: empty zone")]
    EmptyProviderZone { provider: String },

    /// Backend could not be constructed from its settings.
    #[error("provider {provider} for zone {zone:?}: {source}")]
    ProviderConstruction {
        zone: String,
        provider: String,
        #[source]
        source: AdapterError,
    },

    /// Two different backends (or settings) claim the same zone.
    #[error("zone {zone:?} is configured twice: {existing} and {duplicate}")]
    DuplicateProviderZone {
        zone: String,
        existing: String,
        duplicate: String,
    },

    /// Two users share a name.
    #[error("user {user:?} is defined more than once")]
    DuplicateUser { user: String },

    /// User has no token, so Basic auth would accept an empty password.
    #[error("user {user:?}: empty token")]
    EmptyToken { user: String },

    /// Zone rule has no zone.
    #[error("user {user:?}: zone rule with empty zone")]
    EmptyZone { user: String },

    /// Zone rule pattern does not compile.
    #[error("user {user:?}: zone {zone:?}: invalid regex {pattern:?}: {source}")]
    InvalidPattern {
        user: String,
        zone: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Pattern rule names a zone that is not exactly a provider zone.
    #[error("user {user:?}: no provider for pattern zone {zone:?}")]
    NoProviderForPattern { user: String, zone: String },

    /// No provider zone contains the rule's zone.
    #[error("user {user:?}: no provider found for zone {zone:?}")]
    NoProviderForZone { user: String, zone: String },

    /// More than one provider zone contains the rule's zone.
    #[error("user {user:?}: ambiguous provider for zone {zone:?}: {}", .candidates.join(", "))]
    AmbiguousProvider {
        user: String,
        zone: String,
        candidates: Vec<String>,
    },
}

/// Every configuration defect found in one pass.
#[derive(Debug, Default)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl ConfigErrors {
    /// Record a defect
    pub fn push(&mut self, error: ConfigError) {
        self.0.push(error);
    }

    /// Returns true if no defect was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of defects
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the defects
    pub fn iter(&self) -> std::slice::Iter<'_, ConfigError> {
        self.0.iter()
    }

    /// `Ok(value)` if empty, `Err(self)` otherwise
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} configuration error(s):", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n\t- {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

impl<'a> IntoIterator for &'a ConfigErrors {
    type Item = &'a ConfigError;
    type IntoIter = std::slice::Iter<'a, ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Per-request failures.
#[derive(Error, Debug)]
pub enum ChallengeError {
    /// Missing or wrong Basic auth credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// No zone rule of the user matches the FQDN.
    #[error("domain not allowed")]
    Forbidden { user: String, fqdn: String },

    /// Request body is malformed or incomplete.
    #[error("bad request: {0}")]
    Validation(String),

    /// Cleanup found no record with this name and value.
    #[error("[{provider}] could not find record {fqdn} to delete")]
    NotFound { fqdn: String, provider: String },

    /// Backend call failed.
    #[error("[{provider}] could not {action}: {source}")]
    Adapter {
        action: &'static str,
        provider: String,
        #[source]
        source: AdapterError,
    },
}

impl ChallengeError {
    /// HTTP status this error is reported with
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::NotFound { .. } | Self::Adapter { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ChallengeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Adapter { .. } | Self::NotFound { .. } => {
                tracing::warn!(error = %self, "challenge failed");
            }
            Self::Forbidden { user, fqdn } => {
                tracing::info!(user = %user, fqdn = %fqdn, "domain not allowed");
            }
            Self::Unauthorized | Self::Validation(_) => {}
        }

        let body = Json(json!({
            "message": self.to_string(),
            "success": false,
        }));

        if matches!(self, Self::Unauthorized) {
            (
                status,
                [(header::WWW_AUTHENTICATE, r#"Basic realm="acmeproxy""#)],
                body,
            )
                .into_response()
        } else {
            (status, body).into_response()
        }
    }
}
