use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors a DNS backend can report
#[derive(Error, Debug)]
pub enum AdapterError {
    /// No constructor is registered under this backend id
    #[error("unknown provider backend: {0}")]
    UnknownBackend(String),

    /// Settings blob could not be turned into a working adapter
    #[error("invalid provider settings: {0}")]
    InvalidSettings(String),

    /// Authentication against the vendor API failed
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// Vendor API rejected the call
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// Zone or record does not exist on the backend
    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdapterError {
    /// Shorthand for an [`AdapterError::InvalidSettings`]
    pub fn settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings(message.into())
    }

    /// Returns true if the error happened while constructing the adapter
    #[must_use]
    pub const fn is_construction_error(&self) -> bool {
        matches!(self, Self::UnknownBackend(_) | Self::InvalidSettings(_))
    }

    /// Returns the HTTP status code if the backend answered with one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AdapterError::Api {
            code: 409,
            message: "record already exists".into(),
        };
        assert_eq!(err.to_string(), "API error (409): record already exists");
        assert_eq!(err.status_code(), Some(409));
    }

    #[test]
    fn test_construction_errors() {
        assert!(AdapterError::UnknownBackend("nope".into()).is_construction_error());
        assert!(AdapterError::settings("missing api_token").is_construction_error());
        assert!(!AdapterError::Http("timeout".into()).is_construction_error());
    }
}
