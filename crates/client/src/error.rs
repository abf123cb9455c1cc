//! Error types for the Knuspr client.
//!
//! Every failure surfaces as one [`KnusprError`], so callers can match on a
//! specific variant or treat all of them alike. Nothing is retried
//! internally.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur when talking to the Knuspr storefront API.
#[derive(Debug, Error)]
pub enum KnusprError {
    /// Login rejected, or the session expired.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The API answered HTTP 429.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The API reported an error, either through the HTTP status or the
    /// envelope's inner `status`.
    #[error("API error{}: {message}", format_status(.status))]
    Api {
        message: String,
        status: Option<i64>,
    },

    /// Connection-level failure (DNS, timeout, refused).
    #[error("Request to {path} failed: {source}")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// A body or record could not be decoded.
    #[error("Invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload decoded but has an unexpected structure.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Client used incorrectly, e.g. before `connect` or without a session.
    #[error("{0}")]
    Client(String),
}

impl KnusprError {
    /// Status code carried by an [`KnusprError::Api`] error.
    #[must_use]
    pub const fn status(&self) -> Option<i64> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    pub(crate) fn network(path: &str, source: reqwest::Error) -> Self {
        Self::Network {
            path: path.to_owned(),
            source,
        }
    }
}

#[allow(clippy::ref_option)] // thiserror passes fields by reference
fn format_status(status: &Option<i64>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_status() {
        let err = KnusprError::Api {
            message: "Internal server error".to_string(),
            status: Some(500),
        };
        assert_eq!(err.to_string(), "API error (500): Internal server error");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_api_error_display_without_status() {
        let err = KnusprError::Api {
            message: "API error".to_string(),
            status: None,
        };
        assert_eq!(err.to_string(), "API error: API error");
    }

    #[test]
    fn test_authentication_error_display() {
        let err = KnusprError::Authentication("Invalid credentials".to_string());
        assert_eq!(err.to_string(), "Authentication failed: Invalid credentials");
        assert!(err.is_authentication());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_client_error_display() {
        let err = KnusprError::Client("Client not initialized".to_string());
        assert_eq!(err.to_string(), "Client not initialized");
    }

    #[test]
    fn test_config_error_converts() {
        let err: KnusprError =
            ConfigError::InvalidEnvVar("KNUSPR_DEBUG".to_string(), "bad".to_string()).into();
        assert!(matches!(err, KnusprError::Config(_)));
    }
}
