//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; a `.env` file in the working directory is
//! read first if present.
//!
//! - `KNUSPR_USERNAME` - Account email (default: empty)
//! - `KNUSPR_PASSWORD` - Account password (default: empty)
//! - `KNUSPR_BASE_URL` - Storefront root (default: `https://www.knuspr.de`)
//! - `KNUSPR_LANGUAGE` - `Accept-Language` header (default: `de-DE,de;q=0.9,en;q=0.8`)
//! - `KNUSPR_MIN_REQUEST_INTERVAL` - Seconds between requests (default: 0.1)
//! - `KNUSPR_REQUEST_TIMEOUT` - Per-request timeout in seconds (default: 10.0)
//! - `KNUSPR_DEBUG` - Verbose logging in the CLI (default: false)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Storefront root used when `KNUSPR_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "https://www.knuspr.de";

/// German-first `Accept-Language` value.
pub const DEFAULT_LANGUAGE: &str = "de-DE,de;q=0.9,en;q=0.8";

const DEFAULT_MIN_REQUEST_INTERVAL_SECS: f64 = 0.1;
const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 10.0;

const ENV_USERNAME: &str = "KNUSPR_USERNAME";
const ENV_PASSWORD: &str = "KNUSPR_PASSWORD";
const ENV_BASE_URL: &str = "KNUSPR_BASE_URL";
const ENV_LANGUAGE: &str = "KNUSPR_LANGUAGE";
const ENV_MIN_REQUEST_INTERVAL: &str = "KNUSPR_MIN_REQUEST_INTERVAL";
const ENV_REQUEST_TIMEOUT: &str = "KNUSPR_REQUEST_TIMEOUT";
const ENV_DEBUG: &str = "KNUSPR_DEBUG";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Knuspr client configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct KnusprConfig {
    /// Account email used for login
    pub username: String,
    /// Account password
    pub password: SecretString,
    /// Storefront root, without trailing slash
    pub base_url: String,
    /// `Accept-Language` header value
    pub language: String,
    /// Minimum spacing between outbound requests
    pub min_request_interval: Duration,
    /// Transport-level timeout for each request
    pub request_timeout: Duration,
    /// Verbose logging
    pub debug: bool,
}

impl std::fmt::Debug for KnusprConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnusprConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("min_request_interval", &self.min_request_interval)
            .field("request_timeout", &self.request_timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Default for KnusprConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: SecretString::from(String::new()),
            base_url: DEFAULT_BASE_URL.to_owned(),
            language: DEFAULT_LANGUAGE.to_owned(),
            min_request_interval: Duration::from_secs_f64(DEFAULT_MIN_REQUEST_INTERVAL_SECS),
            request_timeout: Duration::from_secs_f64(DEFAULT_REQUEST_TIMEOUT_SECS),
            debug: false,
        }
    }
}

impl KnusprConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric or boolean variable doesn't parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to the
    /// defaults for absent keys.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric or boolean value doesn't parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            username: lookup(ENV_USERNAME).unwrap_or(defaults.username),
            password: lookup(ENV_PASSWORD).map_or(defaults.password, SecretString::from),
            base_url: lookup(ENV_BASE_URL)
                .map_or(defaults.base_url, |url| normalize_base_url(&url)),
            language: lookup(ENV_LANGUAGE).unwrap_or(defaults.language),
            min_request_interval: lookup(ENV_MIN_REQUEST_INTERVAL)
                .map(|v| parse_seconds(ENV_MIN_REQUEST_INTERVAL, &v))
                .transpose()?
                .unwrap_or(defaults.min_request_interval),
            request_timeout: lookup(ENV_REQUEST_TIMEOUT)
                .map(|v| parse_seconds(ENV_REQUEST_TIMEOUT, &v))
                .transpose()?
                .unwrap_or(defaults.request_timeout),
            debug: lookup(ENV_DEBUG)
                .map(|v| parse_bool(ENV_DEBUG, &v))
                .transpose()?
                .unwrap_or(defaults.debug),
        })
    }

    /// Replace the login credentials.
    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.username = username.into();
        self.password = password;
        self
    }

    /// Replace the storefront root. A trailing slash is dropped.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub const fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

/// Parse a non-negative, finite number of seconds.
fn parse_seconds(key: &str, value: &str) -> Result<Duration, ConfigError> {
    let secs = value
        .trim()
        .parse::<f64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))?;

    Duration::try_from_secs_f64(secs).map_err(|_| {
        ConfigError::InvalidEnvVar(
            key.to_owned(),
            format!("must be a non-negative number of seconds (got {value})"),
        )
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            format!("expected a boolean (got {other})"),
        )),
    }
}
