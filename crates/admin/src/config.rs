//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VENDOR_API_BASE_URL` - Base URL of the vendor REST API (e.g., `https://api.example.com/v1`)
//! - `VENDOR_API_TOKEN` - Bearer token for the vendor account
//!
//! ## Optional
//! - `VENDOR_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `VENDOR_ERROR_DISPLAY_SECS` - How long error banners stay visible (default: 3)
//! - `VENDOR_PAGE_SIZE` - Rows per page in list views (default: 20)
//! - `VENDOR_PROFILE_PATH` - Local mirror of the store profile (default: `.vendor-desk/profile.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::editor::EditorSettings;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ERROR_DISPLAY_SECS: u64 = 3;
const DEFAULT_PAGE_SIZE: u32 = 20;
const DEFAULT_PROFILE_PATH: &str = ".vendor-desk/profile.json";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Vendor console configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct ConsoleConfig {
    /// Base URL of the vendor REST API
    pub api_base_url: Url,
    /// Bearer token for the vendor account
    pub api_token: SecretString,
    /// Upper bound on any single remote call
    pub request_timeout: Duration,
    /// How long a transient error banner stays visible
    pub error_display: Duration,
    /// Rows per page in list views
    pub page_size: u32,
    /// Local mirror of the store profile
    pub profile_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl std::fmt::Debug for ConsoleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("api_token", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .field("error_display", &self.error_display)
            .field("page_size", &self.page_size)
            .field("profile_path", &self.profile_path)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .finish()
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the API token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(&get_required_env("VENDOR_API_BASE_URL")?)?;
        let api_token = get_validated_secret("VENDOR_API_TOKEN")?;
        let request_timeout = Duration::from_secs(get_parsed_env(
            "VENDOR_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let error_display = Duration::from_secs(get_parsed_env(
            "VENDOR_ERROR_DISPLAY_SECS",
            DEFAULT_ERROR_DISPLAY_SECS,
        )?);
        let page_size = get_parsed_env("VENDOR_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "VENDOR_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let profile_path = PathBuf::from(get_env_or_default(
            "VENDOR_PROFILE_PATH",
            DEFAULT_PROFILE_PATH,
        ));
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            api_base_url,
            api_token,
            request_timeout,
            error_display,
            page_size,
            profile_path,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }

    /// Configuration for a console talking to `api_base_url`, with every
    /// optional setting at its default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse.
    pub fn for_base_url(api_base_url: &str, api_token: SecretString) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(api_base_url)?,
            api_token,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            error_display: Duration::from_secs(DEFAULT_ERROR_DISPLAY_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            profile_path: PathBuf::from(DEFAULT_PROFILE_PATH),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        })
    }

    /// Timing settings handed to every editor and screen.
    #[must_use]
    pub const fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            request_timeout: self.request_timeout,
            flash_window: self.error_display,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an optional environment variable, falling back to `default`.
fn get_parsed_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse the API base URL. Only http(s) is accepted.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        ConfigError::InvalidEnvVar("VENDOR_API_BASE_URL".to_string(), e.to_string())
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "VENDOR_API_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if lower.trim().is_empty() {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "is empty".to_string(),
        ));
    }

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
