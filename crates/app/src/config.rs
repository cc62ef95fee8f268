//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GROWTH_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `GROWTH_IDENTITY_PUBLISHABLE_KEY` - Identity provider publishable key
//!   (`pk_`-prefixed); absence is a fatal startup error
//!
//! ## Optional
//! - `GROWTH_HOST` - Bind address (default: 127.0.0.1)
//! - `GROWTH_PORT` - Listen port (default: 3000)
//! - `GROWTH_BASE_URL` - Public URL for the service (default: http://localhost:3000)
//! - `GROWTH_ENGINE_URL` - Super Engine API base URL (default: http://127.0.0.1:8000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Prefix every identity-provider publishable key carries.
const PUBLISHABLE_KEY_PREFIX: &str = "pk_";

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

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the service
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Identity provider configuration
    pub identity: IdentityConfig,
    /// Super Engine API configuration
    pub engine: EngineConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Identity provider configuration.
///
/// The provider's internals (login UI, token refresh) live in its own SDK;
/// this service only needs the publishable key to validate the handoff.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Publishable key identifying the identity-provider instance.
    pub publishable_key: String,
}

/// Super Engine API configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the Super Engine backend.
    pub base_url: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    /// A missing identity publishable key is treated as fatal by `main`.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("GROWTH_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GROWTH_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("GROWTH_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GROWTH_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("GROWTH_BASE_URL", "http://localhost:3000");

        let session_secret = SecretString::from(get_required_env("GROWTH_SESSION_SECRET")?);
        validate_session_secret(&session_secret, "GROWTH_SESSION_SECRET")?;

        let identity = IdentityConfig::from_env()?;
        let engine = EngineConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            identity,
            engine,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl IdentityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let publishable_key = get_required_env("GROWTH_IDENTITY_PUBLISHABLE_KEY")?;
        validate_publishable_key(&publishable_key, "GROWTH_IDENTITY_PUBLISHABLE_KEY")?;
        Ok(Self { publishable_key })
    }
}

impl EngineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("GROWTH_ENGINE_URL", "http://127.0.0.1:8000");
        validate_base_url(&base_url, "GROWTH_ENGINE_URL")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
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
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements and is
/// not an obvious placeholder.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }

    let lower = value.to_lowercase();
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

/// Validate the shape of an identity-provider publishable key.
///
/// Publishable keys are not secrets, but a value that does not carry the
/// `pk_` prefix is always a copy/paste mistake (often the secret key).
fn validate_publishable_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    if !key.starts_with(PUBLISHABLE_KEY_PREFIX) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must start with '{PUBLISHABLE_KEY_PREFIX}'"),
        ));
    }
    if key.len() <= PUBLISHABLE_KEY_PREFIX.len() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "key is empty after the prefix".to_string(),
        ));
    }
    Ok(())
}

/// Validate that a base URL parses and uses http(s).
fn validate_base_url(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SECRET").is_err());
    }

    #[test]
    fn test_validate_session_secret_placeholder() {
        let secret = SecretString::from("changeme-changeme-changeme-changeme");
        let err = validate_session_secret(&secret, "TEST_SECRET").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_session_secret_valid() {
        let secret = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6d");
        assert!(validate_session_secret(&secret, "TEST_SECRET").is_ok());
    }

    #[test]
    fn test_validate_publishable_key_missing_prefix() {
        let err = validate_publishable_key("sk_live_abc123", "TEST_KEY").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_validate_publishable_key_empty_after_prefix() {
        assert!(validate_publishable_key("pk_", "TEST_KEY").is_err());
    }

    #[test]
    fn test_validate_publishable_key_valid() {
        assert!(validate_publishable_key("pk_live_abc123", "TEST_KEY").is_ok());
    }

    #[test]
    fn test_validate_base_url_rejects_garbage() {
        assert!(validate_base_url("not a url", "TEST_URL").is_err());
        assert!(validate_base_url("ftp://example.com", "TEST_URL").is_err());
    }

    #[test]
    fn test_validate_base_url_accepts_http() {
        assert!(validate_base_url("http://127.0.0.1:8000", "TEST_URL").is_ok());
        assert!(validate_base_url("https://api.growthlabs.app", "TEST_URL").is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            identity: IdentityConfig {
                publishable_key: "pk_test_abc".to_string(),
            },
            engine: EngineConfig {
                base_url: "http://127.0.0.1:8000".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
