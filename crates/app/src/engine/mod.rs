//! Super Engine API client.
//!
//! # Architecture
//!
//! - The Super Engine backend is the source of truth for profiles and
//!   campaigns - NO local persistence, direct API calls
//! - Every request carries the session's bearer token when one is present
//! - Response shapes are normalized at this edge ([`types`]) before domain
//!   code sees them
//! - The client never retries on its own; retry policy lives in the
//!   onboarding gate one layer up
//!
//! # Example
//!
//! ```rust,ignore
//! use growth_labs_app::engine::EngineClient;
//!
//! let client = EngineClient::new(&config.engine);
//! let profile = client.fetch_onboarding(&token).await?;
//! let campaigns = client.list_campaigns(&token).await?;
//! ```

mod client;
pub mod types;

pub use client::EngineClient;

use thiserror::Error;

/// Errors that can occur when talking to the Super Engine API.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Transport-level failure (DNS, connection refused, timeout). Carries
    /// no status; callers surface it as a generic failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status. `retry_after` holds
    /// the `Retry-After` response header in seconds, when present.
    #[error("engine returned HTTP {status}: {message}")]
    Status {
        status: u16,
        retry_after: Option<u64>,
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A 2xx response arrived without the body the caller expected.
    #[error("expected a response body")]
    MissingBody,
}

impl EngineError {
    /// The HTTP status for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `Retry-After` hint in seconds for `Status` errors.
    #[must_use]
    pub const fn retry_after(&self) -> Option<u64> {
        match self {
            Self::Status { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = EngineError::Status {
            status: 503,
            retry_after: Some(4),
            message: "provisioning".to_string(),
        };
        assert_eq!(err.to_string(), "engine returned HTTP 503: provisioning");
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.retry_after(), Some(4));
    }

    #[test]
    fn test_non_status_errors_have_no_status() {
        let err = EngineError::MissingBody;
        assert_eq!(err.status(), None);
        assert_eq!(err.retry_after(), None);
    }
}
