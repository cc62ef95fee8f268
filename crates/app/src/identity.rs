//! Identity-provider session types.
//!
//! The identity provider is an external collaborator: its SDK signs the
//! user in and hands this service a user snapshot and a bearer token via
//! the session handoff endpoint. This module holds the session-stored
//! representation of that state. Token refresh is the provider's problem;
//! an expired token simply fails the next handoff.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use growth_labs_core::{Email, UserId};

/// Session-stored user identity.
///
/// Read-only external state owned by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Opaque identity-provider user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: Email,
    /// Avatar image URL, if the provider has one.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Set when the account has been scheduled for deletion.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CurrentUser {
    /// Whether the account has been scheduled for deletion.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Bearer token for the Super Engine API, as handed over by the identity
/// provider.
///
/// Implements `Debug` manually to redact the token value.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
    token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Wrap a raw bearer token.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// The raw token value, for the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Whether the token has expired, if an expiry is known.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Payload posted by the identity provider's browser SDK after sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionHandoff {
    pub user: CurrentUser,
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Session keys for authentication and flow state.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the Super Engine bearer token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for the onboarding wizard's `(form, index)` state.
    pub const ONBOARDING_WIZARD: &str = "onboarding_wizard";

    /// Key for the campaign-creation wizard's `(form, index)` state.
    pub const CAMPAIGN_WIZARD: &str = "campaign_wizard";

    /// Key for the client-durable onboarding snapshot (cache only).
    pub const ONBOARDING_SNAPSHOT: &str = "onboarding_snapshot";
}
