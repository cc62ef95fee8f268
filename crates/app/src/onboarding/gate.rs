//! Onboarding-completeness gate with bounded retry/backoff.
//!
//! Once the session is authenticated, the gate decides whether the user
//! has a completed profile on the backend. A 503 from `GET /onboarding`
//! means the account is still provisioning, so the gate waits and asks
//! again - honoring the server's `Retry-After` hint when present, falling
//! back to a doubling delay otherwise - until the retry budget runs out.
//! The wait is raced against a `CancellationToken` so teardown never
//! leaves a timer running.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use growth_labs_core::CreatorProfile;

use crate::engine::{EngineClient, EngineError};
use crate::identity::AccessToken;

/// Tunable parameters for the gate's retry strategy.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Retry budget: additional attempts after the initial one.
    pub retries: u32,
    /// Fallback delay before the first retry, used when the engine sends
    /// no `Retry-After` hint.
    pub initial_delay: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

/// Terminal result of an onboarding check.
#[derive(Debug)]
pub enum GateOutcome {
    /// The backend profile exists; protected content may render.
    Complete(Box<CreatorProfile>),
    /// No profile exists yet; the user must run the onboarding flow.
    Incomplete,
    /// The check failed in a way the user must be told about.
    Error { message: String },
    /// Teardown cancelled a pending retry.
    Cancelled,
}

/// Check whether the user has completed onboarding.
///
/// Response handling, in order:
/// - 2xx: [`GateOutcome::Complete`]
/// - 404: [`GateOutcome::Incomplete`] - no profile, zero retries
/// - 401/403: [`GateOutcome::Error`] - the identity provider owns
///   re-authentication, the gate just stops
/// - 503: retry after `Retry-After` seconds (or the doubling fallback)
///   while budget remains, then [`GateOutcome::Error`]
/// - other HTTP failures: [`GateOutcome::Incomplete`] - fail open toward
///   re-onboarding rather than locking the user out
/// - transport failures: [`GateOutcome::Error`] with a generic message
///
/// The gate issues at most `1 + config.retries` requests and never has
/// two in flight at once.
pub async fn check_onboarding(
    engine: &EngineClient,
    token: &AccessToken,
    config: &GateConfig,
    cancel: &CancellationToken,
) -> GateOutcome {
    let mut remaining = config.retries;
    let mut fallback_delay = config.initial_delay;
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        let result = tokio::select! {
            () = cancel.cancelled() => return GateOutcome::Cancelled,
            result = engine.fetch_onboarding(token) => result,
        };

        match result {
            Ok(profile) => return GateOutcome::Complete(Box::new(profile)),
            Err(EngineError::Status {
                status: 404, ..
            }) => return GateOutcome::Incomplete,
            Err(EngineError::Status {
                status: 401 | 403, ..
            }) => {
                return GateOutcome::Error {
                    message: "Your session is no longer valid. Please sign in again.".to_string(),
                };
            }
            Err(EngineError::Status {
                status: 503,
                retry_after,
                ..
            }) => {
                if remaining == 0 {
                    tracing::warn!(attempt, "Onboarding check exhausted its retry budget");
                    return GateOutcome::Error {
                        message: "Account setup is taking longer than expected. Please try again in a moment.".to_string(),
                    };
                }
                remaining -= 1;

                let wait = retry_after.map_or(fallback_delay, Duration::from_secs);
                tracing::info!(
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "Engine still provisioning, retrying onboarding check",
                );

                // Wait before the next attempt, respecting cancellation.
                tokio::select! {
                    () = cancel.cancelled() => return GateOutcome::Cancelled,
                    () = tokio::time::sleep(wait) => {}
                }

                fallback_delay *= 2;
            }
            Err(EngineError::Status { status, .. }) => {
                // Fail open: an unclassified backend failure forces
                // re-onboarding instead of blocking access.
                tracing::warn!(status, "Unexpected status from onboarding check");
                return GateOutcome::Incomplete;
            }
            Err(e) => {
                tracing::error!(error = %e, "Onboarding check failed");
                return GateOutcome::Error {
                    message: "We could not reach the service. Please try again.".to_string(),
                };
            }
        }
    }
}
