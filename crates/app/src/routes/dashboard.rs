//! Dashboard route, gated on onboarding completeness.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use growth_labs_core::{Campaign, CreatorProfile};

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::onboarding::gate::{GateOutcome, check_onboarding};
use crate::onboarding::snapshot::OnboardingSnapshot;
use crate::state::AppState;

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(dashboard))
}

/// Dashboard payload.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum DashboardResponse {
    /// The gate found no profile: the client must run onboarding.
    NeedsOnboarding {
        needs_onboarding: bool,
        redirect: &'static str,
    },
    /// Protected content.
    Ready {
        needs_onboarding: bool,
        profile: Box<CreatorProfile>,
        campaigns: Vec<Campaign>,
    },
}

/// Load the dashboard.
///
/// Runs the onboarding gate first: `complete` serves the summary,
/// `incomplete` tells the client to redirect into onboarding, and an
/// exhausted or failed check maps to 503 with a user-facing message.
///
/// GET /api/dashboard
async fn dashboard(
    RequireUser(auth): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>> {
    let outcome = check_onboarding(
        state.engine(),
        &auth.token,
        state.gate_config(),
        state.shutdown_token(),
    )
    .await;

    match outcome {
        GateOutcome::Complete(profile) => {
            // Refresh the local snapshot while we hold a fresh profile
            state
                .snapshots()
                .put(auth.user.id.clone(), OnboardingSnapshot::of((*profile).clone()))
                .await;

            let campaigns = state.engine().list_campaigns(&auth.token).await?;

            Ok(Json(DashboardResponse::Ready {
                needs_onboarding: false,
                profile,
                campaigns,
            }))
        }
        GateOutcome::Incomplete => Ok(Json(DashboardResponse::NeedsOnboarding {
            needs_onboarding: true,
            redirect: "/onboarding",
        })),
        GateOutcome::Error { message } => Err(AppError::Unavailable(message)),
        GateOutcome::Cancelled => Err(AppError::Unavailable(
            "The service is shutting down".to_string(),
        )),
    }
}
