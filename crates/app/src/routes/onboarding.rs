//! Onboarding wizard routes.
//!
//! The wizard's `(form, index)` state lives in the session between
//! requests; every endpoint rebuilds the wizard from the static step
//! table, applies one operation, and persists the state back.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use growth_labs_core::wizard::{self, FieldError};
use growth_labs_core::{CreatorProfile, Platform};

use crate::error::{AppError, Result};
use crate::flows::WizardSession;
use crate::flows::onboarding::{OnboardingForm, wizard as build_wizard};
use crate::identity::session_keys;
use crate::middleware::RequireUser;
use crate::onboarding::snapshot::OnboardingSnapshot;
use crate::state::AppState;

/// Build the onboarding wizard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/onboarding", get(wizard_state))
        .route("/api/onboarding/form", put(update_form))
        .route("/api/onboarding/next", post(next_step))
        .route("/api/onboarding/back", post(back_step))
        .route("/api/onboarding/toggle", post(toggle_selection))
        .route("/api/onboarding/submit", post(submit))
}

/// Wizard state as reported to the client.
#[derive(Debug, Serialize)]
struct WizardStateResponse {
    step: &'static str,
    label: &'static str,
    index: usize,
    total: usize,
    /// Whether the current step's predicate passes right now. Advancing
    /// is still enforced server-side; this only drives the UI affordance.
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<FieldError>,
    form: OnboardingForm,
}

async fn load(session: &Session) -> Result<WizardSession<OnboardingForm>> {
    Ok(session
        .get(session_keys::ONBOARDING_WIZARD)
        .await?
        .unwrap_or_default())
}

async fn save(session: &Session, state: &WizardSession<OnboardingForm>) -> Result<()> {
    session
        .insert(session_keys::ONBOARDING_WIZARD, state)
        .await?;
    Ok(())
}

fn state_response(state: WizardSession<OnboardingForm>) -> Result<Json<WizardStateResponse>> {
    let wizard = build_wizard(state.form, state.index)?;
    let error = wizard.validate_current().err();
    Ok(Json(WizardStateResponse {
        step: wizard.current().key,
        label: wizard.current().label,
        index: wizard.index(),
        total: wizard.len(),
        valid: error.is_none(),
        error,
        form: wizard.into_form(),
    }))
}

/// Current wizard state.
///
/// GET /api/onboarding
async fn wizard_state(
    RequireUser(_auth): RequireUser,
    session: Session,
) -> Result<Json<WizardStateResponse>> {
    let state = load(&session).await?;
    state_response(state)
}

/// Replace the accumulated form data without moving between steps.
///
/// PUT /api/onboarding/form
async fn update_form(
    RequireUser(_auth): RequireUser,
    session: Session,
    Json(form): Json<OnboardingForm>,
) -> Result<Json<WizardStateResponse>> {
    let mut state = load(&session).await?;
    state.form = form;
    save(&session, &state).await?;
    state_response(state)
}

/// Advance one step. Refused with 422 while the current step is invalid.
///
/// POST /api/onboarding/next
async fn next_step(
    RequireUser(_auth): RequireUser,
    session: Session,
) -> Result<Json<WizardStateResponse>> {
    let state = load(&session).await?;
    let mut wizard = build_wizard(state.form, state.index)?;

    wizard.next().map_err(AppError::Validation)?;

    let state = WizardSession {
        index: wizard.index(),
        form: wizard.into_form(),
    };
    save(&session, &state).await?;
    state_response(state)
}

/// Go back one step. No-op at the first step.
///
/// POST /api/onboarding/back
async fn back_step(
    RequireUser(_auth): RequireUser,
    session: Session,
) -> Result<Json<WizardStateResponse>> {
    let state = load(&session).await?;
    let mut wizard = build_wizard(state.form, state.index)?;

    wizard.back();

    let state = WizardSession {
        index: wizard.index(),
        form: wizard.into_form(),
    };
    save(&session, &state).await?;
    state_response(state)
}

/// Request body for toggling a multi-select value.
#[derive(Debug, Deserialize)]
struct ToggleRequest {
    field: String,
    value: String,
}

/// Toggle a value in one of the multi-select fields.
///
/// POST /api/onboarding/toggle
async fn toggle_selection(
    RequireUser(_auth): RequireUser,
    session: Session,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<WizardStateResponse>> {
    let mut state = load(&session).await?;

    match req.field.as_str() {
        "goals" => wizard::toggle(&mut state.form.goals, req.value),
        "platforms" => {
            let platform: Platform = req
                .value
                .parse()
                .map_err(|e: String| AppError::BadRequest(e))?;
            wizard::toggle(&mut state.form.platforms, platform);
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "'{other}' is not a multi-select field"
            )));
        }
    }

    save(&session, &state).await?;
    state_response(state)
}

/// Response after a successful submission.
#[derive(Debug, Serialize)]
struct SubmitResponse {
    success: bool,
    redirect: &'static str,
    profile: CreatorProfile,
}

/// Submit the completed wizard: persist the profile to the engine and
/// write through the local snapshot.
///
/// POST /api/onboarding/submit
async fn submit(
    RequireUser(auth): RequireUser,
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SubmitResponse>> {
    let wizard_state = load(&session).await?;
    let wizard = build_wizard(wizard_state.form, wizard_state.index)?;

    // submit() enforces both the final-step position and its validity
    let form = wizard.submit()?;

    let profile = state
        .engine()
        .submit_onboarding(&auth.token, &form.into_submission())
        .await?;
    // On failure above, the wizard session state is intentionally kept so
    // the user can retry.

    let snapshot = OnboardingSnapshot::of(profile.clone());
    state
        .snapshots()
        .put(auth.user.id.clone(), snapshot.clone())
        .await;
    session
        .insert(session_keys::ONBOARDING_SNAPSHOT, &snapshot)
        .await?;

    let _ = session
        .remove::<WizardSession<OnboardingForm>>(session_keys::ONBOARDING_WIZARD)
        .await;

    tracing::info!(user_id = %auth.user.id, "Onboarding completed");

    Ok(Json(SubmitResponse {
        success: true,
        redirect: "/dashboard",
        profile,
    }))
}
