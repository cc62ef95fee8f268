//! Campaign routes: listing, detail, and the creation wizard.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use growth_labs_core::wizard::{self, FieldError};
use growth_labs_core::{Campaign, CampaignDraft, CampaignId, Platform};

use crate::error::{AppError, Result};
use crate::flows::WizardSession;
use crate::flows::campaign::{into_create, wizard as build_wizard};
use crate::identity::session_keys;
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Build the campaigns router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/campaigns", get(list_campaigns))
        .route("/api/campaigns/{id}", get(get_campaign))
        .route("/api/campaigns/new", get(wizard_state))
        .route("/api/campaigns/new/form", put(update_form))
        .route("/api/campaigns/new/next", post(next_step))
        .route("/api/campaigns/new/back", post(back_step))
        .route("/api/campaigns/new/toggle", post(toggle_platform))
        .route("/api/campaigns/new/submit", post(submit))
}

// =============================================================================
// Listing and detail
// =============================================================================

/// List the user's campaigns.
///
/// GET /api/campaigns
async fn list_campaigns(
    RequireUser(auth): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Campaign>>> {
    let campaigns = state.engine().list_campaigns(&auth.token).await?;
    Ok(Json(campaigns))
}

/// Fetch one campaign.
///
/// GET /api/campaigns/{id}
async fn get_campaign(
    RequireUser(auth): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>> {
    let id = CampaignId::new(id);
    let campaign = state.engine().get_campaign(&auth.token, &id).await?;
    Ok(Json(campaign))
}

// =============================================================================
// Creation wizard
// =============================================================================

/// Wizard state as reported to the client.
#[derive(Debug, Serialize)]
struct WizardStateResponse {
    step: &'static str,
    label: &'static str,
    index: usize,
    total: usize,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<FieldError>,
    form: CampaignDraft,
}

async fn load(session: &Session) -> Result<WizardSession<CampaignDraft>> {
    Ok(session
        .get(session_keys::CAMPAIGN_WIZARD)
        .await?
        .unwrap_or_default())
}

async fn save(session: &Session, state: &WizardSession<CampaignDraft>) -> Result<()> {
    session.insert(session_keys::CAMPAIGN_WIZARD, state).await?;
    Ok(())
}

fn state_response(state: WizardSession<CampaignDraft>) -> Result<Json<WizardStateResponse>> {
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
/// GET /api/campaigns/new
async fn wizard_state(
    RequireUser(_auth): RequireUser,
    session: Session,
) -> Result<Json<WizardStateResponse>> {
    let state = load(&session).await?;
    state_response(state)
}

/// Replace the draft without moving between steps.
///
/// PUT /api/campaigns/new/form
async fn update_form(
    RequireUser(_auth): RequireUser,
    session: Session,
    Json(form): Json<CampaignDraft>,
) -> Result<Json<WizardStateResponse>> {
    let mut state = load(&session).await?;
    state.form = form;
    save(&session, &state).await?;
    state_response(state)
}

/// Advance one step. Refused with 422 while the current step is invalid.
///
/// POST /api/campaigns/new/next
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
/// POST /api/campaigns/new/back
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

/// Request body for toggling a target platform.
#[derive(Debug, Deserialize)]
struct ToggleRequest {
    value: String,
}

/// Toggle a platform in the draft's target list.
///
/// POST /api/campaigns/new/toggle
async fn toggle_platform(
    RequireUser(_auth): RequireUser,
    session: Session,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<WizardStateResponse>> {
    let mut state = load(&session).await?;

    let platform: Platform = req
        .value
        .parse()
        .map_err(|e: String| AppError::BadRequest(e))?;
    wizard::toggle(&mut state.form.platforms, platform);

    save(&session, &state).await?;
    state_response(state)
}

/// Response after a successful submission.
#[derive(Debug, Serialize)]
struct SubmitResponse {
    success: bool,
    redirect: String,
    campaign: Campaign,
}

/// Submit the completed wizard: create the campaign on the engine.
///
/// POST /api/campaigns/new/submit
async fn submit(
    RequireUser(auth): RequireUser,
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SubmitResponse>> {
    let wizard_state = load(&session).await?;
    let wizard = build_wizard(wizard_state.form, wizard_state.index)?;

    // submit() enforces both the final-step position and its validity
    let draft = wizard.submit()?;
    let create = into_create(draft).map_err(AppError::Validation)?;

    let campaign = state.engine().create_campaign(&auth.token, &create).await?;
    // On failure above, the wizard session state is intentionally kept so
    // the user can retry.

    let _ = session
        .remove::<WizardSession<CampaignDraft>>(session_keys::CAMPAIGN_WIZARD)
        .await;

    tracing::info!(campaign_id = %campaign.id, "Campaign created");

    Ok(Json(SubmitResponse {
        success: true,
        redirect: format!("/campaigns/{}", campaign.id),
        campaign,
    }))
}
