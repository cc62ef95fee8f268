//! Session handoff routes.
//!
//! The identity provider's browser SDK completes sign-in on its own and
//! then posts the user snapshot plus bearer token here. This service
//! never sees credentials; it only stores the handoff in the session.

use axum::{Json, Router, extract::State, routing::{get, post}};
use serde::Serialize;
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::identity::{AccessToken, CurrentUser, SessionHandoff, session_keys};
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::onboarding::snapshot::OnboardingSnapshot;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/session", post(create_session))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

/// Response after a successful handoff.
#[derive(Debug, Serialize)]
struct SessionResponse {
    success: bool,
    user: CurrentUser,
}

/// Accept the identity-provider handoff and establish the session.
///
/// POST /api/auth/session
async fn create_session(
    session: Session,
    Json(handoff): Json<SessionHandoff>,
) -> Result<Json<SessionResponse>> {
    if handoff.user.is_deleted() {
        return Err(AppError::Unauthorized(
            "This account is scheduled for deletion".to_string(),
        ));
    }

    if handoff.token.trim().is_empty() {
        return Err(AppError::BadRequest("missing bearer token".to_string()));
    }

    let token = AccessToken::new(handoff.token, handoff.expires_at);
    if token.is_expired() {
        return Err(AppError::Unauthorized(
            "The provided token has already expired".to_string(),
        ));
    }

    set_current_user(&session, &handoff.user, &token).await?;

    tracing::info!(user_id = %handoff.user.id, "Session established");

    Ok(Json(SessionResponse {
        success: true,
        user: handoff.user,
    }))
}

/// Response after logout.
#[derive(Debug, Serialize)]
struct LogoutResponse {
    success: bool,
}

/// Clear the session.
///
/// POST /api/auth/logout
async fn logout(State(state): State<AppState>, session: Session) -> Result<Json<LogoutResponse>> {
    // Drop the process-wide snapshot along with the session copy
    if let Ok(Some(user)) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
    {
        state.snapshots().invalidate(&user.id).await;
    }

    clear_current_user(&session).await?;
    let _ = session
        .remove::<OnboardingSnapshot>(session_keys::ONBOARDING_SNAPSHOT)
        .await;

    Ok(Json(LogoutResponse { success: true }))
}

/// Current session, if any.
///
/// GET /api/auth/me
async fn me(OptionalUser(authed): OptionalUser) -> Json<Option<CurrentUser>> {
    Json(authed.map(|a| a.user))
}
