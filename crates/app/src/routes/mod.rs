//! HTTP routes for the frontend service.
//!
//! All routes speak JSON under `/api`. The protected surface requires the
//! identity handoff to have happened ([`crate::middleware::RequireUser`])
//! and the dashboard additionally runs the onboarding gate.

pub mod auth;
pub mod campaigns;
pub mod dashboard;
pub mod onboarding;

use axum::Router;

use crate::state::AppState;

/// Build the application router (without the health endpoints, which the
/// binary mounts directly).
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(onboarding::router())
        .merge(campaigns::router())
}
