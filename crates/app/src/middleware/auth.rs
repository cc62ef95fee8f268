//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring an identity-provider session in route
//! handlers. The session stores the user snapshot and the bearer token
//! accepted at the handoff endpoint.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::identity::{AccessToken, CurrentUser, session_keys};

/// The authenticated session: user snapshot plus the engine bearer token.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user: CurrentUser,
    pub token: AccessToken,
}

/// Extractor that requires an authenticated session.
///
/// If no session is present, API requests get 401 and page requests a
/// redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(auth): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.name)
/// }
/// ```
pub struct RequireUser(pub AuthedUser);

/// Error returned when authentication is required but not present.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let reject = || {
            let is_api = parts.uri.path().starts_with("/api/");
            if is_api {
                AuthRejection::Unauthorized
            } else {
                AuthRejection::RedirectToLogin
            }
        };

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(reject)?;

        let token: AccessToken = session
            .get(session_keys::ACCESS_TOKEN)
            .await
            .ok()
            .flatten()
            .ok_or_else(reject)?;

        Ok(Self(AuthedUser { user, token }))
    }
}

/// Extractor that optionally gets the authenticated session.
///
/// Unlike `RequireUser`, this does not reject the request if the user is
/// not logged in.
pub struct OptionalUser(pub Option<AuthedUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authed = match parts.extensions.get::<Session>() {
            Some(session) => {
                let user = session
                    .get::<CurrentUser>(session_keys::CURRENT_USER)
                    .await
                    .ok()
                    .flatten();
                let token = session
                    .get::<AccessToken>(session_keys::ACCESS_TOKEN)
                    .await
                    .ok()
                    .flatten();
                match (user, token) {
                    (Some(user), Some(token)) => Some(AuthedUser { user, token }),
                    _ => None,
                }
            }
            None => None,
        };

        Ok(Self(authed))
    }
}

/// Helper to store the authenticated session after a handoff.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
    token: &AccessToken,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await?;
    session.insert(session_keys::ACCESS_TOKEN, token).await
}

/// Helper to clear the authenticated session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session
        .remove::<AccessToken>(session_keys::ACCESS_TOKEN)
        .await?;
    Ok(())
}
