//! Shared helpers for integration tests: in-process stub engines and an
//! app instance wired to them.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;

use axum::Router;
use secrecy::SecretString;

use growth_labs_app::config::{AppConfig, EngineConfig, IdentityConfig};
use growth_labs_app::identity::AccessToken;
use growth_labs_app::state::AppState;
use growth_labs_app::{middleware, routes};

/// Serve a router on an ephemeral local port and return its address.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Engine config pointing at a stub server.
pub fn engine_config(addr: SocketAddr) -> EngineConfig {
    EngineConfig {
        base_url: format!("http://{addr}"),
    }
}

/// App config wired to a stub engine.
pub fn app_config(engine_addr: SocketAddr) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        session_secret: SecretString::from("integration-test-session-secret!!".to_string()),
        identity: IdentityConfig {
            publishable_key: "pk_test_integration".to_string(),
        },
        engine: engine_config(engine_addr),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// The full application router with sessions, as `main` assembles it.
pub fn app(state: &AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(middleware::create_session_layer(state.config()))
        .with_state(state.clone())
}

/// Spawn the full application against a stub engine; returns its address.
pub async fn spawn_app(engine_addr: SocketAddr) -> SocketAddr {
    let state = AppState::new(app_config(engine_addr));
    spawn(app(&state)).await
}

/// A bearer token accepted by the stub engines.
pub fn token() -> AccessToken {
    AccessToken::new("test-token", None)
}

/// Extract the session cookie pair from a `Set-Cookie` response header.
pub fn session_cookie(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("response carries a session cookie")
        .to_string()
}
