//! Application state shared across handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::engine::EngineClient;
use crate::onboarding::gate::GateConfig;
use crate::onboarding::snapshot::SnapshotCache;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the engine client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    engine: EngineClient,
    gate: GateConfig,
    snapshots: SnapshotCache,
    shutdown: CancellationToken,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let engine = EngineClient::new(&config.engine);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                engine,
                gate: GateConfig::default(),
                snapshots: SnapshotCache::new(),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the Super Engine API client.
    #[must_use]
    pub fn engine(&self) -> &EngineClient {
        &self.inner.engine
    }

    /// Get a reference to the onboarding-gate configuration.
    #[must_use]
    pub fn gate_config(&self) -> &GateConfig {
        &self.inner.gate
    }

    /// Get a reference to the onboarding snapshot cache.
    #[must_use]
    pub fn snapshots(&self) -> &SnapshotCache {
        &self.inner.snapshots
    }

    /// Token cancelled when the process begins graceful shutdown.
    ///
    /// Pending gate retries race against it so no timer outlives the
    /// server.
    #[must_use]
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.inner.shutdown
    }
}
