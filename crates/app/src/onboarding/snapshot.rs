//! Local onboarding snapshot cache.
//!
//! A process-wide, read-through copy of the creator profile written when
//! the onboarding wizard submits and refreshed whenever the gate sees the
//! backend profile. Purely informational: eviction or staleness is
//! harmless because every access decision goes through the gate, and the
//! session carries its own per-client copy under a fixed key.

use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::{Deserialize, Serialize};

use growth_labs_core::{CreatorProfile, UserId};

/// Snapshot retention. Long, because correctness never depends on it.
const SNAPSHOT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Maximum number of cached snapshots.
const SNAPSHOT_CAPACITY: u64 = 10_000;

/// Locally cached view of a creator's onboarding state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingSnapshot {
    pub profile: CreatorProfile,
    /// Single flag marking wizard completion.
    pub completed: bool,
    /// When this copy was taken.
    pub cached_at: DateTime<Utc>,
}

impl OnboardingSnapshot {
    /// Snapshot a freshly fetched or freshly created profile.
    #[must_use]
    pub fn of(profile: CreatorProfile) -> Self {
        Self {
            profile,
            completed: true,
            cached_at: Utc::now(),
        }
    }
}

/// Process-wide snapshot cache keyed by user.
#[derive(Clone)]
pub struct SnapshotCache {
    cache: Cache<UserId, OnboardingSnapshot>,
}

impl SnapshotCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(SNAPSHOT_CAPACITY)
                .time_to_live(SNAPSHOT_TTL)
                .build(),
        }
    }

    /// Cached snapshot for a user, if one is present.
    pub async fn get(&self, user_id: &UserId) -> Option<OnboardingSnapshot> {
        self.cache.get(user_id).await
    }

    /// Store a snapshot for a user.
    pub async fn put(&self, user_id: UserId, snapshot: OnboardingSnapshot) {
        self.cache.insert(user_id, snapshot).await;
    }

    /// Drop a user's snapshot (e.g. on logout or account deletion).
    pub async fn invalidate(&self, user_id: &UserId) {
        self.cache.invalidate(user_id).await;
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use growth_labs_core::Platform;

    fn profile() -> CreatorProfile {
        serde_json::from_value(serde_json::json!({
            "user_id": "user_2aB3xY",
            "creator_type": "educator",
            "niche": "personal finance",
            "target_audience": "young professionals",
            "platforms": ["twitter"],
            "created_at": "2024-01-15T10:00:00Z",
            "updated_at": "2024-01-15T10:00:00Z"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_put_get_invalidate() {
        let cache = SnapshotCache::new();
        let user_id = UserId::new("user_2aB3xY");

        assert!(cache.get(&user_id).await.is_none());

        cache
            .put(user_id.clone(), OnboardingSnapshot::of(profile()))
            .await;
        let snapshot = cache.get(&user_id).await.unwrap();
        assert!(snapshot.completed);
        assert_eq!(snapshot.profile.platforms, vec![Platform::Twitter]);

        cache.invalidate(&user_id).await;
        assert!(cache.get(&user_id).await.is_none());
    }

    #[tokio::test]
    async fn test_snapshots_are_per_user() {
        let cache = SnapshotCache::new();
        cache
            .put(UserId::new("user_a"), OnboardingSnapshot::of(profile()))
            .await;
        assert!(cache.get(&UserId::new("user_b")).await.is_none());
    }
}
