//! Creator profile as owned by the Super Engine backend.
//!
//! Existence of this record on the backend is the sole signal that a user
//! has completed onboarding: absence means incomplete. The frontend never
//! treats a locally cached copy as authoritative.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Platform, UserId};

/// A creator's onboarding profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorProfile {
    /// Identity-provider user this profile belongs to.
    pub user_id: UserId,
    /// What kind of creator this is (e.g. "educator", "entertainer").
    pub creator_type: String,
    /// Content niche (e.g. "personal finance").
    pub niche: String,
    /// Free-text description of the target audience.
    pub target_audience: String,
    /// Platforms the creator publishes on.
    pub platforms: Vec<Platform>,
    /// Profile URLs keyed by platform.
    #[serde(default)]
    pub platform_urls: HashMap<Platform, String>,
    /// Optional phase-2 enrichment, filled in after the initial wizard.
    #[serde(default)]
    pub phase2: Option<Phase2Profile>,
    /// Whether the phase-2 enrichment has been completed.
    #[serde(default)]
    pub phase2_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Phase-2 enrichment fields.
///
/// All optional; collected on the review step of the onboarding wizard or
/// later from the profile settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Phase2Profile {
    /// What makes this creator's take different.
    #[serde(default)]
    pub unique_angle: Option<String>,
    /// Why the creator makes content.
    #[serde(default)]
    pub motivation: Option<String>,
    /// Self-assessed strengths.
    #[serde(default)]
    pub strengths: Option<String>,
}

impl Phase2Profile {
    /// True when no enrichment field has been filled in.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.unique_angle.is_none() && self.motivation.is_none() && self.strengths.is_none()
    }
}
