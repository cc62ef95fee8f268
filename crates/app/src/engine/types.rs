//! Wire types and response normalization for the Super Engine API.
//!
//! The engine's campaign responses are loosely shaped: the id arrives as
//! `id` or `campaign_id`, the display name as `name` or nested under
//! `goal.title`, the status in lowercase or legacy uppercase, and the
//! plan/strategy text either as a string or wrapped in an object. All of
//! that is resolved here, at the client edge, so domain code only ever
//! sees [`Campaign`].

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use growth_labs_core::{
    Campaign, CampaignId, CampaignStatus, CreatorProfile, Phase2Profile, Platform, WorkspaceId,
};

use super::EngineError;

/// Fallback display name for campaigns the engine returns without one.
const UNTITLED_CAMPAIGN: &str = "Untitled campaign";

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /onboarding`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingSubmission {
    /// Creator's display/brand name from the wizard.
    pub display_name: String,
    pub creator_type: String,
    pub niche: String,
    pub target_audience: String,
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub platform_urls: HashMap<Platform, String>,
    /// Phase-2 enrichment, when the review step collected any of it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase2: Option<Phase2Profile>,
}

/// Body of `POST /campaigns`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignCreate {
    pub name: String,
    pub campaign_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub platforms: Vec<Platform>,
    pub metric: String,
    pub target: u64,
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_themes: Option<String>,
}

// =============================================================================
// Response normalization
// =============================================================================

/// Campaign as the engine actually sends it.
#[derive(Debug, Deserialize)]
struct RawCampaign {
    #[serde(alias = "campaign_id")]
    id: CampaignId,
    workspace_id: WorkspaceId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    goal: Option<RawGoal>,
    #[serde(default)]
    status: CampaignStatus,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(alias = "type")]
    campaign_type: String,
    platforms: Vec<Platform>,
    metric: String,
    target: u64,
    frequency: String,
    #[serde(default)]
    content_themes: Option<String>,
    #[serde(default)]
    strategy: Option<RawText>,
    #[serde(default)]
    plan: Option<RawText>,
}

/// The `goal` field: free text, or an object with a title.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawGoal {
    Text(String),
    Object {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
}

/// AI-generated text: a bare string or an object wrapping one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Object {
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        text: Option<String>,
    },
}

impl RawText {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s),
            Self::Object { content, text } => content.or(text),
        }
    }
}

impl From<RawCampaign> for Campaign {
    fn from(raw: RawCampaign) -> Self {
        let (goal_title, goal_text) = match raw.goal {
            Some(RawGoal::Text(text)) => (None, Some(text)),
            Some(RawGoal::Object { title, description }) => (title, description),
            None => (None, None),
        };

        let name = raw
            .name
            .or_else(|| goal_title.clone())
            .unwrap_or_else(|| UNTITLED_CAMPAIGN.to_string());

        Self {
            id: raw.id,
            name,
            workspace_id: raw.workspace_id,
            status: raw.status,
            start_date: raw.start_date,
            end_date: raw.end_date,
            campaign_type: raw.campaign_type,
            platforms: raw.platforms,
            metric: raw.metric,
            target: raw.target,
            frequency: raw.frequency,
            goal: goal_text.or(goal_title),
            content_themes: raw.content_themes,
            strategy: raw.strategy.and_then(RawText::into_text),
            plan: raw.plan.and_then(RawText::into_text),
        }
    }
}

/// Normalize a single campaign response body.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] when required fields are missing or
/// malformed.
pub fn campaign_from_value(value: Value) -> Result<Campaign, EngineError> {
    let raw: RawCampaign = serde_json::from_value(value)?;
    Ok(raw.into())
}

/// Normalize a campaign-list response body.
///
/// Accepts either a bare array or an object wrapping one under
/// `campaigns`.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] when the body is neither shape or an
/// item fails to normalize.
pub fn campaigns_from_value(value: Value) -> Result<Vec<Campaign>, EngineError> {
    use serde::de::Error as _;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("campaigns") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(EngineError::Parse(serde_json::Error::custom(
                    "expected an array of campaigns",
                )));
            }
        },
        _ => {
            return Err(EngineError::Parse(serde_json::Error::custom(
                "expected an array of campaigns",
            )));
        }
    };

    items.into_iter().map(campaign_from_value).collect()
}

/// Parse a creator-profile response body.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] on shape mismatch.
pub fn profile_from_value(value: Value) -> Result<CreatorProfile, EngineError> {
    Ok(serde_json::from_value(value)?)
}
