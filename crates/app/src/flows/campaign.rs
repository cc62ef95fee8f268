//! Campaign-creation wizard flow.
//!
//! Four steps: basics, timeline, platforms, metric. The timeline step
//! rejects an end date earlier than the start date with an error keyed to
//! `endDate`.

use growth_labs_core::CampaignDraft;
use growth_labs_core::wizard::{FieldError, Step, Wizard, WizardError};

use crate::engine::types::CampaignCreate;

/// Step keys, stable across releases because clients key their UI on them.
pub const STEP_BASICS: &str = "basics";
pub const STEP_TIMELINE: &str = "timeline";
pub const STEP_PLATFORMS: &str = "platforms";
pub const STEP_METRIC: &str = "metric";

fn basics_valid(draft: &CampaignDraft) -> Result<(), FieldError> {
    if draft.name.trim().is_empty() {
        return Err(FieldError::new("name", "campaign name is required"));
    }
    if draft.campaign_type.trim().is_empty() {
        return Err(FieldError::new("campaignType", "campaign type is required"));
    }
    Ok(())
}

fn timeline_valid(draft: &CampaignDraft) -> Result<(), FieldError> {
    draft.validate_timeline()
}

fn platforms_valid(draft: &CampaignDraft) -> Result<(), FieldError> {
    if draft.platforms.is_empty() {
        return Err(FieldError::new("platforms", "select at least one platform"));
    }
    Ok(())
}

fn metric_valid(draft: &CampaignDraft) -> Result<(), FieldError> {
    if draft.metric.trim().is_empty() {
        return Err(FieldError::new("metric", "tracked metric is required"));
    }
    if draft.target == 0 {
        return Err(FieldError::new("target", "target must be greater than zero"));
    }
    if draft.frequency.trim().is_empty() {
        return Err(FieldError::new("frequency", "posting frequency is required"));
    }
    Ok(())
}

/// The campaign-creation step table.
#[must_use]
pub fn steps() -> Vec<Step<CampaignDraft>> {
    vec![
        Step {
            key: STEP_BASICS,
            label: "Basics",
            validate: basics_valid,
        },
        Step {
            key: STEP_TIMELINE,
            label: "Timeline",
            validate: timeline_valid,
        },
        Step {
            key: STEP_PLATFORMS,
            label: "Platforms",
            validate: platforms_valid,
        },
        Step {
            key: STEP_METRIC,
            label: "Goal & Metric",
            validate: metric_valid,
        },
    ]
}

/// Rebuild the campaign wizard from persisted session state.
///
/// # Errors
///
/// Never fails in practice; the step table is non-empty.
pub fn wizard(draft: CampaignDraft, index: usize) -> Result<Wizard<CampaignDraft>, WizardError> {
    Wizard::resume(steps(), draft, index)
}

/// Convert a submitted draft into the engine request.
///
/// # Errors
///
/// Returns a [`FieldError`] if the stored date strings fail to parse,
/// which cannot happen for a draft that passed the timeline step.
pub fn into_create(draft: CampaignDraft) -> Result<CampaignCreate, FieldError> {
    let start_date = draft.start_date()?;
    let end_date = draft.end_date()?;

    Ok(CampaignCreate {
        name: draft.name,
        campaign_type: draft.campaign_type,
        start_date,
        end_date,
        platforms: draft.platforms,
        metric: draft.metric,
        target: draft.target,
        frequency: draft.frequency,
        goal: draft.goal,
        content_themes: draft.content_themes,
    })
}
