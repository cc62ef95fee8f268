//! Campaign model and creation-draft validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{CampaignId, CampaignStatus, Platform, WorkspaceId};
use crate::wizard::FieldError;

/// A campaign as owned by the Super Engine backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub workspace_id: WorkspaceId,
    pub status: CampaignStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Campaign type (e.g. "product_launch", "audience_growth").
    pub campaign_type: String,
    pub platforms: Vec<Platform>,
    /// The single metric this campaign tracks (e.g. "followers").
    pub metric: String,
    /// Numeric target for the tracked metric.
    pub target: u64,
    /// Posting frequency (e.g. "daily", "3x_week").
    pub frequency: String,
    /// Free-text campaign goal.
    #[serde(default)]
    pub goal: Option<String>,
    /// Free-text content themes.
    #[serde(default)]
    pub content_themes: Option<String>,
    /// AI-generated strategy text, if the backend has produced one.
    #[serde(default)]
    pub strategy: Option<String>,
    /// AI-generated plan text, if the backend has produced one.
    #[serde(default)]
    pub plan: Option<String>,
}

/// Accumulated form data for the campaign-creation wizard.
///
/// Field keys in validation errors use the wire-level camelCase names so
/// the client can attach messages to the offending input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignDraft {
    pub name: String,
    pub campaign_type: String,
    pub start_date: String,
    pub end_date: String,
    pub platforms: Vec<Platform>,
    pub metric: String,
    pub target: u64,
    pub frequency: String,
    pub goal: Option<String>,
    pub content_themes: Option<String>,
}

impl CampaignDraft {
    /// Validate the timeline step: both dates must parse as `YYYY-MM-DD`
    /// and the end date must not precede the start date.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] keyed to the offending field.
    pub fn validate_timeline(&self) -> Result<(), FieldError> {
        let start = parse_date(&self.start_date, "startDate")?;
        let end = parse_date(&self.end_date, "endDate")?;

        if end < start {
            return Err(FieldError::new(
                "endDate",
                "end date must not be before the start date",
            ));
        }

        Ok(())
    }

    /// Parsed start date. Only meaningful after the timeline step validates.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] if the stored string does not parse.
    pub fn start_date(&self) -> Result<NaiveDate, FieldError> {
        parse_date(&self.start_date, "startDate")
    }

    /// Parsed end date. Only meaningful after the timeline step validates.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] if the stored string does not parse.
    pub fn end_date(&self) -> Result<NaiveDate, FieldError> {
        parse_date(&self.end_date, "endDate")
    }
}

fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "date is required"));
    }
    value
        .parse::<NaiveDate>()
        .map_err(|_| FieldError::new(field, "date must be YYYY-MM-DD"))
}
