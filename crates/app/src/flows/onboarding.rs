//! Onboarding wizard flow.
//!
//! Four steps: identity-and-niche, goals, platforms, review. The review
//! step collects the optional phase-2 enrichment and never blocks
//! submission.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use growth_labs_core::wizard::{FieldError, Step, Wizard, WizardError};
use growth_labs_core::{Phase2Profile, Platform};

use crate::engine::types::OnboardingSubmission;

/// Step keys, stable across releases because clients key their UI on them.
pub const STEP_IDENTITY: &str = "identity";
pub const STEP_GOALS: &str = "goals";
pub const STEP_PLATFORMS: &str = "platforms";
pub const STEP_REVIEW: &str = "review";

/// Accumulated onboarding form data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingForm {
    /// Creator's display/brand name.
    pub name: String,
    pub creator_type: String,
    pub niche: String,
    pub target_audience: String,
    /// Selected growth goals (multi-select).
    pub goals: Vec<String>,
    /// Selected platforms (multi-select).
    pub platforms: Vec<Platform>,
    pub platform_urls: HashMap<Platform, String>,
    pub unique_angle: Option<String>,
    pub motivation: Option<String>,
    pub strengths: Option<String>,
}

impl OnboardingForm {
    /// Convert a completed form into the engine submission.
    #[must_use]
    pub fn into_submission(self) -> OnboardingSubmission {
        let phase2 = Phase2Profile {
            unique_angle: self.unique_angle,
            motivation: self.motivation,
            strengths: self.strengths,
        };

        OnboardingSubmission {
            display_name: self.name,
            creator_type: self.creator_type,
            niche: self.niche,
            target_audience: self.target_audience,
            platforms: self.platforms,
            platform_urls: self.platform_urls,
            phase2: (!phase2.is_empty()).then_some(phase2),
        }
    }
}

fn identity_valid(form: &OnboardingForm) -> Result<(), FieldError> {
    if form.name.trim().is_empty() {
        return Err(FieldError::new("name", "name is required"));
    }
    if form.niche.trim().is_empty() {
        return Err(FieldError::new("niche", "niche is required"));
    }
    Ok(())
}

fn goals_valid(form: &OnboardingForm) -> Result<(), FieldError> {
    if form.goals.is_empty() {
        return Err(FieldError::new("goals", "select at least one goal"));
    }
    Ok(())
}

fn platforms_valid(form: &OnboardingForm) -> Result<(), FieldError> {
    if form.platforms.is_empty() {
        return Err(FieldError::new("platforms", "select at least one platform"));
    }
    Ok(())
}

fn review_valid(_form: &OnboardingForm) -> Result<(), FieldError> {
    // Phase-2 enrichment is optional
    Ok(())
}

/// The onboarding step table.
#[must_use]
pub fn steps() -> Vec<Step<OnboardingForm>> {
    vec![
        Step {
            key: STEP_IDENTITY,
            label: "Identity & Niche",
            validate: identity_valid,
        },
        Step {
            key: STEP_GOALS,
            label: "Goals",
            validate: goals_valid,
        },
        Step {
            key: STEP_PLATFORMS,
            label: "Platforms",
            validate: platforms_valid,
        },
        Step {
            key: STEP_REVIEW,
            label: "Review",
            validate: review_valid,
        },
    ]
}

/// Rebuild the onboarding wizard from persisted session state.
///
/// # Errors
///
/// Never fails in practice; the step table is non-empty.
pub fn wizard(form: OnboardingForm, index: usize) -> Result<Wizard<OnboardingForm>, WizardError> {
    Wizard::resume(steps(), form, index)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> OnboardingForm {
        OnboardingForm {
            name: "Ada Makes Money".to_owned(),
            creator_type: "educator".to_owned(),
            niche: "personal finance".to_owned(),
            target_audience: "young professionals".to_owned(),
            goals: vec!["grow_audience".to_owned()],
            platforms: vec![Platform::Twitter],
            ..Default::default()
        }
    }

    #[test]
    fn identity_step_valid_iff_name_and_niche_nonempty_after_trim() {
        let mut form = valid_form();
        assert!(identity_valid(&form).is_ok());

        form.name = "   ".to_owned();
        assert_eq!(identity_valid(&form).unwrap_err().field, "name");

        form.name = "Ada".to_owned();
        form.niche = String::new();
        assert_eq!(identity_valid(&form).unwrap_err().field, "niche");
    }

    #[test]
    fn goals_step_requires_a_selection() {
        let mut form = valid_form();
        form.goals.clear();
        assert_eq!(goals_valid(&form).unwrap_err().field, "goals");
    }

    #[test]
    fn platforms_step_requires_a_selection() {
        let mut form = valid_form();
        form.platforms.clear();
        assert_eq!(platforms_valid(&form).unwrap_err().field, "platforms");
    }

    #[test]
    fn full_walk_through_all_steps() {
        let mut wizard = wizard(valid_form(), 0).unwrap();
        assert_eq!(wizard.current().key, STEP_IDENTITY);

        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.current().key, STEP_REVIEW);
        assert!(wizard.is_last());

        let form = wizard.submit().unwrap();
        assert_eq!(form.niche, "personal finance");
    }

    #[test]
    fn submission_includes_phase2_only_when_filled() {
        let submission = valid_form().into_submission();
        assert!(submission.phase2.is_none());

        let mut form = valid_form();
        form.motivation = Some("help people save".to_owned());
        let submission = form.into_submission();
        assert_eq!(
            submission.phase2.unwrap().motivation.as_deref(),
            Some("help people save")
        );
    }
}
