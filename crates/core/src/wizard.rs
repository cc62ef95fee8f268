//! Linear multi-step wizard state machine.
//!
//! Drives a finite sequence of form steps with per-step validation and a
//! terminal submission action. Validation is enforced by the state machine
//! itself: [`Wizard::next`] and [`Wizard::submit`] refuse to transition
//! while the current step's predicate fails, returning a typed
//! [`FieldError`] rather than relying on the caller to gate the
//! transition.
//!
//! Step tables carry plain function pointers, so a wizard is rebuilt from
//! its static step table on each request and only `(form, index)` is
//! persisted between requests.

use serde::{Deserialize, Serialize};

/// A validation failure attached to a specific form field.
///
/// `field` uses the wire-level key (camelCase) so clients can attach the
/// message to the offending input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors from wizard transitions that are not per-field validation.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// A wizard must have at least one step.
    #[error("wizard has no steps")]
    NoSteps,

    /// Submit was called before reaching the final step.
    #[error("submit is only available on the final step (currently on step {current})")]
    NotAtFinalStep { current: usize },

    /// The current step's validation predicate failed.
    #[error(transparent)]
    Invalid(#[from] FieldError),
}

/// One step in a wizard: a stable key, a human label, and a validation
/// predicate over the accumulated form data.
pub struct Step<F> {
    pub key: &'static str,
    pub label: &'static str,
    pub validate: fn(&F) -> Result<(), FieldError>,
}

/// A wizard instance: an ordered step table, a current index bounded to
/// `[0, steps.len() - 1]`, and the accumulating form data.
pub struct Wizard<F> {
    steps: Vec<Step<F>>,
    index: usize,
    form: F,
}

impl<F> Wizard<F> {
    /// Create a wizard positioned at the first step.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::NoSteps`] for an empty step table.
    pub fn new(steps: Vec<Step<F>>, form: F) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::NoSteps);
        }
        Ok(Self {
            steps,
            index: 0,
            form,
        })
    }

    /// Rebuild a wizard from persisted `(form, index)` state.
    ///
    /// The index is clamped into range, so stale session state can never
    /// position the wizard outside the step table.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::NoSteps`] for an empty step table.
    pub fn resume(steps: Vec<Step<F>>, form: F, index: usize) -> Result<Self, WizardError> {
        let mut wizard = Self::new(steps, form)?;
        wizard.index = index.min(wizard.steps.len() - 1);
        Ok(wizard)
    }

    /// Current step index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: an empty wizard cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether the wizard is on its final step.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index == self.steps.len() - 1
    }

    /// The current step descriptor.
    #[must_use]
    pub fn current(&self) -> &Step<F> {
        // index is maintained within [0, len-1] by construction
        #[allow(clippy::indexing_slicing)]
        &self.steps[self.index]
    }

    /// Shared access to the accumulated form data.
    #[must_use]
    pub const fn form(&self) -> &F {
        &self.form
    }

    /// Mutable access to the accumulated form data.
    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    /// Consume the wizard and return the form without submitting.
    ///
    /// Used to persist `(form, index)` back into the session.
    #[must_use]
    pub fn into_form(self) -> F {
        self.form
    }

    /// Validate the current step against the accumulated form data.
    ///
    /// # Errors
    ///
    /// Returns the step's [`FieldError`] when the predicate fails.
    pub fn validate_current(&self) -> Result<(), FieldError> {
        (self.current().validate)(&self.form)
    }

    /// Advance to the next step.
    ///
    /// Refuses to advance while the current step's predicate fails. On the
    /// final step a valid `next()` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the current step's [`FieldError`] when validation fails.
    pub fn next(&mut self) -> Result<(), FieldError> {
        self.validate_current()?;
        if self.index < self.steps.len() - 1 {
            self.index += 1;
        }
        Ok(())
    }

    /// Go back one step. No-op at step 0.
    pub fn back(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Submit the wizard, consuming it and yielding the form data.
    ///
    /// Only reachable from the final step, and only when the final step
    /// validates.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::NotAtFinalStep`] before the final step, or
    /// [`WizardError::Invalid`] when the final step's predicate fails.
    pub fn submit(self) -> Result<F, WizardError> {
        if !self.is_last() {
            return Err(WizardError::NotAtFinalStep {
                current: self.index,
            });
        }
        self.validate_current()?;
        Ok(self.form)
    }
}

/// Symmetric add/remove of `value` in an array-valued form field.
///
/// If `value` is present it is removed (order of the remaining entries
/// preserved); otherwise it is appended. Toggling the same value twice
/// restores the original array.
pub fn toggle<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if let Some(pos) = values.iter().position(|v| *v == value) {
        values.remove(pos);
    } else {
        values.push(value);
    }
}
