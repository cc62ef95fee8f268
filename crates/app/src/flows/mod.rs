//! Concrete wizard flows built on the core wizard state machine.
//!
//! Each flow contributes a static step table and a form type. Between
//! requests only `(form, index)` is persisted in the session as a
//! [`WizardSession`]; the wizard itself is rebuilt per request from the
//! step table.

pub mod campaign;
pub mod onboarding;

use serde::{Deserialize, Serialize};

/// Wizard state as persisted in the session between requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardSession<F> {
    pub form: F,
    pub index: usize,
}

impl<F: Default> Default for WizardSession<F> {
    fn default() -> Self {
        Self {
            form: F::default(),
            index: 0,
        }
    }
}
