//! Onboarding completeness: the gate and the local snapshot cache.
//!
//! The Super Engine profile is the only authority on whether a user has
//! completed onboarding. The [`gate`] asks it, tolerating the window in
//! which a freshly created account exists in the identity system but its
//! backend profile has not been provisioned yet. The [`snapshot`] cache
//! keeps a local copy purely as a hint; nothing ever branches on it for
//! access control.

pub mod gate;
pub mod snapshot;

pub use gate::{GateConfig, GateOutcome, check_onboarding};
pub use snapshot::{OnboardingSnapshot, SnapshotCache};
