//! Multi-step form controller.
//!
//! - [`WizardState`]: active step and in-flight flag
//! - [`StepGate`]: validates the active step before leaving it
//! - [`SubmissionController`]: the final step's submit lifecycle
//! - [`Widget`]: ties the three together behind event handlers and `render()`

use thiserror::Error;

mod gate;
mod state;
mod submission;
mod view;
mod widget;

pub use gate::{GateResult, StepGate, ValidationError};
pub use state::{OutOfRangeError, WizardState};
pub use submission::{
    MockSubmitter, SubmissionController, SubmissionPhase, SubmissionResult, Submitter,
};
pub use view::{Control, FieldView, WidgetView};
pub use widget::Widget;

/// Why a navigation or submit event was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// The active step has a field that fails its constraints
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Contract guard; front ends treat this as a no-op
    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),

    #[error("a submission is already in flight")]
    InFlight,
}

impl WizardError {
    /// Whether the user should see this; out-of-range moves are silent
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, WizardError::OutOfRange(_))
    }
}
