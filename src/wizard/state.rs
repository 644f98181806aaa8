//! Wizard position and submission flag.

use thiserror::Error;

/// A transition the current position does not allow.
///
/// These never reach the user: callers treat them as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OutOfRangeError {
    #[error("already on the last step ({0})")]
    PastLast(usize),

    #[error("already on the first step")]
    BeforeFirst,

    #[error("submission can only begin on the last step (on step {current} of {total})")]
    NotOnLastStep { current: usize, total: usize },

    #[error("navigation is locked while a submission is in flight")]
    Locked,
}

/// Which step is active and whether a submission is in flight.
///
/// `submitting` can only be true on the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardState {
    current_step: usize,
    total_steps: usize,
    submitting: bool,
}

impl WizardState {
    /// Start at step 0. A wizard always has at least one step.
    pub fn new(total_steps: usize) -> Self {
        Self {
            current_step: 0,
            total_steps: total_steps.max(1),
            submitting: false,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_first(&self) -> bool {
        self.current_step == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_step + 1 == self.total_steps
    }

    /// Progress text shown above the step, e.g. "Step 2 of 3"
    pub fn progress_label(&self) -> String {
        format!("Step {} of {}", self.current_step + 1, self.total_steps)
    }

    pub fn advance(&mut self) -> Result<usize, OutOfRangeError> {
        if self.submitting {
            return Err(OutOfRangeError::Locked);
        }
        if self.is_last() {
            return Err(OutOfRangeError::PastLast(self.current_step));
        }
        self.current_step += 1;
        Ok(self.current_step)
    }

    pub fn retreat(&mut self) -> Result<usize, OutOfRangeError> {
        if self.submitting {
            return Err(OutOfRangeError::Locked);
        }
        if self.is_first() {
            return Err(OutOfRangeError::BeforeFirst);
        }
        self.current_step -= 1;
        Ok(self.current_step)
    }

    /// Back to the first step with nothing in flight.
    pub fn reset(&mut self) {
        self.current_step = 0;
        self.submitting = false;
    }

    pub fn begin_submit(&mut self) -> Result<(), OutOfRangeError> {
        if !self.is_last() {
            return Err(OutOfRangeError::NotOnLastStep {
                current: self.current_step + 1,
                total: self.total_steps,
            });
        }
        self.submitting = true;
        Ok(())
    }

    pub fn end_submit(&mut self) {
        self.submitting = false;
    }
}
