//! Per-step validation gate.

use thiserror::Error;

use crate::form::{ConstraintViolation, FormValues, Steps};

/// The first field of a step that failed its constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: ConstraintViolation,
}

/// Outcome of checking one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    Valid,
    Invalid(ValidationError),
}

impl GateResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, GateResult::Valid)
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            GateResult::Valid => Ok(()),
            GateResult::Invalid(err) => Err(err),
        }
    }
}

/// Checks the fields owned by a single step.
///
/// Stops at the first failing field in document order; fields of other steps
/// are never looked at.
pub struct StepGate<'a> {
    steps: &'a Steps,
}

impl<'a> StepGate<'a> {
    pub fn new(steps: &'a Steps) -> Self {
        Self { steps }
    }

    pub fn validate(&self, step: usize, values: &FormValues) -> GateResult {
        let Some(step) = self.steps.get(step) else {
            tracing::debug!(step, "Gate asked about a step that does not exist");
            return GateResult::Valid;
        };

        for field in step.fields() {
            if let Err(reason) = field.check(values.get(field.name())) {
                tracing::debug!(
                    step = step.position(),
                    field = field.name(),
                    reason = %reason,
                    "Step gate rejected field"
                );
                return GateResult::Invalid(ValidationError {
                    field: field.name().to_string(),
                    reason,
                });
            }
        }
        GateResult::Valid
    }
}
