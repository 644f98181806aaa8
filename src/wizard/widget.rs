//! The inquiry widget: steps, values, wizard position and submission.

use std::sync::Arc;

use super::gate::{GateResult, StepGate, ValidationError};
use super::state::{OutOfRangeError, WizardState};
use super::submission::{SubmissionController, SubmissionPhase, SubmissionResult, Submitter};
use super::view::{Control, FieldView, WidgetView};
use super::WizardError;
use crate::config::MessagesConfig;
use crate::form::{FieldValue, FormValues, Step, Steps};
use crate::notifications::Notifier;

/// A multi-step form built once from a fixed step layout.
///
/// Front ends call the event handlers (`set_value`, `next`, `previous`,
/// `submit`) and redraw from [`Widget::render`] afterwards.
pub struct Widget {
    steps: Steps,
    state: WizardState,
    values: FormValues,
    controller: SubmissionController,
    /// Field the gate last rejected on the active step
    invalid: Option<ValidationError>,
    notifier: Arc<dyn Notifier>,
}

impl Widget {
    pub fn new(steps: Steps, notifier: Arc<dyn Notifier>) -> Self {
        let state = WizardState::new(steps.len());
        Self {
            steps,
            state,
            values: FormValues::new(),
            controller: SubmissionController::default(),
            invalid: None,
            notifier,
        }
    }

    pub fn with_messages(mut self, messages: MessagesConfig) -> Self {
        self.controller = SubmissionController::new(messages);
        self
    }

    pub fn steps(&self) -> &Steps {
        &self.steps
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name)
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.controller.phase()
    }

    pub fn invalid(&self) -> Option<&ValidationError> {
        self.invalid.as_ref()
    }

    pub fn active_step(&self) -> Option<&Step> {
        self.steps.get(self.state.current_step())
    }

    /// Update a field. Returns false for unknown fields and while a
    /// submission is in flight.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        if self.controller.is_in_flight() {
            return false;
        }
        let Some(field) = self.steps.field(name) else {
            tracing::debug!(field = name, "Ignoring value for unknown field");
            return false;
        };
        let value = value.into();

        // Keep the highlight live while the user fixes the flagged field
        if self.invalid.as_ref().is_some_and(|e| e.field == name) {
            self.invalid = field.check(&value).err().map(|reason| ValidationError {
                field: name.to_string(),
                reason,
            });
        }

        self.values.set(name, value);
        true
    }

    /// Run the gate on the active step without changing anything.
    pub fn validate_current(&self) -> GateResult {
        StepGate::new(&self.steps).validate(self.state.current_step(), &self.values)
    }

    fn gate_current(&mut self) -> Result<(), ValidationError> {
        match self.validate_current() {
            GateResult::Valid => {
                self.invalid = None;
                Ok(())
            }
            GateResult::Invalid(err) => {
                self.invalid = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Validate the active step, then move forward one step.
    pub fn next(&mut self) -> Result<usize, WizardError> {
        if self.controller.is_in_flight() {
            return Err(WizardError::InFlight);
        }
        self.gate_current()?;
        match self.state.advance() {
            Ok(step) => {
                tracing::debug!(step, "Advanced");
                Ok(step)
            }
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring advance");
                Err(err.into())
            }
        }
    }

    /// Move back one step. Never validates.
    pub fn previous(&mut self) -> Result<usize, WizardError> {
        if self.controller.is_in_flight() {
            return Err(WizardError::InFlight);
        }
        match self.state.retreat() {
            Ok(step) => {
                self.invalid = None;
                tracing::debug!(step, "Retreated");
                Ok(step)
            }
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring retreat");
                Err(err.into())
            }
        }
    }

    /// Gate the final step and lock the controls. Returns the payload to
    /// send; finish with [`Widget::complete_submission`].
    pub fn begin_submission(&mut self) -> Result<Vec<FieldValue>, WizardError> {
        if self.controller.is_in_flight() {
            return Err(WizardError::InFlight);
        }
        if !self.state.is_last() {
            let err = OutOfRangeError::NotOnLastStep {
                current: self.state.current_step() + 1,
                total: self.state.total_steps(),
            };
            tracing::debug!(error = %err, "Ignoring submit");
            return Err(err.into());
        }
        self.gate_current()?;
        self.controller.begin(&mut self.state)?;
        Ok(self.values.collect(&self.steps))
    }

    /// Apply the endpoint's answer and emit the matching notification.
    pub fn complete_submission(&mut self, result: &SubmissionResult) -> SubmissionPhase {
        if let Some(notification) =
            self.controller
                .complete(&mut self.state, &mut self.values, result)
        {
            self.invalid = None;
            self.notifier.notify(notification);
        }
        self.controller.phase()
    }

    /// Full submission: gate, lock, send, resolve.
    pub async fn submit<S>(&mut self, submitter: &S) -> Result<SubmissionResult, WizardError>
    where
        S: Submitter + ?Sized,
    {
        let payload = self.begin_submission()?;
        let result = submitter.submit(&payload).await;
        self.complete_submission(&result);
        Ok(result)
    }

    /// Pure projection of the current state for drawing.
    pub fn render(&self) -> WidgetView {
        let step = self.active_step();
        let controls_enabled = self.controller.phase().controls_enabled();

        let fields = step
            .map(|step| {
                step.fields()
                    .iter()
                    .map(|field| FieldView {
                        name: field.name().to_string(),
                        label: field.label().to_string(),
                        kind: field.kind(),
                        required: field.is_required(),
                        placeholder: field.placeholder().to_string(),
                        value: self.values.get(field.name()).to_string(),
                        error: self
                            .invalid
                            .as_ref()
                            .filter(|e| e.field == field.name())
                            .map(|e| e.reason.to_string()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let last = self.state.is_last();
        WidgetView {
            step_index: self.state.current_step(),
            total_steps: self.state.total_steps(),
            progress: self.state.progress_label(),
            title: step.map(|s| s.title().to_string()).unwrap_or_default(),
            fields,
            previous: if self.state.is_first() {
                Control::hidden()
            } else {
                Control::shown(controls_enabled)
            },
            next: if last {
                Control::hidden()
            } else {
                Control::shown(controls_enabled)
            },
            submit: if last {
                Control::shown(controls_enabled)
            } else {
                Control::hidden()
            },
            phase: self.controller.phase(),
        }
    }
}
