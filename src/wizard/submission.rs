//! Submission lifecycle of the final step.
//!
//! ```text
//!  Idle ──begin──▶ Submitting ──Success──▶ Succeeded
//!   ▲                 │                       │
//!   │                 └──Failure──▶ Failed    │
//!   │                                 │       │
//!   └──────────── begin again ◀───────┴───────┘
//! ```
//!
//! While `Submitting` the previous and submit controls are disabled, which is
//! the only thing keeping a second submission out.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::state::WizardState;
use super::WizardError;
use crate::api::TransportError;
use crate::config::MessagesConfig;
use crate::form::{FieldValue, FormValues};
use crate::notifications::Notification;

/// Outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Success,
    Failure(String),
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success)
    }
}

impl From<Result<(), TransportError>> for SubmissionResult {
    fn from(result: Result<(), TransportError>) -> Self {
        match result {
            Ok(()) => SubmissionResult::Success,
            Err(err) => SubmissionResult::Failure(err.to_string()),
        }
    }
}

/// Sends a collected payload somewhere and reports how it went.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, payload: &[FieldValue]) -> SubmissionResult;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    /// Controls are only locked while a request is pending
    pub fn controls_enabled(self) -> bool {
        self != SubmissionPhase::Submitting
    }

    pub fn label(self) -> &'static str {
        match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::Submitting => "submitting",
            SubmissionPhase::Succeeded => "succeeded",
            SubmissionPhase::Failed => "failed",
        }
    }
}

/// Drives the submission state machine against the wizard state and values.
#[derive(Debug, Clone)]
pub struct SubmissionController {
    phase: SubmissionPhase,
    attempts: u32,
    messages: MessagesConfig,
}

impl SubmissionController {
    pub fn new(messages: MessagesConfig) -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            attempts: 0,
            messages,
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Attempts started since construction, successful or not
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    pub fn messages(&self) -> &MessagesConfig {
        &self.messages
    }

    /// Enter `Submitting`. The caller has already passed the step gate.
    pub fn begin(&mut self, state: &mut WizardState) -> Result<(), WizardError> {
        if self.is_in_flight() {
            return Err(WizardError::InFlight);
        }
        state.begin_submit()?;
        self.phase = SubmissionPhase::Submitting;
        self.attempts += 1;
        tracing::info!(attempt = self.attempts, "Submission started");
        Ok(())
    }

    /// Resolve the pending submission.
    ///
    /// On success the values are cleared and the wizard returns to step 0; on
    /// failure nothing but the in-flight flag changes. Returns the
    /// notification to surface, or `None` if nothing was in flight.
    pub fn complete(
        &mut self,
        state: &mut WizardState,
        values: &mut FormValues,
        result: &SubmissionResult,
    ) -> Option<Notification> {
        if !self.is_in_flight() {
            tracing::debug!(
                phase = self.phase.label(),
                "Ignoring submission result with nothing in flight"
            );
            return None;
        }

        match result {
            SubmissionResult::Success => {
                values.clear();
                state.reset();
                self.phase = SubmissionPhase::Succeeded;
                tracing::info!(attempt = self.attempts, "Submission succeeded");
                Some(Notification::success(&self.messages.success))
            }
            SubmissionResult::Failure(reason) => {
                state.end_submit();
                self.phase = SubmissionPhase::Failed;
                tracing::error!(attempt = self.attempts, reason = %reason, "Submission failed");
                Some(Notification::failure(&self.messages.failure))
            }
        }
    }
}

impl Default for SubmissionController {
    fn default() -> Self {
        Self::new(MessagesConfig::default())
    }
}

/// Scripted submitter for tests and dry runs.
///
/// Replays queued results in order and answers `Success` once the script
/// runs out. Every payload it receives is recorded.
#[derive(Debug, Clone, Default)]
pub struct MockSubmitter {
    script: Arc<Mutex<VecDeque<SubmissionResult>>>,
    received: Arc<Mutex<Vec<Vec<FieldValue>>>>,
}

impl MockSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: impl IntoIterator<Item = SubmissionResult>) -> Self {
        let mock = Self::new();
        if let Ok(mut script) = mock.script.lock() {
            script.extend(results);
        }
        mock
    }

    /// Payloads received so far, oldest first
    pub fn payloads(&self) -> Vec<Vec<FieldValue>> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.received.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Submitter for MockSubmitter {
    async fn submit(&self, payload: &[FieldValue]) -> SubmissionResult {
        if let Ok(mut received) = self.received.lock() {
            received.push(payload.to_vec());
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or(SubmissionResult::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationKind;
    use crate::wizard::state::OutOfRangeError;

    fn last_step_state() -> WizardState {
        let mut state = WizardState::new(2);
        state.advance().unwrap();
        state
    }

    #[test]
    fn test_begin_enters_submitting() {
        let mut controller = SubmissionController::default();
        let mut state = last_step_state();

        controller.begin(&mut state).unwrap();
        assert_eq!(controller.phase(), SubmissionPhase::Submitting);
        assert!(!controller.phase().controls_enabled());
        assert!(state.is_submitting());
        assert_eq!(controller.attempts(), 1);
    }

    #[test]
    fn test_begin_twice_is_rejected() {
        let mut controller = SubmissionController::default();
        let mut state = last_step_state();

        controller.begin(&mut state).unwrap();
        assert_eq!(controller.begin(&mut state), Err(WizardError::InFlight));
        assert_eq!(controller.attempts(), 1);
    }

    #[test]
    fn test_begin_off_last_step_is_out_of_range() {
        let mut controller = SubmissionController::default();
        let mut state = WizardState::new(2);

        let err = controller.begin(&mut state).unwrap_err();
        assert!(matches!(
            err,
            WizardError::OutOfRange(OutOfRangeError::NotOnLastStep { .. })
        ));
        assert_eq!(controller.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_success_clears_and_resets() {
        let mut controller = SubmissionController::default();
        let mut state = last_step_state();
        let mut values = FormValues::new();
        values.set("name", "Ada");

        controller.begin(&mut state).unwrap();
        let notice = controller
            .complete(&mut state, &mut values, &SubmissionResult::Success)
            .unwrap();

        assert_eq!(notice.kind, NotificationKind::Success);
        assert_eq!(notice.message, MessagesConfig::default().success);
        assert_eq!(controller.phase(), SubmissionPhase::Succeeded);
        assert_eq!(state, WizardState::new(2));
        assert!(values.is_blank());
    }

    #[test]
    fn test_failure_preserves_everything() {
        let mut controller = SubmissionController::default();
        let mut state = last_step_state();
        let mut values = FormValues::new();
        values.set("name", "Ada");
        let before = values.clone();

        controller.begin(&mut state).unwrap();
        let notice = controller
            .complete(
                &mut state,
                &mut values,
                &SubmissionResult::Failure("HTTP 500".to_string()),
            )
            .unwrap();

        assert_eq!(notice.kind, NotificationKind::Failure);
        assert_eq!(controller.phase(), SubmissionPhase::Failed);
        assert!(controller.phase().controls_enabled());
        assert_eq!(state.current_step(), 1);
        assert!(!state.is_submitting());
        assert_eq!(values, before);
    }

    #[test]
    fn test_retry_after_failure() {
        let mut controller = SubmissionController::default();
        let mut state = last_step_state();
        let mut values = FormValues::new();

        controller.begin(&mut state).unwrap();
        controller.complete(
            &mut state,
            &mut values,
            &SubmissionResult::Failure("down".to_string()),
        );

        controller.begin(&mut state).unwrap();
        assert_eq!(controller.attempts(), 2);
        assert_eq!(controller.phase(), SubmissionPhase::Submitting);
    }

    #[test]
    fn test_complete_without_begin_is_ignored() {
        let mut controller = SubmissionController::default();
        let mut state = last_step_state();
        let mut values = FormValues::new();
        values.set("name", "Ada");

        let notice = controller.complete(&mut state, &mut values, &SubmissionResult::Success);
        assert!(notice.is_none());
        assert_eq!(values.get("name"), "Ada");
        assert_eq!(state.current_step(), 1);
    }

    #[test]
    fn test_result_from_transport() {
        assert_eq!(SubmissionResult::from(Ok(())), SubmissionResult::Success);

        let failure = SubmissionResult::from(Err(TransportError::status(
            "https://f.example",
            500,
            "Internal Server Error",
        )));
        assert_eq!(
            failure,
            SubmissionResult::Failure(
                "https://f.example: HTTP 500 - Internal Server Error".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_mock_submitter_replays_script() {
        let mock = MockSubmitter::with_results([SubmissionResult::Failure("500".to_string())]);
        let payload = vec![FieldValue::new("name", "Ada")];

        assert!(!mock.submit(&payload).await.is_success());
        assert!(mock.submit(&payload).await.is_success());
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.payloads()[0], payload);
    }
}
