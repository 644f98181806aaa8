//! Render model derived from the widget state.

use crate::form::FieldKind;

use super::submission::SubmissionPhase;

/// Visibility and enabled state of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub visible: bool,
    pub enabled: bool,
}

impl Control {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            enabled: false,
        }
    }

    pub fn shown(enabled: bool) -> Self {
        Self {
            visible: true,
            enabled,
        }
    }

    /// Visible and clickable
    pub fn is_active(&self) -> bool {
        self.visible && self.enabled
    }
}

/// One field of the active step as it should be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub placeholder: String,
    pub value: String,
    /// Native-style message when this is the field the gate rejected
    pub error: Option<String>,
}

/// Everything a front end needs to draw the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub step_index: usize,
    pub total_steps: usize,
    /// "Step X of N"
    pub progress: String,
    pub title: String,
    pub fields: Vec<FieldView>,
    pub previous: Control,
    pub next: Control,
    pub submit: Control,
    pub phase: SubmissionPhase,
}

impl WidgetView {
    /// Index within `fields` of the field flagged invalid, if any
    pub fn invalid_field_index(&self) -> Option<usize> {
        self.fields.iter().position(|f| f.error.is_some())
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }
}
