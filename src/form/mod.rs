//! Field and step definitions for the inquiry wizard.
//!
//! Steps are fixed when the widget is built: each owns an ordered list of
//! fields, and every field name is unique across the whole form so the
//! collected values can be posted as a flat payload.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod constraint;
mod values;

pub use constraint::{
    ConstraintViolation, EmailShape, FieldConstraint, MaxLength, Pattern, PhoneShape, Required,
};
pub use values::{FieldValue, FormValues};

/// Input type of a field, mirroring the native input types the form uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    TextArea,
}

impl FieldKind {
    /// Whether Enter inserts a newline instead of moving on
    pub fn is_multiline(self) -> bool {
        matches!(self, FieldKind::TextArea)
    }
}

/// Declarative description of a single form field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    label: String,
    kind: FieldKind,
    required: bool,
    max_length: Option<usize>,
    placeholder: String,
    extra: Vec<Arc<dyn FieldConstraint>>,
}

impl FieldSpec {
    /// New optional field. Use [`FieldSpec::required`] to make it mandatory.
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            max_length: None,
            placeholder: String::new(),
            extra: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Attach an additional constraint, checked after the built-in ones.
    pub fn with_constraint(mut self, constraint: impl FieldConstraint + 'static) -> Self {
        self.extra.push(Arc::new(constraint));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Check `value` against every constraint in declaration order and
    /// report the first violation.
    pub fn check(&self, value: &str) -> Result<(), ConstraintViolation> {
        if self.required {
            Required.check(value)?;
        }
        match self.kind {
            FieldKind::Email => EmailShape.check(value)?,
            FieldKind::Tel => PhoneShape.check(value)?,
            FieldKind::Text | FieldKind::TextArea => {}
        }
        if let Some(max) = self.max_length {
            MaxLength(max).check(value)?;
        }
        for constraint in &self.extra {
            constraint.check(value)?;
        }
        Ok(())
    }
}

/// One screen of the wizard.
#[derive(Debug, Clone)]
pub struct Step {
    position: usize,
    title: String,
    fields: Vec<FieldSpec>,
}

impl Step {
    pub fn new(title: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            position: 0,
            title: title.into(),
            fields,
        }
    }

    /// Zero-based position within the wizard
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Invalid step layout supplied at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepConfigError {
    #[error("a form needs at least one step")]
    NoSteps,

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),
}

/// The ordered, immutable step layout of a form.
#[derive(Debug, Clone)]
pub struct Steps {
    steps: Vec<Step>,
}

impl Steps {
    pub fn new(steps: Vec<Step>) -> Result<Self, StepConfigError> {
        if steps.is_empty() {
            return Err(StepConfigError::NoSteps);
        }
        let mut seen = HashSet::new();
        for field in steps.iter().flat_map(|s| s.fields.iter()) {
            if !seen.insert(field.name.as_str()) {
                return Err(StepConfigError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self::assemble(steps))
    }

    fn assemble(mut steps: Vec<Step>) -> Self {
        for (position, step) in steps.iter_mut().enumerate() {
            step.position = position;
        }
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Step> {
        self.steps.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// Every field of every step, in document order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.name == name)
    }
}

/// The stock three-step contact form: who you are, how to reach you, what
/// you want to say.
pub fn contact_steps() -> Steps {
    Steps::assemble(vec![
        Step::new(
            "About you",
            vec![
                FieldSpec::new("name", "Name", FieldKind::Text)
                    .required()
                    .with_max_length(100),
                FieldSpec::new("email", "Email", FieldKind::Email)
                    .required()
                    .with_placeholder("you@example.com"),
            ],
        ),
        Step::new(
            "Contact",
            vec![FieldSpec::new("phone", "Phone Number", FieldKind::Tel)
                .with_placeholder("+1 555 123 4567")],
        ),
        Step::new(
            "Your message",
            vec![FieldSpec::new("message", "Message", FieldKind::TextArea)
                .required()
                .with_max_length(5000)],
        ),
    ])
}
