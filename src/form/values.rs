//! Collected field values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{FieldKind, Steps};

/// One name/value pair of the outgoing payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: String,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Current value of every field, keyed by field name.
///
/// Fields that were never edited read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: HashMap<String, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Empty every field.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// True when no field holds anything but whitespace.
    pub fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty())
    }

    /// Build the submission payload: every field of every step, in step and
    /// field order, empty ones included. Email addresses are sent trimmed,
    /// the way they were validated.
    pub fn collect(&self, steps: &Steps) -> Vec<FieldValue> {
        steps
            .fields()
            .map(|field| {
                let value = self.get(field.name());
                let value = match field.kind() {
                    FieldKind::Email => value.trim(),
                    _ => value,
                };
                FieldValue::new(field.name(), value)
            })
            .collect()
    }
}
