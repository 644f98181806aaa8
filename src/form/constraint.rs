//! Field constraints evaluated by the step gate.
//!
//! Each constraint is a predicate over the raw field value. Shape constraints
//! (email, phone, pattern, length) accept an empty value so that optional
//! fields left blank stay valid; emptiness is `Required`'s concern alone.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Address grammar used by browsers for `type="email"` inputs.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ().-]+$").expect("phone pattern is a valid regex"));

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

/// Why a value was rejected. The messages follow native form wording.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("Please fill out this field.")]
    Missing,

    #[error("Please enter an email address.")]
    BadEmail,

    #[error("Please enter a phone number.")]
    BadPhone,

    #[error("Please shorten this text to {max} characters or less (you are currently using {actual} characters).")]
    TooLong { max: usize, actual: usize },

    #[error("{0}")]
    PatternMismatch(String),
}

/// A single validity rule attached to a field.
pub trait FieldConstraint: fmt::Debug + Send + Sync {
    fn check(&self, value: &str) -> Result<(), ConstraintViolation>;
}

/// Value must contain something other than whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl FieldConstraint for Required {
    fn check(&self, value: &str) -> Result<(), ConstraintViolation> {
        if value.trim().is_empty() {
            Err(ConstraintViolation::Missing)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmailShape;

impl FieldConstraint for EmailShape {
    fn check(&self, value: &str) -> Result<(), ConstraintViolation> {
        let value = value.trim();
        if value.is_empty() || EMAIL_PATTERN.is_match(value) {
            Ok(())
        } else {
            Err(ConstraintViolation::BadEmail)
        }
    }
}

/// Digits with the usual separators, an optional leading `+`, and between
/// 7 and 15 digits in total.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneShape;

impl FieldConstraint for PhoneShape {
    fn check(&self, value: &str) -> Result<(), ConstraintViolation> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }
        let digits = value.chars().filter(char::is_ascii_digit).count();
        if PHONE_PATTERN.is_match(value) && (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
        {
            Ok(())
        } else {
            Err(ConstraintViolation::BadPhone)
        }
    }
}

/// Upper bound on the value length, counted in characters.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength(pub usize);

impl FieldConstraint for MaxLength {
    fn check(&self, value: &str) -> Result<(), ConstraintViolation> {
        let actual = value.chars().count();
        if actual > self.0 {
            Err(ConstraintViolation::TooLong {
                max: self.0,
                actual,
            })
        } else {
            Ok(())
        }
    }
}

/// Whole-value regular expression match, like the `pattern` attribute.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    message: String,
}

impl Pattern {
    /// Compile `pattern`, anchored to the full value.
    pub fn new(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(&format!("^(?:{pattern})$"))?,
            message: message.into(),
        })
    }
}

impl FieldConstraint for Pattern {
    fn check(&self, value: &str) -> Result<(), ConstraintViolation> {
        if value.is_empty() || self.regex.is_match(value) {
            Ok(())
        } else {
            Err(ConstraintViolation::PatternMismatch(self.message.clone()))
        }
    }
}
