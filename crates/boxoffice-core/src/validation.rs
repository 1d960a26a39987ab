//! Validation utilities.

use crate::{BoxOfficeError, FieldError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `BoxOfficeError` on failure.
    fn validate_request(&self) -> Result<(), BoxOfficeError> {
        self.validate().map_err(validation_errors_to_box_office_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect()
}

/// Converts `validator::ValidationErrors` to `BoxOfficeError`.
#[must_use]
pub fn validation_errors_to_box_office_error(errors: ValidationErrors) -> BoxOfficeError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    BoxOfficeError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use chrono::{NaiveDate, NaiveTime};
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates an event date in `YYYY-MM-DD` form.
    pub fn event_date(value: &str) -> Result<(), ValidationError> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|_| ())
            .map_err(|_| ValidationError::new("invalid_date"))
    }

    /// Validates an event start time in `HH:MM` form.
    pub fn event_time(value: &str) -> Result<(), ValidationError> {
        NaiveTime::parse_from_str(value, "%H:%M")
            .map(|_| ())
            .map_err(|_| ValidationError::new("invalid_time"))
    }

    /// Validates a phone number: digits with optional leading `+`, spaces,
    /// dashes and parentheses.
    pub fn phone_number(value: &str) -> Result<(), ValidationError> {
        let body = value.strip_prefix('+').unwrap_or(value);
        let well_formed = !body.is_empty()
            && body
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'))
            && body.chars().any(|c| c.is_ascii_digit());
        if !well_formed {
            return Err(ValidationError::new("invalid_phone_number"));
        }
        Ok(())
    }
}
