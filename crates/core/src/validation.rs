//! Input validation utilities.
//!
//! Form fields reach the roster and ledger as raw text. These helpers turn each field into its
//! validated type and, on failure, produce a [`CoreError::Validation`] naming the field.

use crate::{CoreError, CoreResult};
use lepcare_types::{Age, NonEmptyText, Percent, ValueError};

fn field_error(field: &str, err: ValueError) -> CoreError {
    match err {
        ValueError::Empty => CoreError::Validation(format!("{field} is required")),
        other => CoreError::Validation(format!("{field}: {other}")),
    }
}

/// Validates a required free-text field.
pub fn required_text(field: &str, value: &str) -> CoreResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|e| field_error(field, e))
}

/// Validates an age field, which must parse to a positive integer.
pub fn parse_age(value: &str) -> CoreResult<Age> {
    Age::parse(value).map_err(|e| field_error("age", e))
}

/// Validates a percentage field.
pub fn percent(field: &str, value: u32) -> CoreResult<Percent> {
    Percent::new(value).map_err(|e| field_error(field, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_names_missing_field() {
        let err = required_text("phone", "  ").unwrap_err();
        assert_eq!(err.to_string(), "validation failed: phone is required");
    }

    #[test]
    fn parse_age_reports_non_numeric_input() {
        let err = parse_age("abc").unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref m) if m.contains("'abc'")));
        assert_eq!(parse_age("28").unwrap().years(), 28);
    }

    #[test]
    fn percent_rejects_over_one_hundred() {
        assert!(matches!(
            percent("adherence", 120),
            Err(CoreError::Validation(_))
        ));
    }
}
