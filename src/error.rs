//! Crate-level error type.
//!
//! Only structural problems surface here. Soft anomalies (empty subject
//! sets, bad capacities, duplicate ids) are absorbed and logged where they
//! are found, and infeasibility is expressed as unmatched students.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors returned to the caller of a matching run.
#[derive(Error, Debug)]
pub enum MatchError {
    /// Input records are structurally malformed.
    #[error("invalid input: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// A tabular source could not be parsed or written.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying reader or writer failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Vec<ValidationError>> for MatchError {
    fn from(errors: Vec<ValidationError>) -> Self {
        MatchError::Validation(errors)
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias for matching runs.
pub type MatchResult<T> = Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_validation_error_lists_every_record() {
        let err = MatchError::from(vec![
            ValidationError::new(ValidationErrorKind::MissingId, Some(2), "student id is blank"),
            ValidationError::new(ValidationErrorKind::EmptyInput, None, "no teachers supplied"),
        ]);
        let text = err.to_string();
        assert!(text.contains("record 2"));
        assert!(text.contains("no teachers supplied"));
    }
}
