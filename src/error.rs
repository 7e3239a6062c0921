//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::ledger::LedgerError;
use crate::validation::ValidationError;

/// Errors returned by the public entry points.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The request broke the input contract. Every detected breach is listed.
    #[error("invalid roster request: {}", summarize(.0))]
    InvalidRequest(Vec<ValidationError>),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<Vec<ValidationError>> for RosterError {
    fn from(errors: Vec<ValidationError>) -> Self {
        RosterError::InvalidRequest(errors)
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (+{} more)", rest.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_invalid_request_names_first_field() {
        let err = RosterError::from(vec![
            ValidationError::new(
                ValidationErrorKind::InvalidMonth,
                "month",
                "month 13 is outside 1..=12",
            ),
            ValidationError::new(ValidationErrorKind::InvalidFte, "fte[\"dr. a\"]", "must be > 0"),
        ]);
        let text = err.to_string();
        assert!(text.contains("month"));
        assert!(text.contains("+1 more"));
    }
}
