//! Option-set validation.
//!
//! Catches registered names that the rewriter could never match or that are
//! listed twice. Duplicates are harmless to [`AbbreviationIndex`] but usually
//! point at a copy/paste mistake in the option declarations.
//!
//! [`AbbreviationIndex`]: crate::AbbreviationIndex
//!
//! # Examples
//!
//! ```
//! use optabbrev_core::{ValidationError, validate_options};
//!
//! assert!(validate_options(&["--alpha", "--beta"], "--").is_empty());
//!
//! let errors = validate_options(&["--alpha", "beta"], "--");
//! assert_eq!(errors, vec![ValidationError::MissingMarker("beta".into())]);
//! ```

use std::collections::HashSet;

use thiserror::Error;

/// Option-set validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Option name is empty or whitespace-only.
    #[error("option name cannot be empty")]
    EmptyOptionName,
    /// Option name does not start with the long-option marker.
    #[error("option does not start with the long-option marker: {0}")]
    MissingMarker(String),
    /// Option name is the bare marker with nothing after it.
    #[error("option name consists only of the marker: {0}")]
    MarkerOnly(String),
    /// Two registered options share the same name.
    #[error("duplicate option: {0}")]
    DuplicateOption(String),
}

/// Validates a registered option list against `marker`.
///
/// Stops at the first problem found, so the returned list holds at most one
/// error.
pub fn validate_options<S: AsRef<str>>(names: &[S], marker: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for name in names {
        let name = name.as_ref();
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyOptionName);
            return errors;
        }

        if !name.starts_with(marker) {
            errors.push(ValidationError::MissingMarker(name.to_string()));
            return errors;
        }

        if name == marker {
            errors.push(ValidationError::MarkerOnly(name.to_string()));
            return errors;
        }

        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateOption(name.to_string()));
            return errors;
        }
    }

    errors
}
