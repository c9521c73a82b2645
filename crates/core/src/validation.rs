//! Configuration and input validation
//!
//! A fluent validator that collects every issue instead of stopping at the
//! first one, so `twa-android check` can report the whole manifest at once.
//!
//! # Example
//!
//! ```rust
//! use twa_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("app.name", "Ryss")
//!     .pattern("app.theme_color", "#70d156", r"^#[0-9a-fA-F]{6}$", "a #RRGGBB color")
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use crate::error::{Error, ErrorCode, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single failed check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted manifest key, e.g. `app.host_name`
    pub field: String,
    /// Error message
    pub message: String,
    /// Kind of check that failed (`REQUIRED`, `PATTERN`, ...)
    pub code: String,
    /// What the check expected, when it can be described
    pub expected: Option<String>,
    /// The offending value
    pub actual: Option<String>,
}

impl ValidationError {
    fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            code: code.to_string(),
            expected: None,
            actual: None,
        }
    }

    fn expected(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors and warnings collected by a [`Validator`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Fold every error into one `ConfigValidationError`
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        Err(Error::new(
            ErrorCode::ConfigValidationError,
            format!("Validation failed: {}", messages.join("; ")),
        ))
    }
}

/// Fluent validator builder
#[derive(Default)]
pub struct Validator {
    result: ValidationResult,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(mut self, error: ValidationError) -> Self {
        self.result.errors.push(error);
        self
    }

    /// Validate that a field is not blank
    pub fn required(self, field: &str, value: &str) -> Self {
        if !value.trim().is_empty() {
            return self;
        }
        self.fail(
            ValidationError::new(field, "REQUIRED", "Field is required")
                .expected("non-empty value", "empty"),
        )
    }

    /// Validate against a regex pattern
    pub fn pattern(self, field: &str, value: &str, pattern: &str, description: &str) -> Self {
        match Regex::new(pattern) {
            Ok(re) if re.is_match(value) => self,
            Ok(_) => self.fail(
                ValidationError::new(field, "PATTERN", format!("Must be {}", description))
                    .expected(description, value),
            ),
            Err(_) => self.fail(ValidationError::new(field, "INTERNAL", "Invalid validation pattern")),
        }
    }

    /// Validate a numeric range, bounds inclusive
    pub fn range<T: PartialOrd + std::fmt::Display>(self, field: &str, value: T, min: T, max: T) -> Self {
        if value >= min && value <= max {
            return self;
        }
        self.fail(
            ValidationError::new(field, "RANGE", format!("Must be between {} and {}", min, max))
                .expected(format!("{} - {}", min, max), value.to_string()),
        )
    }

    /// Add a custom check; `f` returns the error message on failure
    pub fn custom<F>(self, field: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        match f() {
            Some(message) => self.fail(ValidationError::new(field, "CUSTOM", message)),
            None => self,
        }
    }

    /// Add a warning (non-blocking)
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result
                .warnings
                .push(ValidationError::new(field, "WARNING", message));
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_validation() {
        let result = Validator::new().required("name", "  ").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let result = Validator::new().range("fade", 0, 0, 10).range("fade", 10, 0, 10).validate();
        assert!(result.is_valid());
    }

    #[test]
    fn test_pattern_validation() {
        let result = Validator::new()
            .pattern("color", "green", r"^#[0-9a-fA-F]{6}$", "a #RRGGBB color")
            .validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "PATTERN");
        assert_eq!(result.errors()[0].actual.as_deref(), Some("green"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let result = Validator::new().pattern("x", "y", "(", "anything").validate();
        assert_eq!(result.errors()[0].code, "INTERNAL");
    }

    #[test]
    fn test_range_validation() {
        let result = Validator::new().range("count", 150, 1, 100).validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "RANGE");
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let result = Validator::new().warn_if("fade", true, "slow").validate();
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn test_chained_validation_collects_all() {
        let result = Validator::new()
            .required("a", "")
            .custom("b", || Some("bad".to_string()))
            .range("c", 3, 1, 10)
            .validate();
        assert_eq!(result.errors().len(), 2);

        let err = result.to_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("a: Field is required"));
        assert!(err.message.contains("b: bad"));
    }

    #[test]
    fn test_merge() {
        let mut first = Validator::new().required("a", "").validate();
        first.merge(Validator::new().warn_if("b", true, "hm").validate());
        assert_eq!(first.errors().len(), 1);
        assert_eq!(first.warnings().len(), 1);
    }
}
