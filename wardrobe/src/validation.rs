//! Validation Support
//!
//! Create and update payloads implement [`Validatable`]. Structural rules
//! (lengths, ranges, formats) live here; rules that need the database
//! (`exists`, `unique`) are checked by the resource right before it writes.
//!
//! ```rust,ignore
//! use wardrobe::validation::{Validatable, ValidationErrors, validators};
//!
//! impl Validatable for TagCreate {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         errors.check(validators::validate_required("name", &self.name));
//!         errors.check(validators::validate_length("name", &self.name, None, Some(255)));
//!         errors.result()
//!     }
//! }
//! ```

use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record the error from a validator result, if any
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.add(error);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` when at least one error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Trait for payloads that can be validated before they reach the database
pub trait Validatable {
    /// Validate the instance, collecting every failing field.
    ///
    /// # Errors
    ///
    /// Returns all field-level failures found.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Helper validators for common patterns
pub mod validators {
    use super::ValidationError;
    use std::fmt;

    /// Validate string length (in characters) is within range
    ///
    /// # Errors
    ///
    /// Fails when the value is shorter than `min` or longer than `max`.
    pub fn validate_length(
        field: &str,
        value: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Result<(), ValidationError> {
        let len = value.chars().count();

        if let Some(min_len) = min
            && len < min_len
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at least {min_len} characters"),
            ));
        }

        if let Some(max_len) = max
            && len > max_len
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at most {max_len} characters"),
            ));
        }

        Ok(())
    }

    /// Same as [`validate_length`] for optional fields; `None` always passes
    ///
    /// # Errors
    ///
    /// Fails when a present value is out of range.
    pub fn validate_optional_length(
        field: &str,
        value: Option<&str>,
        max: usize,
    ) -> Result<(), ValidationError> {
        value.map_or(Ok(()), |v| validate_length(field, v, None, Some(max)))
    }

    /// Validate number is within range
    ///
    /// # Errors
    ///
    /// Fails when the value is below `min` or above `max`.
    pub fn validate_range<T: PartialOrd + fmt::Display>(
        field: &str,
        value: T,
        min: Option<T>,
        max: Option<T>,
    ) -> Result<(), ValidationError> {
        if let Some(min_val) = min
            && value < min_val
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at least {min_val}"),
            ));
        }

        if let Some(max_val) = max
            && value > max_val
        {
            return Err(ValidationError::new(
                field,
                format!("Must be at most {max_val}"),
            ));
        }

        Ok(())
    }

    /// Basic email validation: one `@`, non-empty local part, dotted domain
    ///
    /// # Errors
    ///
    /// Fails on malformed addresses or addresses over 255 characters.
    pub fn validate_email(field: &str, value: &str) -> Result<(), ValidationError> {
        let valid = value.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        });
        if !valid {
            return Err(ValidationError::new(field, "Must be a valid email address"));
        }

        validate_length(field, value, None, Some(255))
    }

    /// Validate value is not blank
    ///
    /// # Errors
    ///
    /// Fails on empty or whitespace-only values.
    pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "This field is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collection() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.check(Ok(()));
        assert!(errors.is_empty());

        errors.check(validators::validate_required("name", ""));
        errors.add(ValidationError::new("slug", "taken"));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors()[0].field, "name");

        assert!(errors.result().is_err());
    }

    #[test]
    fn test_validate_length_counts_characters() {
        use validators::validate_length;

        assert!(validate_length("name", "ab", Some(3), None).is_err());
        assert!(validate_length("name", "abcdef", None, Some(5)).is_err());
        assert!(validate_length("name", "abc", Some(3), Some(5)).is_ok());
        // Seven characters, more than seven bytes
        assert!(validate_length("color", "#ÄÄÄÄÄÄ", None, Some(7)).is_ok());
    }

    #[test]
    fn test_validate_optional_length() {
        use validators::validate_optional_length;

        assert!(validate_optional_length("size", None, 20).is_ok());
        assert!(validate_optional_length("size", Some("XL"), 20).is_ok());
        assert!(validate_optional_length("size", Some(&"x".repeat(21)), 20).is_err());
    }

    #[test]
    fn test_validate_range() {
        use validators::validate_range;

        assert!(validate_range("sort_order", -1, Some(0), None).is_err());
        assert!(validate_range("sort_order", 5, Some(0), Some(3)).is_err());
        assert!(validate_range("sort_order", 0, Some(0), None).is_ok());
    }

    #[test]
    fn test_validate_email() {
        use validators::validate_email;

        assert!(validate_email("email", "invalid").is_err());
        assert!(validate_email("email", "a@b").is_err());
        assert!(validate_email("email", "@example.com").is_err());
        assert!(validate_email("email", "a b@example.com").is_err());
        assert!(validate_email("email", "demo@wardrobe.com").is_ok());
    }

    #[test]
    fn test_validate_required() {
        use validators::validate_required;

        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "   ").is_err());
        assert!(validate_required("name", "Jeans").is_ok());
    }
}
