//! Validation results
//!
//! Claim validation collects every violated rule instead of stopping at the
//! first one, so callers can report all problems with a row at once.

use serde::Serialize;

/// Result of validating raw claim fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the input is valid
    pub is_valid: bool,
    /// Violated rules, in evaluation order
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_error_marks_invalid() {
        let mut result = ValidationResult::ok();
        assert!(result.is_valid);

        result.add_error("Missing claimId");
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Missing claimId"]);
    }

    #[test]
    fn test_errors_keep_order() {
        let mut result = ValidationResult::default();
        result.add_error("Missing claimId");
        result.add_error("Missing provider");

        assert_eq!(result.errors, vec!["Missing claimId", "Missing provider"]);
    }
}
