//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for claim results that give
//! more meaningful error messages than standard assertions.

use domain_claims::{Claim, IngestionOutcome, RowError};
use serde_json::Value;

/// Asserts that claims are ordered by descending service date
pub fn assert_sorted_desc(claims: &[Claim]) {
    for pair in claims.windows(2) {
        assert!(
            pair[0].service_date() >= pair[1].service_date(),
            "Claims out of order: {} ({}) before {} ({})",
            pair[0].claim_id(),
            pair[0].service_date(),
            pair[1].claim_id(),
            pair[1].service_date()
        );
    }
}

/// Asserts that the listed claim ids are exactly `expected`, in order
pub fn assert_claim_ids(claims: &[Claim], expected: &[&str]) {
    let actual: Vec<&str> = claims.iter().map(|c| c.claim_id().as_str()).collect();
    assert_eq!(actual, expected, "Unexpected claim ids");
}

/// Asserts that an error with this row and message was recorded
pub fn assert_row_error(errors: &[RowError], row: usize, message: &str) {
    assert!(
        errors.iter().any(|e| e.row == row && e.message == message),
        "Expected error at row {} with message {:?}, got {:?}",
        row,
        message,
        errors
    );
}

/// Asserts the success and error counts of an ingestion outcome
pub fn assert_outcome_counts(outcome: &IngestionOutcome, success: usize, errors: usize) {
    assert_eq!(
        (outcome.success_count, outcome.error_count),
        (success, errors),
        "Unexpected counts, errors were {:?}",
        outcome.errors
    );
    assert_eq!(
        outcome.error_count,
        outcome.errors.len(),
        "error_count does not match recorded errors"
    );
}

/// Asserts that a JSON object carries every key
pub fn assert_json_has_keys(value: &Value, keys: &[&str]) {
    for key in keys {
        assert!(value.get(key).is_some(), "Missing key {:?} in {}", key, value);
    }
}
