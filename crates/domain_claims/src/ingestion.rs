//! Bulk claim ingestion
//!
//! Turns a claims file into stored claims, row by row. Each data row is
//! folded into an [`IngestionOutcome`]:
//!
//! ```text
//! CsvRow -> coerce -> validate -> duplicate check -> save
//!             |          |              |             |
//!             |   ValidationFailure  DuplicateFailure StoreFailure
//!             v
//!          Success
//! ```
//!
//! A failing row is recorded and the batch moves on; partial success is the
//! normal case.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use core_kernel::{ClaimId, PortError};

use crate::claim::{Claim, ClaimRecord};
use crate::error::ClaimError;
use crate::ports::{ClaimRowParser, ClaimsPort, CsvRow, RowError};

/// Row number of the first data row (the header is row 1)
const FIRST_DATA_ROW: usize = 2;

/// Summary of one ingestion batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionOutcome {
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<RowError>,
}

impl IngestionOutcome {
    /// Returns true if no errors were recorded
    pub fn is_clean(&self) -> bool {
        self.error_count == 0
    }

    /// Records structural errors reported by the parser
    fn record_parse_errors(&mut self, errors: &[RowError]) {
        self.errors.extend_from_slice(errors);
        self.error_count += errors.len();
    }

    /// Records a failure that concerns the whole input
    fn record_global_error(&mut self, message: impl Into<String>) {
        self.record_row_error(0, message);
    }

    fn record_row_error(&mut self, row: usize, message: impl Into<String>) {
        self.errors.push(RowError::new(row, message));
        self.error_count += 1;
    }

    /// Folds one row's outcome into the summary
    fn apply(&mut self, row: usize, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Success => self.success_count += 1,
            RowOutcome::Skipped => {}
            RowOutcome::ValidationFailure(messages) => {
                self.record_row_error(row, messages.join(", "));
            }
            RowOutcome::DuplicateFailure(claim_id) => {
                self.record_row_error(row, format!("Duplicate claimId: {}", claim_id));
            }
            RowOutcome::StoreFailure(error) => {
                self.record_row_error(row, error.to_string());
            }
        }
    }
}

/// Result of processing a single data row
#[derive(Debug)]
pub enum RowOutcome {
    /// The claim was stored
    Success,
    /// The row already has a structural error from the parser
    Skipped,
    /// One or more claim rules were violated
    ValidationFailure(Vec<String>),
    /// A claim with this id already exists
    DuplicateFailure(ClaimId),
    /// The backing store failed for this row
    StoreFailure(PortError),
}

/// Converts a raw row into claim fields
///
/// Every field is trimmed; an amount that is not a whole number becomes `0`
/// so it fails the positivity rule instead of aborting the row.
pub fn coerce_row(row: &CsvRow) -> ClaimRecord {
    ClaimRecord {
        claim_id: row.claim_id.trim().to_string(),
        member_id: row.member_id.trim().to_string(),
        provider: row.provider.trim().to_string(),
        service_date: row.service_date.trim().to_string(),
        total_amount: row.total_amount.trim().parse::<i64>().unwrap_or(0),
        diagnosis_codes: row.diagnosis_codes.trim().to_string(),
    }
}

/// Row number for a zero-based data row index
fn row_number(index: usize) -> usize {
    index + FIRST_DATA_ROW
}

/// Ingests claim files through a row parser into the claims port
///
/// The duplicate check is a lookup followed by a save. Two batches ingested
/// concurrently with the same claim id can both succeed; the later write wins.
pub struct IngestionService {
    parser: Arc<dyn ClaimRowParser>,
    claims: Arc<dyn ClaimsPort>,
}

impl IngestionService {
    /// Creates a new ingestion service
    pub fn new(parser: Arc<dyn ClaimRowParser>, claims: Arc<dyn ClaimsPort>) -> Self {
        Self { parser, claims }
    }

    /// Ingests a whole file
    ///
    /// Never fails: parser failures become a single row-0 error and every
    /// row-level problem becomes a row-scoped error.
    pub async fn ingest(&self, content: &str) -> IngestionOutcome {
        let batch_id = Uuid::now_v7();
        let span = info_span!("ingest_claims", %batch_id);

        async move {
            let mut outcome = IngestionOutcome::default();

            let parsed = match self.parser.parse(content) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!(error = %e, "Claim file could not be parsed");
                    outcome.record_global_error(e.to_string());
                    return outcome;
                }
            };

            outcome.record_parse_errors(&parsed.errors);
            let flagged: HashSet<usize> = parsed.errors.iter().map(|e| e.row).collect();

            for (index, csv_row) in parsed.rows.iter().enumerate() {
                let row = row_number(index);
                let result = if flagged.contains(&row) {
                    RowOutcome::Skipped
                } else {
                    self.process_row(csv_row).await
                };

                match &result {
                    RowOutcome::Success => debug!(row, "Claim stored"),
                    RowOutcome::Skipped => debug!(row, "Row skipped after structural error"),
                    other => warn!(row, outcome = ?other, "Claim row rejected"),
                }
                outcome.apply(row, result);
            }

            info!(
                rows = parsed.rows.len(),
                success_count = outcome.success_count,
                error_count = outcome.error_count,
                "Claim ingestion finished"
            );
            outcome
        }
        .instrument(span)
        .await
    }

    /// Validates, checks for duplicates, and stores one row
    pub async fn process_row(&self, row: &CsvRow) -> RowOutcome {
        let record = coerce_row(row);

        let validation = Claim::validate(&record);
        if !validation.is_valid {
            return RowOutcome::ValidationFailure(validation.errors);
        }

        let claim_id = ClaimId::new(record.claim_id.as_str());
        match self.claims.find_by_id(&claim_id).await {
            Ok(Some(_)) => return RowOutcome::DuplicateFailure(claim_id),
            Ok(None) => {}
            Err(e) => return RowOutcome::StoreFailure(e),
        }

        let claim = match Claim::new(record) {
            Ok(claim) => claim,
            Err(ClaimError::Validation(messages)) => return RowOutcome::ValidationFailure(messages),
            Err(e) => return RowOutcome::ValidationFailure(vec![e.to_string()]),
        };

        match self.claims.save(&claim).await {
            Ok(()) => RowOutcome::Success,
            Err(e) => RowOutcome::StoreFailure(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(claim_id: &str, amount: &str) -> CsvRow {
        CsvRow {
            claim_id: claim_id.to_string(),
            member_id: "MBR001".to_string(),
            provider: "Clinic".to_string(),
            service_date: "2024-01-15".to_string(),
            total_amount: amount.to_string(),
            diagnosis_codes: String::new(),
        }
    }

    #[test]
    fn test_coerce_trims_and_parses_amount() {
        let record = coerce_row(&row("  CLM001 ", " 12500 "));
        assert_eq!(record.claim_id, "CLM001");
        assert_eq!(record.total_amount, 12500);
    }

    #[test]
    fn test_coerce_unparsable_amount_becomes_zero() {
        assert_eq!(coerce_row(&row("C", "abc")).total_amount, 0);
        assert_eq!(coerce_row(&row("C", "12.50")).total_amount, 0);
        assert_eq!(coerce_row(&row("C", "")).total_amount, 0);
    }

    #[test]
    fn test_row_numbers_account_for_header() {
        assert_eq!(row_number(0), 2);
        assert_eq!(row_number(9), 11);
    }

    #[test]
    fn test_apply_folds_outcomes() {
        let mut outcome = IngestionOutcome::default();
        outcome.apply(2, RowOutcome::Success);
        outcome.apply(3, RowOutcome::DuplicateFailure(ClaimId::from("C1")));
        outcome.apply(4, RowOutcome::Skipped);
        outcome.apply(5, RowOutcome::StoreFailure(PortError::connection("down")));

        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.error_count, 2);
        assert_eq!(outcome.errors[0], RowError::new(3, "Duplicate claimId: C1"));
        assert_eq!(outcome.errors[1], RowError::new(5, "down"));
    }

    #[test]
    fn test_outcome_serializes_camel_case() {
        let json = serde_json::to_value(IngestionOutcome::default()).unwrap();
        assert!(json.get("successCount").is_some());
        assert!(json.get("errorCount").is_some());
    }
}
