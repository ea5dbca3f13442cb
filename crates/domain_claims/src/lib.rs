//! Claims Domain
//!
//! This crate models healthcare claim records and the two workflows built on
//! them: bulk ingestion of delimited claim files and claim lookups.
//!
//! # Ingestion Flow
//!
//! ```text
//! raw text -> ClaimRowParser -> CsvRow -> validate -> duplicate check -> ClaimsPort::save
//! ```
//!
//! Every row yields its own outcome; a failing row never aborts the batch.

pub mod claim;
pub mod validation;
pub mod error;
pub mod ports;
pub mod ingestion;
pub mod services;
pub mod adapters;

pub use claim::{Claim, ClaimRecord, parse_diagnosis_codes};
pub use validation::ValidationResult;
pub use error::ClaimError;
pub use ports::{ClaimsPort, ClaimsFilter, ClaimRowParser, CsvRow, ParsedRows, RowError};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryClaimsPort;
pub use ingestion::{IngestionService, IngestionOutcome, RowOutcome};
pub use services::{ClaimsQueryService, ClaimsSummary};
pub use adapters::CsvClaimParser;
