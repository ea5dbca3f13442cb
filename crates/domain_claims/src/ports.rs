//! Claims Domain Ports
//!
//! This module defines the interfaces the claims domain needs from the
//! outside world:
//!
//! - [`ClaimsPort`]: persistence and lookup of claims
//! - [`ClaimRowParser`]: turning raw delimited text into row records
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::{ClaimsPort, IngestionService, CsvClaimParser};
//! use std::sync::Arc;
//!
//! let claims: Arc<dyn ClaimsPort> = Arc::new(adapter);
//! let ingestion = IngestionService::new(Arc::new(CsvClaimParser::new()), claims);
//! let outcome = ingestion.ingest(&file_content).await;
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, DomainPort, MemberId, PortError};

use crate::claim::Claim;

/// Filter criteria for claim listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimsFilter {
    /// Restrict to one member
    pub member_id: Option<MemberId>,
    /// Earliest service date (inclusive)
    pub start_date: Option<NaiveDate>,
    /// Latest service date (inclusive)
    pub end_date: Option<NaiveDate>,
}

impl ClaimsFilter {
    /// Creates a filter for one member's claims
    pub fn by_member(member_id: impl Into<MemberId>) -> Self {
        Self {
            member_id: Some(member_id.into()),
            ..Default::default()
        }
    }

    /// Creates a filter for a closed service date range
    pub fn between(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Default::default()
        }
    }

    /// Adds a member restriction
    pub fn with_member(mut self, member_id: impl Into<MemberId>) -> Self {
        self.member_id = Some(member_id.into());
        self
    }

    /// Sets the earliest service date
    pub fn from_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the latest service date
    pub fn until_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// The member restriction, ignoring blank ids
    pub fn member(&self) -> Option<&MemberId> {
        self.member_id.as_ref().filter(|id| !id.is_blank())
    }

    /// Returns true if the claim satisfies every criterion
    pub fn matches(&self, claim: &Claim) -> bool {
        if let Some(member_id) = self.member() {
            if claim.member_id() != member_id {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if claim.service_date() < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if claim.service_date() > end {
                return false;
            }
        }
        true
    }
}

/// Persistence port for claims
///
/// Implementations propagate backend failures unchanged; they neither
/// retry nor swallow errors.
#[async_trait]
pub trait ClaimsPort: DomainPort {
    /// Stores a claim, fully replacing any claim with the same id
    async fn save(&self, claim: &Claim) -> Result<(), PortError>;

    /// Looks up a claim by id; absence is `Ok(None)`, never an error
    async fn find_by_id(&self, claim_id: &ClaimId) -> Result<Option<Claim>, PortError>;

    /// Lists claims matching the filter, newest service date first
    async fn find_with_filters(&self, filter: ClaimsFilter) -> Result<Vec<Claim>, PortError>;
}

/// One data row of a claims file, exactly as read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRow {
    pub claim_id: String,
    pub member_id: String,
    pub provider: String,
    pub service_date: String,
    pub total_amount: String,
    pub diagnosis_codes: String,
}

/// An error attributed to one input row
///
/// Row 1 is the header, row 2 the first data row; row 0 marks errors that
/// concern the whole input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl RowError {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}

/// Output of a row parser
///
/// `rows` holds one entry per data record, in order, including records that
/// also have a structural error in `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRows {
    pub rows: Vec<CsvRow>,
    pub errors: Vec<RowError>,
}

/// Structural parser for claim files
///
/// Parsers report structure problems only (headers, column counts); business
/// rules are left to the domain.
pub trait ClaimRowParser: Send + Sync {
    fn parse(&self, content: &str) -> Result<ParsedRows, PortError>;
}

/// Mock implementations for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::RwLock;

    /// In-memory implementation of ClaimsPort
    #[derive(Debug, Default)]
    pub struct InMemoryClaimsPort {
        claims: RwLock<BTreeMap<ClaimId, Claim>>,
        failing_saves: RwLock<HashSet<ClaimId>>,
        saves: AtomicUsize,
    }

    impl InMemoryClaimsPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with claims for testing
        pub async fn with_claims(claims: Vec<Claim>) -> Self {
            let port = Self::new();
            for claim in claims {
                port.claims.write().await.insert(claim.claim_id().clone(), claim);
            }
            port
        }

        /// Makes every later save of this claim id fail with a connection error
        pub async fn fail_saves_for(&self, claim_id: impl Into<ClaimId>) {
            self.failing_saves.write().await.insert(claim_id.into());
        }

        /// Number of successful saves
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        /// Number of stored claims
        pub async fn len(&self) -> usize {
            self.claims.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.claims.read().await.is_empty()
        }
    }

    impl DomainPort for InMemoryClaimsPort {}

    #[async_trait]
    impl ClaimsPort for InMemoryClaimsPort {
        async fn save(&self, claim: &Claim) -> Result<(), PortError> {
            if self.failing_saves.read().await.contains(claim.claim_id()) {
                return Err(PortError::connection("Connection refused"));
            }
            self.claims
                .write()
                .await
                .insert(claim.claim_id().clone(), claim.clone());
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn find_by_id(&self, claim_id: &ClaimId) -> Result<Option<Claim>, PortError> {
            Ok(self.claims.read().await.get(claim_id).cloned())
        }

        async fn find_with_filters(&self, filter: ClaimsFilter) -> Result<Vec<Claim>, PortError> {
            let claims = self.claims.read().await;
            let mut results: Vec<Claim> = claims
                .values()
                .filter(|claim| filter.matches(claim))
                .cloned()
                .collect();

            results.sort_by(|a, b| b.service_date().cmp(&a.service_date()));
            Ok(results)
        }
    }
}
