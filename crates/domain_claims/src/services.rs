//! Claim lookup services

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use core_kernel::ClaimId;

use crate::claim::Claim;
use crate::error::ClaimError;
use crate::ports::{ClaimsFilter, ClaimsPort};

/// Claims listing with the summed amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsSummary {
    pub claims: Vec<Claim>,
    /// Sum of `totalAmount` over `claims`, in minor units
    pub total_amount: i64,
}

impl ClaimsSummary {
    pub fn new(claims: Vec<Claim>) -> Self {
        let total_amount = claims.iter().map(Claim::total_amount).sum();
        Self {
            claims,
            total_amount,
        }
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// Read side of the claims domain
pub struct ClaimsQueryService {
    claims: Arc<dyn ClaimsPort>,
}

impl ClaimsQueryService {
    pub fn new(claims: Arc<dyn ClaimsPort>) -> Self {
        Self { claims }
    }

    /// Fetches one claim, failing with `NotFound` if it does not exist
    #[instrument(skip(self), fields(claim_id = %claim_id))]
    pub async fn get_claim_by_id(&self, claim_id: &ClaimId) -> Result<Claim, ClaimError> {
        self.claims
            .find_by_id(claim_id)
            .await?
            .ok_or_else(|| ClaimError::NotFound(claim_id.clone()))
    }

    /// Lists claims for the filter, newest first, with their total
    #[instrument(skip(self))]
    pub async fn get_claims(&self, filter: ClaimsFilter) -> Result<ClaimsSummary, ClaimError> {
        let claims = self.claims.find_with_filters(filter).await?;
        debug!(count = claims.len(), "Claims listed");
        Ok(ClaimsSummary::new(claims))
    }
}
