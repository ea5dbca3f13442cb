//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use core_kernel::ClaimId;
use domain_claims::{ClaimRecord, IngestionOutcome};

use crate::dto::claims::{ClaimsListResponse, ClaimsQuery};
use crate::{error::ApiError, AppState};

/// Ingests a claims file sent as the raw request body
///
/// Row-level problems are reported in the outcome with status 200.
pub async fn ingest_claims(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<IngestionOutcome>, ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::bad_request(
            "No file uploaded",
            "Please upload a CSV file",
        ));
    }

    let outcome = state.ingestion.ingest(&body).await;
    info!(
        success_count = outcome.success_count,
        error_count = outcome.error_count,
        "Claims file ingested"
    );
    Ok(Json(outcome))
}

/// Lists claims by member and/or service date range
pub async fn list_claims(
    State(state): State<AppState>,
    Query(query): Query<ClaimsQuery>,
) -> Result<Json<ClaimsListResponse>, ApiError> {
    let filter = query.into_filter(state.config.max_range_months)?;
    let summary = state.claims.get_claims(filter).await?;
    Ok(Json(summary.into()))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClaimRecord>, ApiError> {
    let claim = state.claims.get_claim_by_id(&ClaimId::new(id)).await?;
    Ok(Json(claim.into()))
}
