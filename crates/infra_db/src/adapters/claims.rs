//! Key-Value Claims Adapter
//!
//! This module provides the storage adapter for the claims domain,
//! implementing the `ClaimsPort` trait over any [`KeyValueStore`] via the
//! `ClaimsRepository`.
//!
//! # Listing policy
//!
//! `find_with_filters` picks one access path:
//!
//! 1. A member id queries the member index, range-restricted by any dates.
//! 2. Otherwise a date bound fans out one month-index query per calendar
//!    month in range, all issued concurrently, each restricted to the part
//!    of the range inside its month.
//! 3. With no filters at all, the default look-back window ending today is
//!    used as the range and fanned out as in (2).
//!
//! Results are merged and sorted once, newest service date first.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures::future::try_join_all;
use tracing::{debug, instrument};

use core_kernel::{
    month_range, months_before, AdapterHealth, ClaimId, DomainPort, HealthCheckResult,
    HealthCheckable, PortError, YearMonth,
};
use domain_claims::{Claim, ClaimRecord, ClaimsFilter, ClaimsPort};

use crate::config::StoreConfig;
use crate::error::DatabaseError;
use crate::keys::{date_lower_bound, date_upper_bound};
use crate::repositories::claims::{date_range_condition, ClaimsRepository};
use crate::store::{KeyValueStore, SortKeyCondition};

const ADAPTER_ID: &str = "key-value-claims-adapter";

/// One month-index query of a fan-out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthQuery {
    pub month: YearMonth,
    pub range: SortKeyCondition,
}

/// Key-value-backed implementation of the ClaimsPort trait
///
/// # Error Handling
///
/// Storage errors are translated to `PortError` variants of the same kind,
/// keeping the storage error's text as the message:
/// - `DatabaseError::ConnectionFailed` -> `PortError::Connection`
/// - `DatabaseError::Timeout` -> `PortError::Timeout`
/// - `DatabaseError::PermissionDenied` -> `PortError::Unauthorized`
/// - `DatabaseError::SerializationError` -> `PortError::Transformation`
/// - Other errors -> `PortError::Internal`
#[derive(Debug)]
pub struct KeyValueClaimsAdapter<S> {
    repository: ClaimsRepository<S>,
}

impl<S: KeyValueStore> KeyValueClaimsAdapter<S> {
    /// Creates a new adapter over an injected store client
    pub fn new(store: Arc<S>, config: StoreConfig) -> Self {
        Self {
            repository: ClaimsRepository::new(store, config),
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &ClaimsRepository<S> {
        &self.repository
    }

    /// Lists claims as seen on `today`
    pub async fn find_with_filters_on(
        &self,
        filter: ClaimsFilter,
        today: NaiveDate,
    ) -> Result<Vec<Claim>, PortError> {
        let records = match filter.member() {
            Some(member_id) => {
                debug!(member_id = %member_id, "Querying member index");
                let range = date_range_condition(filter.start_date, filter.end_date);
                self.repository
                    .query_member(member_id, range)
                    .await
                    .map_err(db_to_port_error)?
            }
            None => {
                let plan = plan_month_queries(&filter, today, self.repository.config().default_window_months);
                self.fan_out(plan).await?
            }
        };

        let mut claims = records
            .into_iter()
            .map(record_to_claim)
            .collect::<Result<Vec<_>, _>>()?;

        // stable: equal dates keep their merged order
        claims.sort_by(|a, b| b.service_date().cmp(&a.service_date()));
        Ok(claims)
    }

    /// Runs every month query concurrently; the first failure fails the call
    async fn fan_out(&self, plan: Vec<MonthQuery>) -> Result<Vec<ClaimRecord>, PortError> {
        debug!(months = plan.len(), "Fanning out month index queries");

        let queries = plan
            .into_iter()
            .map(|q| self.repository.query_month(q.month, q.range));
        let results = try_join_all(queries).await.map_err(db_to_port_error)?;

        Ok(results.into_iter().flatten().collect())
    }
}

/// Month queries needed to answer a listing without a member filter
///
/// A missing start falls back to `window_months` before today and a missing
/// end to today. Returns no queries when the start date falls after the end
/// date.
pub fn plan_month_queries(
    filter: &ClaimsFilter,
    today: NaiveDate,
    window_months: u32,
) -> Vec<MonthQuery> {
    let start = filter
        .start_date
        .unwrap_or_else(|| months_before(today, window_months));
    let end = filter.end_date.unwrap_or(today);
    if start > end {
        return Vec::new();
    }

    month_range(start, end)
        .into_iter()
        .map(|month| {
            let lo = start.max(month.first_day());
            let hi = end.min(month.last_day());
            MonthQuery {
                month,
                range: SortKeyCondition::Between(date_lower_bound(lo), date_upper_bound(hi)),
            }
        })
        .collect()
}

impl<S: KeyValueStore> DomainPort for KeyValueClaimsAdapter<S> {}

#[async_trait]
impl<S: KeyValueStore> HealthCheckable for KeyValueClaimsAdapter<S> {
    /// Checks store connectivity with a point read of a key that never exists
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self
            .repository
            .get_claim(&ClaimId::new("__health__"))
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Store error: {}", e))),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> ClaimsPort for KeyValueClaimsAdapter<S> {
    #[instrument(skip(self, claim), fields(claim_id = %claim.claim_id()))]
    async fn save(&self, claim: &Claim) -> Result<(), PortError> {
        debug!("Saving claim");
        self.repository.put_claim(claim).await.map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(claim_id = %claim_id))]
    async fn find_by_id(&self, claim_id: &ClaimId) -> Result<Option<Claim>, PortError> {
        debug!("Fetching claim by ID");
        self.repository
            .get_claim(claim_id)
            .await
            .map_err(db_to_port_error)?
            .map(record_to_claim)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_with_filters(&self, filter: ClaimsFilter) -> Result<Vec<Claim>, PortError> {
        self.find_with_filters_on(filter, Utc::now().date_naive()).await
    }
}

/// Converts a storage error to a port error of the same kind
///
/// The port error displays exactly as the storage error did.
pub fn db_to_port_error(e: DatabaseError) -> PortError {
    let message = e.to_string();
    match e {
        DatabaseError::ConnectionFailed(_) => PortError::Connection {
            message,
            source: Some(Box::new(e)),
        },
        DatabaseError::Timeout {
            operation,
            duration_ms,
        } => PortError::Timeout {
            operation,
            duration_ms,
        },
        DatabaseError::PermissionDenied(_) => PortError::Unauthorized { message },
        DatabaseError::SerializationError(_) => PortError::transformation(message),
        other => PortError::Internal {
            message,
            source: Some(Box::new(other)),
        },
    }
}

/// Rebuilds a domain claim from a stored record
///
/// Stored claims were valid when written, so the date is not checked
/// against today again.
fn record_to_claim(record: ClaimRecord) -> Result<Claim, PortError> {
    Claim::new_on(record, NaiveDate::MAX)
        .map_err(|e| PortError::transformation(format!("stored claim is invalid: {}", e)))
}
