//! Claims DTOs

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use domain_claims::{ClaimRecord, ClaimsFilter, ClaimsSummary};

use crate::error::ApiError;

/// Query string of `GET /claims`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsQuery {
    pub member_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ClaimsQuery {
    /// Converts to a domain filter; empty parameters count as absent
    pub fn into_filter(self, max_range_months: u32) -> Result<ClaimsFilter, ApiError> {
        self.into_filter_on(Utc::now().date_naive(), max_range_months)
    }

    /// Converts to a domain filter as seen on `today`
    ///
    /// Without a member id a listing reads one month bucket per month in
    /// range, so ranges spanning more than `max_range_months` are rejected.
    /// A missing end date counts as today.
    pub fn into_filter_on(
        self,
        today: NaiveDate,
        max_range_months: u32,
    ) -> Result<ClaimsFilter, ApiError> {
        let mut filter = ClaimsFilter::default();

        if let Some(member_id) = non_empty(self.member_id) {
            filter = filter.with_member(member_id);
        }
        if let Some(start) = non_empty(self.start_date) {
            filter = filter.from_date(parse_query_date(&start, "Start date")?);
        }
        if let Some(end) = non_empty(self.end_date) {
            filter = filter.until_date(parse_query_date(&end, "End date")?);
        }

        if filter.member().is_none() {
            if let Some(start) = filter.start_date {
                let end = filter.end_date.unwrap_or(today);
                if months_spanned(start, end) > i64::from(max_range_months) {
                    return Err(ApiError::bad_request(
                        "validation_error",
                        format!("Date range cannot span more than {} months", max_range_months),
                    ));
                }
            }
        }

        Ok(filter)
    }
}

/// Calendar months touched by `start..=end`; zero when reversed
fn months_spanned(start: NaiveDate, end: NaiveDate) -> i64 {
    if start > end {
        return 0;
    }
    let years = i64::from(end.year() - start.year());
    years * 12 + i64::from(end.month()) - i64::from(start.month()) + 1
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a strict `YYYY-MM-DD` query parameter
fn parse_query_date(value: &str, label: &str) -> Result<NaiveDate, ApiError> {
    let invalid = || {
        ApiError::bad_request(
            "validation_error",
            format!("{} must be in YYYY-MM-DD format", label),
        )
    };

    if value.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

/// Body of `GET /claims`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsListResponse {
    pub claims: Vec<ClaimRecord>,
    pub total_amount: i64,
}

impl From<ClaimsSummary> for ClaimsListResponse {
    fn from(summary: ClaimsSummary) -> Self {
        Self {
            total_amount: summary.total_amount,
            claims: summary.claims.into_iter().map(ClaimRecord::from).collect(),
        }
    }
}
