//! Claim entity
//!
//! A `Claim` is an immutable, always-valid value object. Raw input arrives as
//! a [`ClaimRecord`], the flat shape used on the wire and in storage; the
//! record is validated once and either becomes a `Claim` or is rejected with
//! every violated rule.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{format_date, parse_date, ClaimId, MemberId};
use crate::error::ClaimError;
use crate::validation::ValidationResult;

pub const MISSING_CLAIM_ID: &str = "Missing claimId";
pub const MISSING_MEMBER_ID: &str = "Missing memberId";
pub const MISSING_PROVIDER: &str = "Missing provider";
pub const MISSING_SERVICE_DATE: &str = "Missing serviceDate";
pub const INVALID_SERVICE_DATE: &str = "Invalid serviceDate format";
pub const FUTURE_SERVICE_DATE: &str = "Service date cannot be in the future";
pub const INVALID_TOTAL_AMOUNT: &str = "Invalid totalAmount (must be a positive integer)";

/// Canonical flat representation of a claim
///
/// `serviceDate` is `YYYY-MM-DD` and `diagnosisCodes` is a `;`-joined list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub claim_id: String,
    pub member_id: String,
    pub provider: String,
    pub service_date: String,
    /// Amount in minor currency units
    pub total_amount: i64,
    pub diagnosis_codes: String,
}

/// A validated healthcare claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClaimRecord", into = "ClaimRecord")]
pub struct Claim {
    claim_id: ClaimId,
    member_id: MemberId,
    provider: String,
    service_date: NaiveDate,
    total_amount: i64,
    diagnosis_codes: Vec<String>,
}

impl Claim {
    /// Validates and builds a claim, using today's UTC date for the future-date rule
    pub fn new(record: ClaimRecord) -> Result<Self, ClaimError> {
        Self::new_on(record, Utc::now().date_naive())
    }

    /// Validates and builds a claim against an explicit "today"
    pub fn new_on(record: ClaimRecord, today: NaiveDate) -> Result<Self, ClaimError> {
        let validation = Self::validate_on(&record, today);
        if !validation.is_valid {
            return Err(ClaimError::Validation(validation.errors));
        }

        let service_date = parse_date(&record.service_date)
            .map_err(|_| ClaimError::Validation(vec![INVALID_SERVICE_DATE.to_string()]))?;

        Ok(Self {
            claim_id: ClaimId::new(record.claim_id.trim()),
            member_id: MemberId::new(record.member_id.trim()),
            provider: record.provider.trim().to_string(),
            service_date,
            total_amount: record.total_amount,
            diagnosis_codes: parse_diagnosis_codes(&record.diagnosis_codes),
        })
    }

    /// Checks raw fields against every claim rule using today's UTC date
    pub fn validate(record: &ClaimRecord) -> ValidationResult {
        Self::validate_on(record, Utc::now().date_naive())
    }

    /// Checks raw fields against every claim rule
    ///
    /// All violations are collected; evaluation never stops early.
    pub fn validate_on(record: &ClaimRecord, today: NaiveDate) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if record.claim_id.trim().is_empty() {
            result.add_error(MISSING_CLAIM_ID);
        }
        if record.member_id.trim().is_empty() {
            result.add_error(MISSING_MEMBER_ID);
        }
        if record.provider.trim().is_empty() {
            result.add_error(MISSING_PROVIDER);
        }

        if record.service_date.trim().is_empty() {
            result.add_error(MISSING_SERVICE_DATE);
        } else {
            match parse_date(&record.service_date) {
                Err(_) => result.add_error(INVALID_SERVICE_DATE),
                Ok(date) if date > today => result.add_error(FUTURE_SERVICE_DATE),
                Ok(_) => {}
            }
        }

        if record.total_amount <= 0 {
            result.add_error(INVALID_TOTAL_AMOUNT);
        }

        result
    }

    pub fn claim_id(&self) -> &ClaimId {
        &self.claim_id
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn service_date(&self) -> NaiveDate {
        self.service_date
    }

    /// Amount in minor currency units
    pub fn total_amount(&self) -> i64 {
        self.total_amount
    }

    pub fn diagnosis_codes(&self) -> &[String] {
        &self.diagnosis_codes
    }

    /// Serializes to the canonical flat record
    pub fn to_record(&self) -> ClaimRecord {
        ClaimRecord {
            claim_id: self.claim_id.to_string(),
            member_id: self.member_id.to_string(),
            provider: self.provider.clone(),
            service_date: format_date(self.service_date),
            total_amount: self.total_amount,
            diagnosis_codes: self.diagnosis_codes.join(";"),
        }
    }
}

impl TryFrom<ClaimRecord> for Claim {
    type Error = ClaimError;

    fn try_from(record: ClaimRecord) -> Result<Self, Self::Error> {
        Claim::new(record)
    }
}

impl From<Claim> for ClaimRecord {
    fn from(claim: Claim) -> Self {
        claim.to_record()
    }
}

/// Splits a `;`-delimited code list, trimming pieces and dropping empty ones
///
/// Order is preserved and duplicates are kept.
pub fn parse_diagnosis_codes(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}
