//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for claims. These fixtures are
//! deterministic so assertions can name exact values.

use chrono::NaiveDate;
use domain_claims::{Claim, ClaimRecord};

/// Header line of a well-formed claims file
pub const CSV_HEADER: &str = "claimId,memberId,provider,serviceDate,totalAmount,diagnosisCodes";

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Fixed "today" used by tests that pin the clock
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    /// Standard service date for claims (Jan 15, 2024)
    pub fn service_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }
}

/// Fixture for claim test data
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// A valid record for CLM001 / MBR001
    pub fn record() -> ClaimRecord {
        ClaimRecord {
            claim_id: "CLM001".to_string(),
            member_id: "MBR001".to_string(),
            provider: "HealthCare Inc".to_string(),
            service_date: "2024-01-15".to_string(),
            total_amount: 12500,
            diagnosis_codes: "R51;K21.9".to_string(),
        }
    }

    pub fn claim() -> Claim {
        Claim::new(Self::record()).unwrap()
    }

    /// Claims for two members spread over three months
    pub fn spread() -> Vec<Claim> {
        vec![
            claim("CLM001", "MBR001", "2024-01-15", 12500),
            claim("CLM002", "MBR002", "2024-01-14", 8999),
            claim("CLM003", "MBR001", "2024-02-03", 4000),
            claim("CLM004", "MBR001", "2024-03-28", 1500),
            claim("CLM005", "MBR002", "2024-03-01", 20000),
        ]
    }
}

/// Builds a valid claim with a fixed provider and diagnosis code
pub fn claim(claim_id: &str, member_id: &str, service_date: &str, total_amount: i64) -> Claim {
    Claim::new(ClaimRecord {
        claim_id: claim_id.to_string(),
        member_id: member_id.to_string(),
        provider: "HealthCare Inc".to_string(),
        service_date: service_date.to_string(),
        total_amount,
        diagnosis_codes: "R51".to_string(),
    })
    .unwrap()
}
