//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random claim data that
//! maintains domain invariants.

use chrono::NaiveDate;
use domain_claims::ClaimRecord;
use proptest::prelude::*;

/// Strategy for generating valid positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for amounts that fail the positivity rule
pub fn non_positive_amount_strategy() -> impl Strategy<Value = i64> {
    -1_000_000i64..=0i64
}

/// Strategy for service dates between 2020-01-01 and 2024-06-15
pub fn past_date_strategy() -> impl Strategy<Value = NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0u64..1627u64).prop_map(move |days| start + chrono::Days::new(days))
}

/// Strategy for claim identifiers such as `CLM0042`
pub fn claim_id_strategy() -> impl Strategy<Value = String> {
    "CLM[0-9]{4}"
}

/// Strategy for member identifiers such as `MBR012`
pub fn member_id_strategy() -> impl Strategy<Value = String> {
    "MBR[0-9]{3}"
}

/// Strategy for provider names; never blank and never contain delimiters
pub fn provider_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10}( [A-Z][a-z]{2,8})?"
}

/// Strategy for `;`-joined diagnosis code lists, possibly empty
pub fn diagnosis_codes_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Z][0-9]{2}(\\.[0-9])?", 0..4).prop_map(|codes| codes.join(";"))
}

/// Strategy for records that pass every claim rule
pub fn valid_claim_record_strategy() -> impl Strategy<Value = ClaimRecord> {
    (
        claim_id_strategy(),
        member_id_strategy(),
        provider_strategy(),
        past_date_strategy(),
        positive_amount_minor_strategy(),
        diagnosis_codes_strategy(),
    )
        .prop_map(
            |(claim_id, member_id, provider, date, total_amount, diagnosis_codes)| ClaimRecord {
                claim_id,
                member_id,
                provider,
                service_date: date.format("%Y-%m-%d").to_string(),
                total_amount,
                diagnosis_codes,
            },
        )
}
