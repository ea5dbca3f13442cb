//! Comprehensive tests for domain_claims

use std::sync::Arc;

use proptest::prelude::*;

use core_kernel::ClaimId;
use domain_claims::claim::{FUTURE_SERVICE_DATE, INVALID_SERVICE_DATE, MISSING_CLAIM_ID};
use domain_claims::{
    Claim, ClaimRecord, ClaimRowParser, ClaimsFilter, ClaimsPort, ClaimsQueryService,
    CsvClaimParser, InMemoryClaimsPort, IngestionService, ParsedRows, RowError,
};
use core_kernel::PortError;

use test_utils::{
    assert_claim_ids, assert_outcome_counts, assert_row_error, assert_sorted_desc,
    valid_claim_record_strategy, ClaimFixtures, ClaimRecordBuilder, CsvContentBuilder,
    TemporalFixtures,
};

// ============================================================================
// Claim Tests
// ============================================================================

mod claim_tests {
    use super::*;

    #[test]
    fn test_claim_from_fixture() {
        let claim = ClaimFixtures::claim();
        assert_eq!(claim.claim_id().as_str(), "CLM001");
        assert_eq!(claim.member_id().as_str(), "MBR001");
        assert_eq!(claim.total_amount(), 12500);
        assert_eq!(claim.diagnosis_codes(), ["R51", "K21.9"]);
    }

    #[test]
    fn test_invalid_date_format() {
        let record = ClaimRecordBuilder::new().with_service_date("01/15/2024").build();
        let result = Claim::validate(&record);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![INVALID_SERVICE_DATE]);
    }

    #[test]
    fn test_rfc3339_service_date_accepted() {
        let claim = ClaimRecordBuilder::new()
            .with_service_date("2024-01-15T10:30:00Z")
            .build_claim();
        assert_eq!(claim.service_date(), TemporalFixtures::service_date());
        assert_eq!(claim.to_record().service_date, "2024-01-15");
    }

    #[test]
    fn test_future_date_rejected_against_pinned_today() {
        let record = ClaimRecordBuilder::new().on(TemporalFixtures::ymd(2024, 6, 16)).build();
        let err = Claim::new_on(record, TemporalFixtures::today()).unwrap_err();
        assert_eq!(err.to_string(), FUTURE_SERVICE_DATE);
    }

    #[test]
    fn test_empty_codes_serialize_as_empty_string() {
        let claim = ClaimRecordBuilder::new().with_diagnosis_codes("").build_claim();
        assert!(claim.diagnosis_codes().is_empty());

        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["diagnosisCodes"], "");
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let json = serde_json::to_value(ClaimFixtures::claim()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "claimId": "CLM001",
                "memberId": "MBR001",
                "provider": "HealthCare Inc",
                "serviceDate": "2024-01-15",
                "totalAmount": 12500,
                "diagnosisCodes": "R51;K21.9"
            })
        );
    }

    #[test]
    fn test_invalid_json_is_rejected_on_deserialize() {
        let json = r#"{"claimId":"","memberId":"M","provider":"P","serviceDate":"2024-01-15","totalAmount":5,"diagnosisCodes":""}"#;
        let err = serde_json::from_str::<Claim>(json).unwrap_err();
        assert!(err.to_string().contains(MISSING_CLAIM_ID));
    }

    proptest! {
        #[test]
        fn prop_valid_records_survive_serialization(record in valid_claim_record_strategy()) {
            let claim = Claim::new(record).unwrap();
            let json = serde_json::to_string(&claim).unwrap();
            let restored: Claim = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(restored, claim);
        }

        #[test]
        fn prop_non_positive_amounts_rejected(amount in test_utils::non_positive_amount_strategy()) {
            let record = ClaimRecordBuilder::new().with_total_amount(amount).build();
            prop_assert!(!Claim::validate(&record).is_valid);
        }

        #[test]
        fn prop_record_round_trip_is_stable(record in valid_claim_record_strategy()) {
            let claim = Claim::new(record.clone()).unwrap();
            let canonical: ClaimRecord = claim.clone().into();
            prop_assert_eq!(Claim::new(canonical).unwrap(), claim);
        }
    }
}

// ============================================================================
// Ingestion Tests
// ============================================================================

mod ingestion_tests {
    use super::*;

    fn pipeline(port: Arc<InMemoryClaimsPort>) -> IngestionService {
        IngestionService::new(Arc::new(CsvClaimParser::new()), port)
    }

    #[tokio::test]
    async fn test_partial_success() {
        let port = Arc::new(InMemoryClaimsPort::new());
        let content = CsvContentBuilder::new()
            .raw("C1,M1,P,2024-01-15,100,")
            .raw(",M1,P,2024-01-15,100,")
            .build();

        let outcome = pipeline(port.clone()).ingest(&content).await;

        assert_outcome_counts(&outcome, 1, 1);
        assert_eq!(outcome.errors, vec![RowError::new(3, MISSING_CLAIM_ID)]);
        assert_eq!(port.len().await, 1);
    }

    #[tokio::test]
    async fn test_all_valid_rows_stored() {
        let port = Arc::new(InMemoryClaimsPort::new());
        let content = CsvContentBuilder::new()
            .row(&ClaimRecordBuilder::new().with_claim_id("CLM001").build())
            .row(&ClaimRecordBuilder::new().with_claim_id("CLM002").with_fake_provider().build())
            .row(&ClaimRecordBuilder::new().with_claim_id("CLM003").with_diagnosis_codes("").build())
            .build();

        let outcome = pipeline(port.clone()).ingest(&content).await;

        assert_outcome_counts(&outcome, 3, 0);
        assert!(outcome.is_clean());
        assert_eq!(port.save_count(), 3);
    }

    #[tokio::test]
    async fn test_multiple_violations_joined_in_one_error() {
        let port = Arc::new(InMemoryClaimsPort::new());
        let content = CsvContentBuilder::new().raw(",,,,abc,").build();

        let outcome = pipeline(port).ingest(&content).await;

        assert_outcome_counts(&outcome, 0, 1);
        assert_row_error(
            &outcome.errors,
            2,
            "Missing claimId, Missing memberId, Missing provider, Missing serviceDate, Invalid totalAmount (must be a positive integer)",
        );
    }

    #[tokio::test]
    async fn test_fractional_amount_rejected() {
        let port = Arc::new(InMemoryClaimsPort::new());
        let content = CsvContentBuilder::new().raw("C1,M1,P,2024-01-15,12.50,").build();

        let outcome = pipeline(port).ingest(&content).await;
        assert_row_error(&outcome.errors, 2, "Invalid totalAmount (must be a positive integer)");
    }

    #[tokio::test]
    async fn test_duplicate_within_batch() {
        let port = Arc::new(InMemoryClaimsPort::new());
        let content = CsvContentBuilder::new()
            .raw("C1,M1,P,2024-01-15,100,")
            .raw("C1,M2,Q,2024-01-16,200,")
            .build();

        let outcome = pipeline(port.clone()).ingest(&content).await;

        assert_outcome_counts(&outcome, 1, 1);
        assert_row_error(&outcome.errors, 3, "Duplicate claimId: C1");
        let stored = port.find_by_id(&ClaimId::from("C1")).await.unwrap().unwrap();
        assert_eq!(stored.member_id().as_str(), "M1");
    }

    #[tokio::test]
    async fn test_duplicate_of_existing_claim() {
        let port = Arc::new(InMemoryClaimsPort::with_claims(vec![ClaimFixtures::claim()]).await);
        let content = CsvContentBuilder::new().row(&ClaimFixtures::record()).build();

        let outcome = pipeline(port.clone()).ingest(&content).await;

        assert_outcome_counts(&outcome, 0, 1);
        assert_row_error(&outcome.errors, 2, "Duplicate claimId: CLM001");
        assert_eq!(port.save_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_row_scoped() {
        let port = Arc::new(InMemoryClaimsPort::new());
        port.fail_saves_for("C2").await;
        let content = CsvContentBuilder::new()
            .raw("C1,M1,P,2024-01-15,100,")
            .raw("C2,M1,P,2024-01-15,100,")
            .raw("C3,M1,P,2024-01-15,100,")
            .build();

        let outcome = pipeline(port.clone()).ingest(&content).await;

        assert_outcome_counts(&outcome, 2, 1);
        assert_row_error(&outcome.errors, 3, "Connection refused");
        assert_eq!(port.len().await, 2);
    }

    #[tokio::test]
    async fn test_header_errors_reported_with_rows_processed() {
        let port = Arc::new(InMemoryClaimsPort::new());
        let content = CsvContentBuilder::new()
            .with_header("claimId,memberId,provider,serviceDate,totalAmount,diagnosisCodes,notes")
            .raw("C1,M1,P,2024-01-15,100,,hello")
            .build();

        let outcome = pipeline(port).ingest(&content).await;

        assert_outcome_counts(&outcome, 1, 1);
        assert_row_error(&outcome.errors, 1, "Unexpected headers found: notes");
    }

    #[tokio::test]
    async fn test_structurally_bad_row_not_validated() {
        let port = Arc::new(InMemoryClaimsPort::new());
        let content = CsvContentBuilder::new()
            .raw("C1,M1")
            .raw("C2,M1,P,2024-01-15,100,")
            .build();

        let outcome = pipeline(port.clone()).ingest(&content).await;

        assert_outcome_counts(&outcome, 1, 1);
        assert_eq!(
            outcome.errors,
            vec![RowError::new(2, "Invalid row format or insufficient columns")]
        );
        assert!(port.find_by_id(&ClaimId::from("C2")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_empty_file() {
        let port = Arc::new(InMemoryClaimsPort::new());
        let outcome = pipeline(port).ingest("").await;

        assert_outcome_counts(&outcome, 0, 1);
        assert_row_error(&outcome.errors, 0, "No valid data found in CSV file");
    }

    struct BrokenParser;

    impl ClaimRowParser for BrokenParser {
        fn parse(&self, _content: &str) -> Result<ParsedRows, PortError> {
            Err(PortError::internal("reader closed"))
        }
    }

    #[tokio::test]
    async fn test_parser_failure_becomes_row_zero_error() {
        let port = Arc::new(InMemoryClaimsPort::new());
        let service = IngestionService::new(Arc::new(BrokenParser), port);

        let outcome = service.ingest("anything").await;

        assert_outcome_counts(&outcome, 0, 1);
        assert_row_error(&outcome.errors, 0, "reader closed");
    }
}

// ============================================================================
// Query Tests
// ============================================================================

mod query_tests {
    use super::*;

    async fn service() -> ClaimsQueryService {
        let port = InMemoryClaimsPort::with_claims(ClaimFixtures::spread()).await;
        ClaimsQueryService::new(Arc::new(port))
    }

    #[tokio::test]
    async fn test_member_listing_newest_first() {
        let summary = service()
            .await
            .get_claims(ClaimsFilter::by_member("MBR001"))
            .await
            .unwrap();

        assert_sorted_desc(&summary.claims);
        assert_claim_ids(&summary.claims, &["CLM004", "CLM003", "CLM001"]);
        assert_eq!(summary.total_amount, 18000);
    }

    #[tokio::test]
    async fn test_member_and_range() {
        let filter = ClaimsFilter::by_member("MBR001").from_date(TemporalFixtures::ymd(2024, 2, 1));
        let summary = service().await.get_claims(filter).await.unwrap();
        assert_claim_ids(&summary.claims, &["CLM004", "CLM003"]);
    }

    #[tokio::test]
    async fn test_date_range_across_members() {
        let filter = ClaimsFilter::between(
            TemporalFixtures::ymd(2024, 1, 14),
            TemporalFixtures::ymd(2024, 3, 1),
        );
        let summary = service().await.get_claims(filter).await.unwrap();
        assert_claim_ids(&summary.claims, &["CLM005", "CLM003", "CLM001", "CLM002"]);
        assert_eq!(summary.total_amount, 45499);
    }

    #[tokio::test]
    async fn test_not_found() {
        let err = service()
            .await
            .get_claim_by_id(&ClaimId::from("NONEXISTENT"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Claim with ID 'NONEXISTENT' not found");
    }
}
