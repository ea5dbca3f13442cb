//! HTTP API tests

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use domain_claims::ClaimsPort;
use infra_db::{FailureMode, InMemoryKeyValueStore, KeyValueClaimsAdapter};
use interface_api::{config::ApiConfig, create_router, AppState};

use test_utils::{assert_json_has_keys, ClaimFixtures, CsvContentBuilder};

struct TestApp {
    server: TestServer,
    store: Arc<InMemoryKeyValueStore>,
    adapter: Arc<KeyValueClaimsAdapter<InMemoryKeyValueStore>>,
}

fn test_app() -> TestApp {
    let config = ApiConfig::default();
    let store = Arc::new(InMemoryKeyValueStore::new());
    let adapter = Arc::new(KeyValueClaimsAdapter::new(store.clone(), config.store_config()));
    let server = TestServer::new(create_router(AppState::new(adapter.clone(), config))).unwrap();
    TestApp {
        server,
        store,
        adapter,
    }
}

async fn seeded_app() -> TestApp {
    let app = test_app();
    for claim in ClaimFixtures::spread() {
        app.adapter.save(&claim).await.unwrap();
    }
    app
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_store_outage() {
    let app = test_app();
    app.server.get("/health/ready").await.assert_status_ok();

    app.store.set_failure(Some(FailureMode::Connection)).await;
    app.server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Get By Id
// ============================================================================

#[tokio::test]
async fn test_get_claim_by_id() {
    let app = seeded_app().await;
    let response = app.server.get("/claims/CLM001").await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "claimId": "CLM001",
        "memberId": "MBR001",
        "provider": "HealthCare Inc",
        "serviceDate": "2024-01-15",
        "totalAmount": 12500,
        "diagnosisCodes": "R51"
    }));
}

#[tokio::test]
async fn test_get_missing_claim_is_404() {
    let app = seeded_app().await;
    let response = app.server.get("/claims/NONEXISTENT").await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({
        "error": "not_found",
        "message": "Claim with ID 'NONEXISTENT' not found",
        "code": "NOT_FOUND"
    }));
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_list_by_member() {
    let app = seeded_app().await;
    let response = app
        .server
        .get("/claims")
        .add_query_param("memberId", "MBR001")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_json_has_keys(&body, &["claims", "totalAmount"]);
    assert_eq!(body["totalAmount"], 18000);
    let ids: Vec<&str> = body["claims"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["claimId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["CLM004", "CLM003", "CLM001"]);
}

#[tokio::test]
async fn test_list_by_date_range() {
    let app = seeded_app().await;
    let response = app
        .server
        .get("/claims")
        .add_query_param("startDate", "2024-01-01")
        .add_query_param("endDate", "2024-01-31")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["claims"].as_array().unwrap().len(), 2);
    assert_eq!(body["totalAmount"], 21499);
}

#[tokio::test]
async fn test_list_rejects_malformed_date() {
    let app = seeded_app().await;
    let response = app
        .server
        .get("/claims")
        .add_query_param("startDate", "01/15/2024")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Start date must be in YYYY-MM-DD format");
}

#[tokio::test]
async fn test_list_rejects_unbounded_fan_out() {
    let app = seeded_app().await;
    let before = app.store.query_count();
    let response = app
        .server
        .get("/claims")
        .add_query_param("startDate", "0001-01-01")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Date range cannot span more than 120 months");
    assert_eq!(app.store.query_count(), before);
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let app = seeded_app().await;
    app.store.set_failure(Some(FailureMode::Timeout)).await;

    let response = app
        .server
        .get("/claims")
        .add_query_param("memberId", "MBR001")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "internal_error");
}

// ============================================================================
// Ingestion
// ============================================================================

#[tokio::test]
async fn test_ingest_reports_partial_success() {
    let app = test_app();
    let content = CsvContentBuilder::new()
        .raw("C1,M1,P,2024-01-15,12500,R51")
        .raw(",M2,P,2024-01-14,8999,")
        .build();

    let response = app.server.post("/claims").text(content).await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "successCount": 1,
        "errorCount": 1,
        "errors": [{"row": 3, "message": "Missing claimId"}]
    }));

    app.server.get("/claims/C1").await.assert_status_ok();
}

#[tokio::test]
async fn test_ingest_empty_body_is_400() {
    let app = test_app();
    let response = app.server.post("/claims").text("").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn test_ingest_header_problems_still_200() {
    let app = test_app();
    let response = app
        .server
        .post("/claims")
        .text("claimId,provider\nC1,P")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["successCount"], 0);
    assert_eq!(body["errors"][0]["row"], 1);
    assert_eq!(
        body["errors"][0]["message"],
        "Missing required headers: memberId, serviceDate, totalAmount, diagnosisCodes"
    );
}
