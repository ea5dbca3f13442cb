//! HTTP API Layer
//!
//! This crate provides the REST API for the claims system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for ingestion, lookups and health
//! - **Middleware**: Request logging
//! - **DTOs**: Query and response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(adapter, config);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_claims::{ClaimsPort, ClaimsQueryService, CsvClaimParser, IngestionService};

use crate::config::ApiConfig;
use crate::handlers::{claims, health};
use crate::middleware::request_logging;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub claims: Arc<ClaimsQueryService>,
    pub ingestion: Arc<IngestionService>,
    pub store_health: Arc<dyn HealthCheckable>,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires the claim services around one injected store adapter
    pub fn new<A>(adapter: Arc<A>, config: ApiConfig) -> Self
    where
        A: ClaimsPort + HealthCheckable,
    {
        let port: Arc<dyn ClaimsPort> = adapter.clone();
        Self {
            claims: Arc::new(ClaimsQueryService::new(port.clone())),
            ingestion: Arc::new(IngestionService::new(Arc::new(CsvClaimParser::new()), port)),
            store_health: adapter,
            config,
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let claims_routes = Router::new()
        .route("/claims", get(claims::list_claims).post(claims::ingest_claims))
        .route("/claims/:id", get(claims::get_claim));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .merge(claims_routes)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
