//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer of the service, built on Axum.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Query processing
//! - `POST /process_query/` - Classify and answer via the sequential crew pipeline
//! - `POST /process_query_langraph/` - Classify and answer via the workflow graph pipeline
//!
//! ## Documents
//! - `POST /documents/ingest` - Chunk, embed, and index a source document
//!
//! ## History
//! - `GET /questions` - Recently answered questions, newest first
//!
//! ## Health
//! - `GET /health` - Health check endpoint
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is served at `/docs`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

pub use routes::create_router;

use utoipa::OpenApi;

/// OpenAPI document covering the full HTTP surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::query::process_query,
        handlers::query::process_query_langraph,
        handlers::documents::ingest,
        handlers::questions::list_questions,
        handlers::health::health,
    ),
    components(schemas(
        crate::types::QueryRequest,
        crate::types::QueryResponse,
        crate::types::IngestRequest,
        crate::types::IngestResponse,
        crate::types::PageContent,
        crate::types::QuestionRecord,
        crate::types::HealthResponse,
    )),
    tags(
        (name = "query", description = "Query classification and answer pipelines"),
        (name = "documents", description = "Document ingestion"),
        (name = "questions", description = "Persisted question history"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
