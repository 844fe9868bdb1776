use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Builds the application router.
///
/// The two query endpoints keep their historical trailing slashes; clients
/// post to the literal paths `/process_query/` and `/process_query_langraph/`.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route(
            "/process_query/",
            post(crate::api::handlers::query::process_query),
        )
        .route(
            "/process_query_langraph/",
            post(crate::api::handlers::query::process_query_langraph),
        )
        .route(
            "/documents/ingest",
            post(crate::api::handlers::documents::ingest),
        )
        .route(
            "/questions",
            get(crate::api::handlers::questions::list_questions),
        )
        .route("/health", get(crate::api::handlers::health::health))
}
