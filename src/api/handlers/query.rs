//! Query gateway handlers.
//!
//! Both endpoints classify the query first, then dispatch: generic questions
//! are answered straight from the document collection, project-specific ones
//! go through an agent pipeline. Answers are persisted best-effort; a failed
//! write is logged and never fails the request.

use crate::types::{AppError, QueryKind, QueryRequest, QueryResponse, QuestionRecord, Result};
use crate::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use std::time::Instant;
use uuid::Uuid;

// ============= Pipeline Labels =============

/// Direct RAG answer on the crew endpoint.
pub const CREW_RAG_AGENT: &str = "Crew AI RAG";
/// Sequential crew report.
pub const CREW_AGENT: &str = "Crew AI AI agent";
/// Remote graph-RAG answer on the workflow endpoint.
pub const GRAPH_RAG_AGENT: &str = "Langraph Graph RAG";
/// Workflow graph report.
pub const GRAPH_AGENT: &str = "Langraph AI agent";

/// Process a query through the sequential crew pipeline.
#[utoipa::path(
    post,
    path = "/process_query/",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Answer or report for the query", body = QueryResponse),
        (status = 400, description = "Empty query"),
        (status = 500, description = "Pipeline failure, with a detail message")
    ),
    tag = "query"
)]
pub async fn process_query(
    State(state): State<AppState>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let query = validate_query(&payload)?;
    let start = Instant::now();

    let outcome: Result<(String, &str)> = async {
        let kind = state.classifier.classify(query).await?;
        Ok(match kind {
            QueryKind::Generic => (state.answerer.answer(query).await?, CREW_RAG_AGENT),
            QueryKind::ProjectSpecific => (state.crew.run(query).await?, CREW_AGENT),
        })
    }
    .await;
    let (result, agent) = log_outcome(query, start, outcome)?;

    persist_answer(&state, query, &result, agent).await;
    Ok(Json(QueryResponse { result }))
}

/// Process a query through the workflow graph pipeline.
///
/// Generic questions go to the remote graph-RAG service when one is
/// configured, otherwise they fall back to the local RAG answerer.
#[utoipa::path(
    post,
    path = "/process_query_langraph/",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Answer or report for the query", body = QueryResponse),
        (status = 400, description = "Empty query"),
        (status = 500, description = "Pipeline failure, with a detail message")
    ),
    tag = "query"
)]
pub async fn process_query_langraph(
    State(state): State<AppState>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let query = validate_query(&payload)?;
    let start = Instant::now();

    let outcome: Result<(String, &str)> = async {
        let kind = state.classifier.classify(query).await?;
        Ok(match kind {
            QueryKind::Generic => match &state.graph_rag {
                Some(graph) => (graph.answer(query).await?, GRAPH_RAG_AGENT),
                None => (state.answerer.answer(query).await?, CREW_RAG_AGENT),
            },
            QueryKind::ProjectSpecific => (state.workflow.run(query).await?, GRAPH_AGENT),
        })
    }
    .await;
    let (result, agent) = log_outcome(query, start, outcome)?;

    persist_answer(&state, query, &result, agent).await;
    Ok(Json(QueryResponse { result }))
}

fn validate_query(payload: &QueryRequest) -> Result<&str> {
    let query = payload.query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("Query must not be empty".to_string()));
    }
    Ok(query)
}

/// Logs how the pipeline ended; the error already names the failing stage.
fn log_outcome<'a>(
    query: &str,
    start: Instant,
    outcome: Result<(String, &'a str)>,
) -> Result<(String, &'a str)> {
    let duration_ms = start.elapsed().as_millis() as u64;
    match &outcome {
        Ok((_, agent)) => tracing::info!(query, agent, duration_ms, "Answered query"),
        Err(e) => tracing::warn!(query, error = %e, duration_ms, "Query pipeline failed"),
    }
    outcome
}

async fn persist_answer(state: &AppState, question: &str, response: &str, agent: &str) {
    let record = QuestionRecord {
        id: Uuid::new_v4().to_string(),
        question: question.to_string(),
        response: response.to_string(),
        agent: agent.to_string(),
        created_at: Utc::now(),
    };

    if let Err(e) = state.turso.insert_question(&record).await {
        tracing::error!(error = %e, agent, "Failed to persist question record");
    }
}
