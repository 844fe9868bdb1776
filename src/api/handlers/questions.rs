//! Question history handler.

use crate::types::{QuestionRecord, Result};
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

/// Query string of the questions listing endpoint.
#[derive(Debug, Deserialize)]
pub struct QuestionsParams {
    /// Maximum number of records to return.
    pub limit: Option<usize>,
}

/// List recently answered questions, newest first.
#[utoipa::path(
    get,
    path = "/questions",
    params(
        ("limit" = Option<usize>, Query, description = "Maximum records to return (default 20, capped at 100)")
    ),
    responses(
        (status = 200, description = "Recent question records", body = Vec<QuestionRecord>),
        (status = 500, description = "Database failure")
    ),
    tag = "questions"
)]
pub async fn list_questions(
    State(state): State<AppState>,
    Query(params): Query<QuestionsParams>,
) -> Result<Json<Vec<QuestionRecord>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let questions = state.turso.recent_questions(limit).await?;
    Ok(Json(questions))
}
