//! Core types: API payloads, chat messages, retrieval records, and errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// Body of both query-processing endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// The user's question.
    pub query: String,
}

/// Response of both query-processing endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueryResponse {
    /// Final answer or report text.
    pub result: String,
}

/// One page of a source document submitted for ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageContent {
    /// 1-based page number within the source document.
    pub page: u32,
    /// Raw page text.
    pub content: String,
}

/// Body of the document ingestion endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestRequest {
    /// Source document identifier, e.g. a file name like `RSCA/etienne.pdf`.
    pub source: String,
    /// Page texts to chunk, embed, and index.
    pub pages: Vec<PageContent>,
}

/// Response of the document ingestion endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IngestResponse {
    /// Collection the chunks were written to.
    pub collection: String,
    /// Number of chunks indexed.
    pub chunks_created: usize,
}

/// A persisted question/answer record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionRecord {
    /// Record id (UUID).
    pub id: String,
    /// The query as submitted.
    pub question: String,
    /// The answer or report returned to the client.
    pub response: String,
    /// Label of the pipeline that produced the response.
    pub agent: String,
    /// When the record was written.
    pub created_at: DateTime<Utc>,
}

/// Liveness report returned by the health endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Package name.
    pub name: String,
    /// Package version.
    pub version: String,
    /// Always `ok` when the server is able to respond.
    pub status: String,
}

// ============= Classification Types =============

/// Outcome of query classification.
///
/// Only the exact reply `generic` (case-insensitive, surrounding whitespace
/// ignored) maps to [`QueryKind::Generic`]; every other reply is treated as
/// project-specific so that malformed classifier output falls through to the
/// agent pipeline instead of answering from unrelated passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Answerable directly from the indexed policy documents.
    Generic,
    /// Tied to a specific project; needs the multi-agent pipeline.
    ProjectSpecific,
}

// ============= Chat Types =============

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instruction message.
    System,
    /// End-user message.
    User,
    /// Model-produced message.
    Assistant,
    /// Tool execution result.
    Tool,
}

/// One message in a model conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role.
    pub role: MessageRole,
    /// Message text. Empty for assistant turns that only request tools.
    pub content: String,
    /// Speaker name, used to attribute assistant turns to an agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tool invocations requested by an assistant turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For tool messages, the id of the call this message answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            name: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            name: None,
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Creates an assistant message, optionally carrying tool calls.
    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            name: None,
            tool_calls,
            tool_call_id: None,
        }
    }

    /// Creates a tool-result message bound to the call it answers.
    pub fn tool_result(tool_call_id: impl Into<String>, result: &serde_json::Value) -> Self {
        Self {
            role: MessageRole::Tool,
            content: result.to_string(),
            name: None,
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Attaches a speaker name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// ============= Tool Types =============

/// A tool made available to the model.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDefinition {
    /// Tool name as exposed to the model.
    pub name: String,
    /// What the tool does, for the model's benefit.
    pub description: String,
    /// JSON Schema of the tool's arguments.
    pub parameters: serde_json::Value,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id; tool results are bound to it.
    pub id: String,
    /// Name of the requested tool.
    pub name: String,
    /// Parsed call arguments.
    pub arguments: serde_json::Value,
}

// ============= Retrieval Types =============

/// A chunk of a source document, ready for indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassageDocument {
    /// Chunk id (UUID).
    pub id: String,
    /// Chunk text.
    pub content: String,
    /// Source document identifier.
    pub source: String,
    /// Page the chunk was taken from.
    pub page: u32,
    /// Embedding vector, populated before upsert.
    pub embedding: Option<Vec<f32>>,
}

/// A retrieved passage with its similarity (or rerank relevance) score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassageHit {
    /// Passage text.
    pub content: String,
    /// Source document identifier.
    pub source: String,
    /// Page the passage was taken from.
    pub page: u32,
    /// Higher is more relevant.
    pub score: f32,
}

// ============= Error Types =============

/// Application error taxonomy.
///
/// The first four variants are recognized pipeline failures whose messages
/// are safe to return to clients. `Database`, `Configuration`, and `Internal`
/// are operational failures; their details are logged but flattened to a
/// generic message in responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The query classifier failed to produce a label.
    #[error("Query classification failed: {0}")]
    Classification(String),

    /// Embedding, vector search, rerank, or graph retrieval failed.
    #[error("Document retrieval failed: {0}")]
    Retrieval(String),

    /// A model call or agent step failed.
    #[error("Agent generation failed: {0}")]
    Generation(String),

    /// The workflow hit its step limit without producing a final answer.
    #[error("Workflow exceeded the step limit of {0} without producing a final answer")]
    NonConvergence(usize),

    /// Relational database failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request was malformed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invariant violation inside the service.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Prefixes recognized pipeline errors with the stage that raised them.
    pub(crate) fn with_stage(self, stage: &str) -> Self {
        match self {
            AppError::Generation(msg) => AppError::Generation(format!("{stage}: {msg}")),
            AppError::Retrieval(msg) => AppError::Retrieval(format!("{stage}: {msg}")),
            other => other,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, detail) = match &self {
            AppError::Classification(_)
            | AppError::Retrieval(_)
            | AppError::Generation(_)
            | AppError::NonConvergence(_) => {
                (axum::http::StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::InvalidInput(_) => (axum::http::StatusCode::BAD_REQUEST, self.to_string()),
            AppError::NotFound(_) => (axum::http::StatusCode::NOT_FOUND, self.to_string()),
            AppError::Database(msg) | AppError::Configuration(msg) | AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Unexpected failure while handling request");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "detail": detail
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = AppError::Retrieval("qdrant unreachable".to_string());
        assert_eq!(
            err.to_string(),
            "Document retrieval failed: qdrant unreachable"
        );

        let err = AppError::NonConvergence(150);
        assert!(err.to_string().contains("step limit of 150"));
    }

    #[test]
    fn test_with_stage_tags_pipeline_errors_only() {
        let tagged =
            AppError::Generation("model timeout".to_string()).with_stage("policy_generator");
        assert_eq!(
            tagged.to_string(),
            "Agent generation failed: policy_generator: model timeout"
        );

        let untouched = AppError::Database("locked".to_string()).with_stage("policy_generator");
        assert_eq!(untouched.to_string(), "Database error: locked");
    }

    #[test]
    fn test_chat_message_serde_shape() {
        let msg = ChatMessage::assistant("", vec![ToolCall {
            id: "call_1".to_string(),
            name: "document_search".to_string(),
            arguments: serde_json::json!({"query": ["fees"]}),
        }])
        .with_name("policy_generator");

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["name"], "policy_generator");
        assert_eq!(value["tool_calls"][0]["name"], "document_search");
        assert!(value.get("tool_call_id").is_none());

        let plain = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert!(plain.get("tool_calls").is_none());
    }

    #[test]
    fn test_tool_result_binds_call_id() {
        let result = serde_json::json!({"passages": []});
        let msg = ChatMessage::tool_result("call_9", &result);
        assert_eq!(msg.role, MessageRole::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_9"));
        assert_eq!(msg.content, result.to_string());
    }
}
