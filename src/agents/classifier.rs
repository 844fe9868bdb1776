use crate::llm::ChatClient;
use crate::types::{AppError, ChatMessage, QueryKind, Result};
use std::sync::Arc;

// Classification must be reproducible; sampling noise here would flip
// queries between pipelines.
const CLASSIFIER_TEMPERATURE: f32 = 0.0;

const CLASSIFIER_SYSTEM_PROMPT: &str = "You are a helpful question classification assistant. \
    Classify the user question as either 'generic' or 'project specific'. Use these tips: \
    1. A generic question is a general question related to any topic, e.g. 'What are the \
    financial options available in the docs?'. \
    2. A project specific question is about one specific project and carries its details, \
    e.g. 'Marbury plaza is a detailed retrofit project in California set to begin in april \
    2024 which aims to install solar panels'.";

const CLASSIFIER_EXAMPLE_QUESTION: &str = "As per the following project guide me on the \
    financial options: Al qasim project is a building renovation project starting in the end \
    of december 2024. State some financial options please";

const CLASSIFIER_EXAMPLE_LABEL: &str = "project specific";

/// Routes each query to the direct RAG path or the agent pipelines.
///
/// Only the exact reply `generic` selects the direct path; anything else,
/// including hedged or malformed replies, falls through to project-specific.
pub struct QueryClassifier {
    llm: Arc<dyn ChatClient>,
}

impl QueryClassifier {
    /// Creates a classifier over the given chat client.
    pub fn new(llm: Arc<dyn ChatClient>) -> Self {
        Self { llm }
    }

    /// Classifies `query` with a fixed few-shot prompt.
    pub async fn classify(&self, query: &str) -> Result<QueryKind> {
        let messages = [
            ChatMessage::system(CLASSIFIER_SYSTEM_PROMPT),
            ChatMessage::user(CLASSIFIER_EXAMPLE_QUESTION),
            ChatMessage::assistant(CLASSIFIER_EXAMPLE_LABEL, Vec::new()),
            ChatMessage::user(query),
        ];

        let reply = self
            .llm
            .generate_with_history(&messages, Some(CLASSIFIER_TEMPERATURE))
            .await
            .map_err(|e| match e {
                AppError::Generation(msg) => AppError::Classification(msg),
                other => AppError::Classification(other.to_string()),
            })?;

        let kind = if reply.trim().to_lowercase() == "generic" {
            QueryKind::Generic
        } else {
            QueryKind::ProjectSpecific
        };
        tracing::info!(label = ?kind, reply = %reply.trim(), "Query classified");
        Ok(kind)
    }
}
