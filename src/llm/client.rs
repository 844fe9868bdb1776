//! Client traits for chat and embedding models.
//!
//! Handlers and agents depend on these traits rather than on a concrete
//! provider, which keeps the pipelines testable with scripted clients.

use async_trait::async_trait;

use crate::types::{ChatMessage, Result, ToolCall, ToolDefinition};

/// Result of a chat completion: the text, plus any tool invocations the
/// model requested instead of (or alongside) answering.
#[derive(Debug, Clone, Default)]
pub struct ChatCompletion {
    /// Assistant text; empty when the model only requested tools.
    pub content: String,
    /// Tool invocations requested by the model, in request order.
    pub tool_calls: Vec<ToolCall>,
}

impl ChatCompletion {
    /// A completion that is plain text with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }
}

/// Chat-model client.
///
/// `temperature` is `None` for the provider's default sampling; the
/// classifier pins it to `0.0` and the direct RAG answerer to `0.2`.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Completes a single prompt.
    async fn generate(&self, prompt: &str, temperature: Option<f32>) -> Result<String>;

    /// Completes a conversation without tools.
    async fn generate_with_history(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> Result<String>;

    /// Completes a conversation with tools bound; the model may answer or
    /// request tool executions.
    async fn generate_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        temperature: Option<f32>,
    ) -> Result<ChatCompletion>;

    /// Model identifier, for logs.
    fn model_name(&self) -> &str;
}

/// Embedding-model client.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embeds a batch of texts, preserving input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Width of the vectors this client produces.
    fn dimensions(&self) -> usize;
}
