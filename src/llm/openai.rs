//! OpenAI-backed chat and embedding clients.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessage, ChatCompletionTool, ChatCompletionToolChoiceOption,
        ChatCompletionTools, CreateChatCompletionRequestArgs, FunctionCall, FunctionObject,
        ToolChoiceOptions,
    },
    types::embeddings::{CreateEmbeddingRequest, EmbeddingInput},
    Client,
};
use async_trait::async_trait;

use crate::llm::client::{ChatClient, ChatCompletion, EmbeddingClient};
use crate::types::{AppError, ChatMessage, MessageRole, Result, ToolCall, ToolDefinition};

/// Chat client over the OpenAI API (or any OpenAI-compatible endpoint).
pub struct OpenAIChatClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIChatClient {
    /// Creates a client for the given model. `api_base` overrides the
    /// default endpoint for OpenAI-compatible gateways.
    pub fn new(api_key: &str, api_base: Option<&str>, model: impl Into<String>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }

        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }

    async fn request(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        temperature: Option<f32>,
    ) -> Result<ChatCompletion> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model);
        args.messages(to_request_messages(messages)?);
        if let Some(temperature) = temperature {
            args.temperature(temperature);
        }
        if !tools.is_empty() {
            args.tools(to_chat_tools(tools));
            args.tool_choice(ChatCompletionToolChoiceOption::Mode(ToolChoiceOptions::Auto));
        }
        let request = args
            .build()
            .map_err(|e| AppError::Generation(format!("Failed to build chat request: {e}")))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::Generation(format!("OpenAI API error: {e}")))?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AppError::Generation("OpenAI response contained no choices".to_string())
        })?;

        let content = choice.message.content.unwrap_or_default();
        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tool_call| match tool_call {
                ChatCompletionMessageToolCalls::Function(call) => {
                    // Providers occasionally emit arguments that are not valid
                    // JSON; surface an empty object and let the tool reject it.
                    let arguments = serde_json::from_str(&call.function.arguments)
                        .unwrap_or_else(|_| serde_json::json!({}));
                    Some(ToolCall {
                        id: call.id,
                        name: call.function.name,
                        arguments,
                    })
                }
                _ => None,
            })
            .collect();

        Ok(ChatCompletion {
            content,
            tool_calls,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn generate(&self, prompt: &str, temperature: Option<f32>) -> Result<String> {
        let messages = [ChatMessage::user(prompt)];
        let completion = self.request(&messages, &[], temperature).await?;
        Ok(completion.content)
    }

    async fn generate_with_history(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> Result<String> {
        let completion = self.request(messages, &[], temperature).await?;
        Ok(completion.content)
    }

    async fn generate_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        temperature: Option<f32>,
    ) -> Result<ChatCompletion> {
        self.request(messages, tools, temperature).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Embedding client over the OpenAI API.
pub struct OpenAIEmbeddingClient {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbeddingClient {
    /// Creates an embedding client. `dimensions` must match what the model
    /// produces; collections are created with this width.
    pub fn new(
        api_key: &str,
        api_base: Option<&str>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }

        Self {
            client: Client::with_config(config),
            model: model.into(),
            dimensions,
        }
    }
}

#[async_trait]
impl EmbeddingClient for OpenAIEmbeddingClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = CreateEmbeddingRequest {
            model: self.model.clone(),
            input: EmbeddingInput::StringArray(texts.to_vec()),
            ..Default::default()
        };

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| AppError::Retrieval(format!("Embedding request failed: {e}")))?;

        let mut data = response.data;
        data.sort_by_key(|embedding| embedding.index);
        Ok(data.into_iter().map(|embedding| embedding.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn to_request_messages(messages: &[ChatMessage]) -> Result<Vec<ChatCompletionRequestMessage>> {
    messages
        .iter()
        .map(|message| match message.role {
            MessageRole::System => Ok(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage::from(message.content.as_str()),
            )),
            MessageRole::User => Ok(ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage::from(message.content.as_str()),
            )),
            MessageRole::Assistant => {
                let mut args = ChatCompletionRequestAssistantMessageArgs::default();
                if !message.content.is_empty() {
                    args.content(message.content.as_str());
                }
                if let Some(name) = &message.name {
                    args.name(name.as_str());
                }
                if !message.tool_calls.is_empty() {
                    let calls: Vec<ChatCompletionMessageToolCalls> = message
                        .tool_calls
                        .iter()
                        .map(|call| {
                            ChatCompletionMessageToolCalls::Function(
                                ChatCompletionMessageToolCall {
                                    id: call.id.clone(),
                                    function: FunctionCall {
                                        name: call.name.clone(),
                                        arguments: call.arguments.to_string(),
                                    },
                                },
                            )
                        })
                        .collect();
                    args.tool_calls(calls);
                }
                let assistant = args.build().map_err(|e| {
                    AppError::Generation(format!("Failed to build assistant message: {e}"))
                })?;
                Ok(ChatCompletionRequestMessage::Assistant(assistant))
            }
            MessageRole::Tool => {
                let call_id = message.tool_call_id.as_deref().ok_or_else(|| {
                    AppError::Generation("Tool message is missing its call id".to_string())
                })?;
                let tool = ChatCompletionRequestToolMessageArgs::default()
                    .content(message.content.as_str())
                    .tool_call_id(call_id)
                    .build()
                    .map_err(|e| {
                        AppError::Generation(format!("Failed to build tool message: {e}"))
                    })?;
                Ok(ChatCompletionRequestMessage::Tool(tool))
            }
        })
        .collect()
}

fn to_chat_tools(tools: &[ToolDefinition]) -> Vec<ChatCompletionTools> {
    tools
        .iter()
        .map(|tool| {
            ChatCompletionTools::Function(ChatCompletionTool {
                function: FunctionObject {
                    name: tool.name.clone(),
                    description: Some(tool.description.clone()),
                    parameters: Some(tool.parameters.clone()),
                    ..Default::default()
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_converts_every_conversation_role() {
        let result = json!({"passages": []});
        let messages = vec![
            ChatMessage::system("instructions"),
            ChatMessage::user("question"),
            ChatMessage::assistant(
                "",
                vec![ToolCall {
                    id: "call_1".to_string(),
                    name: "document_search".to_string(),
                    arguments: json!({"query": ["fees"]}),
                }],
            )
            .with_name("policy_generator"),
            ChatMessage::tool_result("call_1", &result),
        ];

        let converted = to_request_messages(&messages).unwrap();
        assert_eq!(converted.len(), 4);
        assert!(matches!(
            converted[0],
            ChatCompletionRequestMessage::System(_)
        ));
        assert!(matches!(converted[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(
            converted[2],
            ChatCompletionRequestMessage::Assistant(_)
        ));
        assert!(matches!(converted[3], ChatCompletionRequestMessage::Tool(_)));
    }

    #[test]
    fn test_tool_message_without_call_id_is_rejected() {
        let mut message = ChatMessage::tool_result("call_1", &json!({}));
        message.tool_call_id = None;

        let err = to_request_messages(&[message]).unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[test]
    fn test_tool_definitions_map_to_function_schemas() {
        let tools = vec![ToolDefinition {
            name: "document_search".to_string(),
            description: "Search the document store".to_string(),
            parameters: json!({"type": "object"}),
        }];

        let chat_tools = to_chat_tools(&tools);
        assert_eq!(chat_tools.len(), 1);
        let ChatCompletionTools::Function(tool) = &chat_tools[0] else {
            panic!("expected a function tool");
        };
        assert_eq!(tool.function.name, "document_search");
        assert_eq!(
            tool.function.description.as_deref(),
            Some("Search the document store")
        );
    }

    #[tokio::test]
    async fn test_chat_errors_surface_as_generation_errors() {
        let client = OpenAIChatClient::new("test-key", Some("http://127.0.0.1:1/v1"), "gpt-4o");
        let err = client.generate("hello", None).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[tokio::test]
    async fn test_embedding_errors_surface_as_retrieval_errors() {
        let client = OpenAIEmbeddingClient::new(
            "test-key",
            Some("http://127.0.0.1:1/v1"),
            "text-embedding-ada-002",
            1536,
        );
        let err = client.embed(&["hello".to_string()]).await.unwrap_err();
        assert!(matches!(err, AppError::Retrieval(_)));
    }
}
