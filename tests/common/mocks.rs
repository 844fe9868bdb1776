//! Mock implementations shared by the integration test suites.
//!
//! Provides a scripted chat client, a fixed embedding client, an in-memory
//! vector store, and helpers that assemble a full [`AppState`] over them so
//! handler tests never touch a real model or database.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;

use policy_crew::llm::{ChatClient, ChatCompletion, EmbeddingClient};
use policy_crew::tools::RETRIEVAL_TOOL_NAME;
use policy_crew::types::{
    AppError, ChatMessage, PassageDocument, PassageHit, Result, ToolCall, ToolDefinition,
};
use policy_crew::utils::config::{
    Config, DatabaseConfig, GraphConfig, LlmConfig, QdrantConfig, RerankConfig, RetrievalConfig,
    ServerConfig, WorkflowConfig,
};
use policy_crew::{
    AppState, CrewRunner, DocumentRetriever, GraphRagClient, QueryClassifier, RagAnswerer,
    RetrievalTool, ToolRegistry, TursoClient, VectorStore, WorkflowRunner,
};

// ============= Chat Client Mocks =============

/// One recorded model invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Conversation sent to the model. Single-prompt calls are recorded as
    /// one user message.
    pub messages: Vec<ChatMessage>,
    /// Names of the tools bound to the call.
    pub tool_names: Vec<String>,
    /// Sampling temperature, when the caller pinned one.
    pub temperature: Option<f32>,
}

/// Chat client that replays a fixed script of completions.
///
/// Turns are consumed in order. Once a single turn remains it is replayed
/// forever, so a one-turn script behaves as a fixed-reply client and a
/// trailing tool-call turn can drive loop tests. [`failing_after`] instead
/// consumes every turn and then fails, for mid-pipeline error tests.
///
/// Every invocation is recorded and can be inspected with [`calls`].
///
/// [`failing_after`]: ScriptedChatClient::failing_after
/// [`calls`]: ScriptedChatClient::calls
pub struct ScriptedChatClient {
    turns: Mutex<VecDeque<ChatCompletion>>,
    exhausted_error: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedChatClient {
    /// Creates a client that replays `turns`, repeating the last one.
    pub fn new(turns: Vec<ChatCompletion>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            exhausted_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a client whose every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::failing_after(Vec::new(), message)
    }

    /// Creates a client that replays `turns` once and then fails every
    /// further call with `message`.
    pub fn failing_after(turns: Vec<ChatCompletion>, message: &str) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            exhausted_error: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All invocations recorded so far, in call order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Number of invocations recorded so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    fn record(
        &self,
        messages: Vec<ChatMessage>,
        tools: &[ToolDefinition],
        temperature: Option<f32>,
    ) {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            messages,
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
            temperature,
        });
    }

    fn next_turn(&self) -> Result<ChatCompletion> {
        let mut turns = self.turns.lock().expect("script lock");
        if turns.len() > 1 {
            return Ok(turns.pop_front().unwrap_or_default());
        }
        match &self.exhausted_error {
            Some(message) => match turns.pop_front() {
                Some(turn) => Ok(turn),
                None => Err(AppError::Generation(message.clone())),
            },
            None => Ok(turns.front().cloned().unwrap_or_default()),
        }
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn generate(&self, prompt: &str, temperature: Option<f32>) -> Result<String> {
        self.record(vec![ChatMessage::user(prompt)], &[], temperature);
        Ok(self.next_turn()?.content)
    }

    async fn generate_with_history(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> Result<String> {
        self.record(messages.to_vec(), &[], temperature);
        Ok(self.next_turn()?.content)
    }

    async fn generate_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        temperature: Option<f32>,
    ) -> Result<ChatCompletion> {
        self.record(messages.to_vec(), tools, temperature);
        self.next_turn()
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// A completion that only requests the document search tool.
pub fn search_call(id: &str, queries: &[&str]) -> ChatCompletion {
    ChatCompletion {
        content: String::new(),
        tool_calls: vec![ToolCall {
            id: id.to_string(),
            name: RETRIEVAL_TOOL_NAME.to_string(),
            arguments: serde_json::json!({ "query": queries }),
        }],
    }
}

// ============= Embedding Mock =============

/// Embedding client that returns the same vector for every text.
pub struct FixedEmbeddingClient {
    dimensions: usize,
}

impl FixedEmbeddingClient {
    /// Creates a client producing vectors of the given width.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingClient for FixedEmbeddingClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.1; self.dimensions]).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ============= Vector Store Mock =============

/// In-memory vector store returning a fixed hit list for every search.
///
/// Records collection creations and upserts so ingestion tests can assert
/// what was written without a running Qdrant.
pub struct InMemoryVectorStore {
    hits: Vec<PassageHit>,
    fail_search: bool,
    collections: Mutex<HashSet<String>>,
    upserts: Mutex<Vec<(String, usize)>>,
    searches: Mutex<usize>,
}

impl InMemoryVectorStore {
    /// Creates a store that answers every search with `hits`.
    pub fn new(hits: Vec<PassageHit>) -> Self {
        Self {
            hits,
            fail_search: false,
            collections: Mutex::new(HashSet::new()),
            upserts: Mutex::new(Vec::new()),
            searches: Mutex::new(0),
        }
    }

    /// Creates a store whose searches always fail.
    pub fn failing() -> Self {
        Self {
            fail_search: true,
            ..Self::new(Vec::new())
        }
    }

    /// Recorded upserts as `(collection, document count)` pairs.
    pub fn upserts(&self) -> Vec<(String, usize)> {
        self.upserts.lock().expect("upserts lock").clone()
    }

    /// Names of the collections created so far.
    pub fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .lock()
            .expect("collections lock")
            .iter()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Number of searches served so far.
    pub fn search_count(&self) -> usize {
        *self.searches.lock().expect("searches lock")
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn provider_name(&self) -> &'static str {
        "memory"
    }

    async fn create_collection(&self, name: &str, _dimensions: usize) -> Result<()> {
        self.collections
            .lock()
            .expect("collections lock")
            .insert(name.to_string());
        Ok(())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        Ok(self.collections.lock().expect("collections lock").contains(name))
    }

    async fn upsert(&self, collection: &str, documents: &[PassageDocument]) -> Result<usize> {
        if documents.iter().any(|d| d.embedding.is_none()) {
            return Err(AppError::Retrieval(
                "document upserted without an embedding".to_string(),
            ));
        }
        self.upserts
            .lock()
            .expect("upserts lock")
            .push((collection.to_string(), documents.len()));
        Ok(documents.len())
    }

    async fn search(
        &self,
        _collection: &str,
        _embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<PassageHit>> {
        *self.searches.lock().expect("searches lock") += 1;
        if self.fail_search {
            return Err(AppError::Retrieval("vector search unavailable".to_string()));
        }
        Ok(self.hits.iter().take(limit).cloned().collect())
    }
}

/// Three passages over two source documents, in score order.
pub fn sample_hits() -> Vec<PassageHit> {
    vec![
        PassageHit {
            content: "Renovation grants cover up to 40% of eligible project costs.".to_string(),
            source: "policies/grants.pdf".to_string(),
            page: 4,
            score: 0.92,
        },
        PassageHit {
            content: "Applications are reviewed within thirty business days.".to_string(),
            source: "policies/grants.pdf".to_string(),
            page: 7,
            score: 0.81,
        },
        PassageHit {
            content: "Late submissions incur a 2% processing fee.".to_string(),
            source: "policies/fees.pdf".to_string(),
            page: 2,
            score: 0.74,
        },
    ]
}

// ============= State Helpers =============

/// Configuration with test-sized knobs and no optional services.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        llm: LlmConfig {
            api_key: "sk-test".to_string(),
            api_base: None,
            chat_model: "gpt-4o".to_string(),
            rag_model: "gpt-3.5-turbo".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            embedding_dimensions: 4,
        },
        qdrant: QdrantConfig {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            collection: "policy-agent".to_string(),
        },
        database: DatabaseConfig {
            turso_url: None,
            turso_auth_token: None,
            local_path: ":memory:".to_string(),
        },
        rerank: RerankConfig {
            url: None,
            api_key: None,
            model: "rerank-english-v3.0".to_string(),
            top_n: 3,
        },
        graph: GraphConfig {
            url: None,
            api_key: None,
        },
        retrieval: RetrievalConfig {
            top_k: 5,
            tool_top_k: 3,
            chunk_size: 2000,
            chunk_overlap: 250,
        },
        workflow: WorkflowConfig {
            step_limit: 150,
            max_tool_rounds: 3,
        },
    }
}

/// Assembles an [`AppState`] over mock clients and the given store.
///
/// The classifier, the agent pipelines, and the direct answerer each get
/// their own chat client so tests can script and inspect them independently.
/// The questions log is a fresh in-memory database.
pub async fn build_state(
    classifier_llm: Arc<dyn ChatClient>,
    pipeline_llm: Arc<dyn ChatClient>,
    rag_llm: Arc<dyn ChatClient>,
    store: Arc<dyn VectorStore>,
    graph_rag: Option<Arc<GraphRagClient>>,
) -> AppState {
    let config = Arc::new(test_config());
    let turso = Arc::new(
        TursoClient::new_memory()
            .await
            .expect("in-memory questions log"),
    );
    let embeddings: Arc<dyn EmbeddingClient> =
        Arc::new(FixedEmbeddingClient::new(config.llm.embedding_dimensions));

    let retriever = Arc::new(DocumentRetriever::new(
        Arc::clone(&embeddings),
        Arc::clone(&store),
        None,
        config.qdrant.collection.clone(),
        config.rerank.top_n,
    ));

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(RetrievalTool::new(
        Arc::clone(&retriever),
        config.retrieval.tool_top_k,
    )));
    let registry = Arc::new(registry);

    AppState {
        classifier: Arc::new(QueryClassifier::new(classifier_llm)),
        answerer: Arc::new(RagAnswerer::new(
            rag_llm,
            Arc::clone(&retriever),
            config.retrieval.top_k,
        )),
        crew: Arc::new(CrewRunner::new(
            Arc::clone(&pipeline_llm),
            Arc::clone(&registry),
            config.workflow.max_tool_rounds,
        )),
        workflow: Arc::new(WorkflowRunner::new(
            pipeline_llm,
            registry,
            config.workflow.step_limit,
        )),
        graph_rag,
        config,
        turso,
        store,
        embeddings,
    }
}

/// Builds a test server over the full router and the given state.
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(policy_crew::api::create_router().with_state(state)).expect("test server")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_client_consumes_turns_then_repeats_the_last() {
        let client = ScriptedChatClient::new(vec![
            ChatCompletion::text("first"),
            ChatCompletion::text("second"),
        ]);

        assert_eq!(client.generate("p", None).await.unwrap(), "first");
        assert_eq!(client.generate("p", None).await.unwrap(), "second");
        assert_eq!(client.generate("p", None).await.unwrap(), "second");
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failing_after_exhausts_the_script_then_errors() {
        let client =
            ScriptedChatClient::failing_after(vec![ChatCompletion::text("only")], "backend down");

        assert_eq!(client.generate("p", None).await.unwrap(), "only");
        let err = client.generate("p", None).await.unwrap_err();
        assert!(err.to_string().contains("backend down"));
    }

    #[tokio::test]
    async fn test_failing_store_reports_search_unavailable() {
        let store = InMemoryVectorStore::failing();
        let err = store.search("c", &[0.1], 3).await.unwrap_err();
        assert!(err.to_string().contains("vector search unavailable"));
        assert_eq!(store.search_count(), 1);
    }
}
