//! # Policy Crew Server
//!
//! HTTP service that answers policy questions over an indexed document
//! collection. Every query is first classified: generic questions are
//! answered directly with retrieval-augmented generation, project-specific
//! ones are expanded into a structured report by a multi-agent pipeline.
//!
//! ## Overview
//!
//! The service exposes two query endpoints with the same contract but
//! different project-specific pipelines:
//!
//! 1. **`POST /process_query/`** - sequential crew: summarizer, policy
//!    drafter, finance drafter, report composer, run in a fixed order
//! 2. **`POST /process_query_langraph/`** - workflow graph: the same roles
//!    driven by a router over a shared conversation, with a tool node that
//!    hands control back to whichever role requested a document search
//!
//! Answered questions are persisted best-effort to a questions log; a failed
//! write never fails the request.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use policy_crew::{api, utils::Config, AppState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::from_config(Config::from_env()?).await?;
//!     let app = api::create_router().with_state(state);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`agents`] - Query classification, role agents, and the sequential crew
//! - [`api`] - REST API handlers and routes
//! - [`db`] - Questions log (libsql) and vector store (Qdrant)
//! - [`llm`] - Chat and embedding clients
//! - [`rag`] - Retrieval, reranking, and grounded answer generation
//! - [`tools`] - Tools agents may call
//! - [`workflows`] - The workflow graph runner
//! - [`types`] - Common types and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Query classification, role agents, and the sequential crew.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface for the server binary.
pub mod cli;
/// Database clients (libsql questions log, Qdrant vector store).
pub mod db;
/// Chat and embedding model clients.
pub mod llm;
/// Retrieval-augmented generation pipeline.
pub mod rag;
/// Tools agents can call.
pub mod tools;
/// Core types (requests, responses, errors).
pub mod types;
/// Environment-driven configuration.
pub mod utils;
/// Workflow graph runner.
pub mod workflows;

// Re-export commonly used types
pub use agents::{AgentRole, CrewRunner, QueryClassifier, RoleAgent};
pub use db::{QdrantVectorStore, TursoClient, VectorStore};
pub use llm::{ChatClient, EmbeddingClient, OpenAIChatClient, OpenAIEmbeddingClient};
pub use rag::{DocumentRetriever, GraphRagClient, RagAnswerer, RerankClient};
pub use tools::{RetrievalTool, ToolRegistry};
pub use types::{AppError, Result};
pub use utils::Config;
pub use workflows::WorkflowRunner;

use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Environment-driven configuration.
    pub config: Arc<Config>,
    /// Questions log client.
    pub turso: Arc<TursoClient>,
    /// Vector store for passage search and ingestion.
    pub store: Arc<dyn VectorStore>,
    /// Embedding client used at ingestion and query time.
    pub embeddings: Arc<dyn EmbeddingClient>,
    /// Generic vs project-specific router.
    pub classifier: Arc<QueryClassifier>,
    /// Direct RAG answerer for generic questions.
    pub answerer: Arc<RagAnswerer>,
    /// Remote graph-RAG client, when configured.
    pub graph_rag: Option<Arc<GraphRagClient>>,
    /// Sequential crew pipeline.
    pub crew: Arc<CrewRunner>,
    /// Workflow graph pipeline.
    pub workflow: Arc<WorkflowRunner>,
}

impl AppState {
    /// Builds the full application state from configuration.
    ///
    /// Connects the questions log, creates the vector store and OpenAI
    /// clients, and wires the classifier, the answerer, and both
    /// project-specific pipelines over one shared tool registry.
    pub async fn from_config(config: Config) -> Result<Self> {
        let turso = Arc::new(TursoClient::from_config(&config.database).await?);

        let store: Arc<dyn VectorStore> = Arc::new(QdrantVectorStore::new(
            &config.qdrant.url,
            config.qdrant.api_key.clone(),
        )?);

        let embeddings: Arc<dyn EmbeddingClient> = Arc::new(OpenAIEmbeddingClient::new(
            &config.llm.api_key,
            config.llm.api_base.as_deref(),
            config.llm.embedding_model.clone(),
            config.llm.embedding_dimensions,
        ));

        // The agent pipelines and the direct answerer use different models;
        // the answerer historically runs on a cheaper one.
        let chat: Arc<dyn ChatClient> = Arc::new(OpenAIChatClient::new(
            &config.llm.api_key,
            config.llm.api_base.as_deref(),
            config.llm.chat_model.clone(),
        ));
        let rag_chat: Arc<dyn ChatClient> = Arc::new(OpenAIChatClient::new(
            &config.llm.api_key,
            config.llm.api_base.as_deref(),
            config.llm.rag_model.clone(),
        ));

        let reranker = match config.rerank.url.as_ref() {
            Some(url) => Some(Arc::new(RerankClient::new(
                url.clone(),
                config.rerank.api_key.clone().unwrap_or_default(),
                config.rerank.model.clone(),
            )?)),
            None => None,
        };

        let retriever = Arc::new(DocumentRetriever::new(
            Arc::clone(&embeddings),
            Arc::clone(&store),
            reranker,
            config.qdrant.collection.clone(),
            config.rerank.top_n,
        ));

        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(RetrievalTool::new(
            Arc::clone(&retriever),
            config.retrieval.tool_top_k,
        )));
        let registry = Arc::new(registry);

        let classifier = Arc::new(QueryClassifier::new(Arc::clone(&chat)));
        let answerer = Arc::new(RagAnswerer::new(
            rag_chat,
            Arc::clone(&retriever),
            config.retrieval.top_k,
        ));

        let graph_rag = match config.graph.url.as_ref() {
            Some(url) => Some(Arc::new(GraphRagClient::new(
                url.clone(),
                config.graph.api_key.clone(),
            )?)),
            None => None,
        };

        let crew = Arc::new(CrewRunner::new(
            Arc::clone(&chat),
            Arc::clone(&registry),
            config.workflow.max_tool_rounds,
        ));
        let workflow = Arc::new(WorkflowRunner::new(
            chat,
            registry,
            config.workflow.step_limit,
        ));

        Ok(Self {
            config: Arc::new(config),
            turso,
            store,
            embeddings,
            classifier,
            answerer,
            graph_rag,
            crew,
            workflow,
        })
    }
}
