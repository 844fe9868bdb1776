//! Environment-backed configuration.
//!
//! Everything is read from process env vars (typically loaded from a `.env`
//! file by the binary). Only `OPENAI_API_KEY` is required; every other knob
//! has a default matching the service's standard deployment.

use std::env;
use std::str::FromStr;

use crate::types::{AppError, Result};

/// Top-level configuration, grouped by concern.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// OpenAI-compatible model settings.
    pub llm: LlmConfig,
    /// Vector store settings.
    pub qdrant: QdrantConfig,
    /// Questions-log database settings.
    pub database: DatabaseConfig,
    /// Optional hosted rerank stage.
    pub rerank: RerankConfig,
    /// Optional remote graph-RAG service.
    pub graph: GraphConfig,
    /// Retrieval and chunking knobs.
    pub retrieval: RetrievalConfig,
    /// Agent pipeline knobs.
    pub workflow: WorkflowConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address. `HOST`, default `127.0.0.1`.
    pub host: String,
    /// Bind port. `PORT`, default `8000`.
    pub port: u16,
}

/// OpenAI-compatible model settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `OPENAI_API_KEY`, required.
    pub api_key: String,
    /// `OPENAI_API_BASE`, for OpenAI-compatible gateways.
    pub api_base: Option<String>,
    /// Model for classification and agent pipelines. `CHAT_MODEL`, default `gpt-4o`.
    pub chat_model: String,
    /// Model for direct RAG answers. `RAG_MODEL`, default `gpt-3.5-turbo`.
    pub rag_model: String,
    /// `EMBEDDING_MODEL`, default `text-embedding-ada-002`.
    pub embedding_model: String,
    /// Embedding vector width. `EMBEDDING_DIMENSIONS`, default `1536`.
    pub embedding_dimensions: usize,
}

/// Vector store settings.
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    /// gRPC endpoint. `QDRANT_URL`, default `http://localhost:6334`.
    pub url: String,
    /// `QDRANT_API_KEY`.
    pub api_key: Option<String>,
    /// Collection holding the policy passages. `QDRANT_COLLECTION`, default `policy-agent`.
    pub collection: String,
}

/// Questions-log database settings. Remote Turso when both `TURSO_URL` and
/// `TURSO_AUTH_TOKEN` are set, a local file otherwise.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `TURSO_URL`.
    pub turso_url: Option<String>,
    /// `TURSO_AUTH_TOKEN`.
    pub turso_auth_token: Option<String>,
    /// Local database file. `DATABASE_PATH`, default `policy_crew.db`.
    pub local_path: String,
}

/// Hosted rerank stage; disabled unless a URL is set.
#[derive(Debug, Clone)]
pub struct RerankConfig {
    /// Full rerank endpoint URL. `RERANK_URL`.
    pub url: Option<String>,
    /// `RERANK_API_KEY`.
    pub api_key: Option<String>,
    /// `RERANK_MODEL`, default `rerank-english-v3.0`.
    pub model: String,
    /// Passages kept after reranking. `RERANK_TOP_N`, default `3`.
    pub top_n: usize,
}

/// Remote graph-RAG service; the workflow gateway falls back to direct RAG
/// when no URL is configured.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// `GRAPH_RAG_URL`.
    pub url: Option<String>,
    /// `GRAPH_RAG_API_KEY`.
    pub api_key: Option<String>,
}

/// Retrieval and chunking knobs.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Passages fetched for direct RAG answers. `RETRIEVAL_TOP_K`, default `5`.
    pub top_k: usize,
    /// Passages fetched per query by the agents' search tool. `TOOL_TOP_K`, default `3`.
    pub tool_top_k: usize,
    /// Chunk window in characters. `CHUNK_SIZE`, default `2000`.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks. `CHUNK_OVERLAP`, default `250`.
    pub chunk_overlap: usize,
}

/// Agent pipeline knobs.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Node executions allowed before the workflow is declared non-convergent.
    /// `WORKFLOW_STEP_LIMIT`, default `150`.
    pub step_limit: usize,
    /// Tool round-trips a crew agent may take per stage. `MAX_TOOL_ROUNDS`, default `3`.
    pub max_tool_rounds: usize,
}

impl Config {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .ok_or_else(|| AppError::Configuration("OPENAI_API_KEY is not set".to_string()))?;

        Ok(Config {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port: parsed(lookup("PORT"), "PORT", 8000)?,
            },
            llm: LlmConfig {
                api_key,
                api_base: lookup("OPENAI_API_BASE"),
                chat_model: lookup("CHAT_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
                rag_model: lookup("RAG_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
                embedding_model: lookup("EMBEDDING_MODEL")
                    .unwrap_or_else(|| "text-embedding-ada-002".to_string()),
                embedding_dimensions: parsed(
                    lookup("EMBEDDING_DIMENSIONS"),
                    "EMBEDDING_DIMENSIONS",
                    1536,
                )?,
            },
            qdrant: QdrantConfig {
                url: lookup("QDRANT_URL").unwrap_or_else(|| "http://localhost:6334".to_string()),
                api_key: lookup("QDRANT_API_KEY"),
                collection: lookup("QDRANT_COLLECTION")
                    .unwrap_or_else(|| "policy-agent".to_string()),
            },
            database: DatabaseConfig {
                turso_url: lookup("TURSO_URL"),
                turso_auth_token: lookup("TURSO_AUTH_TOKEN"),
                local_path: lookup("DATABASE_PATH").unwrap_or_else(|| "policy_crew.db".to_string()),
            },
            rerank: RerankConfig {
                url: lookup("RERANK_URL"),
                api_key: lookup("RERANK_API_KEY"),
                model: lookup("RERANK_MODEL").unwrap_or_else(|| "rerank-english-v3.0".to_string()),
                top_n: parsed(lookup("RERANK_TOP_N"), "RERANK_TOP_N", 3)?,
            },
            graph: GraphConfig {
                url: lookup("GRAPH_RAG_URL"),
                api_key: lookup("GRAPH_RAG_API_KEY"),
            },
            retrieval: RetrievalConfig {
                top_k: parsed(lookup("RETRIEVAL_TOP_K"), "RETRIEVAL_TOP_K", 5)?,
                tool_top_k: parsed(lookup("TOOL_TOP_K"), "TOOL_TOP_K", 3)?,
                chunk_size: parsed(lookup("CHUNK_SIZE"), "CHUNK_SIZE", 2000)?,
                chunk_overlap: parsed(lookup("CHUNK_OVERLAP"), "CHUNK_OVERLAP", 250)?,
            },
            workflow: WorkflowConfig {
                step_limit: parsed(lookup("WORKFLOW_STEP_LIMIT"), "WORKFLOW_STEP_LIMIT", 150)?,
                max_tool_rounds: parsed(lookup("MAX_TOOL_ROUNDS"), "MAX_TOOL_ROUNDS", 3)?,
            },
        })
    }
}

fn parsed<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T> {
    match raw {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| AppError::Configuration(format!("{key} has invalid value '{value}'"))),
        None => Ok(default),
    }
}
