//! Retrieval Augmented Generation (RAG) Pipeline
//!
//! Components for answering generic policy questions straight from the
//! document collection, without going through the agent crew.
//!
//! # Module Structure
//!
//! - [`rag::chunker`](crate::rag::chunker) - Text chunking for document ingestion
//! - [`rag::retriever`](crate::rag::retriever) - Embed the query and search the vector store
//! - [`rag::reranker`](crate::rag::reranker) - Hosted cross-encoder reranking
//! - [`rag::answer`](crate::rag::answer) - Grounded answer generation with citations
//! - [`rag::graph`](crate::rag::graph) - Remote graph-RAG service client
//!
//! # Pipeline
//!
//! 1. **Ingestion** - Pages are chunked, embedded, and upserted
//! 2. **Retrieval** - Query embedded, similar chunks retrieved
//! 3. **Reranking** - Optional hosted reranker reorders the hits
//! 4. **Generation** - LLM answers strictly from the retrieved context

pub mod answer;
pub mod chunker;
pub mod graph;
pub mod reranker;
pub mod retriever;

pub use answer::{RagAnswerer, REFUSAL_NOTICE};
pub use chunker::TextChunker;
pub use graph::GraphRagClient;
pub use reranker::{RerankClient, RerankHit};
pub use retriever::{format_context, DocumentRetriever};
