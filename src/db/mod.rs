//! Database clients.
//!
//! Two stores back the service:
//! - **Qdrant**: vector store holding embedded policy passages, behind the
//!   [`VectorStore`] trait so tests can swap in an in-memory implementation.
//! - **Turso/SQLite**: relational log of processed questions.

/// Vector store abstraction.
pub mod vectorstore;

/// Qdrant vector store backend.
pub mod qdrant;

/// Relational questions log.
pub mod turso;

pub use qdrant::QdrantVectorStore;
pub use turso::TursoClient;
pub use vectorstore::VectorStore;
