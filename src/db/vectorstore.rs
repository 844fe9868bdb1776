//! Vector store abstraction.
//!
//! The service runs against Qdrant in production; the trait exists so the
//! retrieval pipeline can be exercised against an in-memory store in tests.

use async_trait::async_trait;

use crate::types::{PassageDocument, PassageHit, Result};

/// Storage and similarity search for embedded policy passages.
///
/// All failures map to [`crate::types::AppError::Retrieval`]: the vector
/// store only participates in the retrieval path, and its errors surface to
/// clients as retrieval failures.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Backend name, for logs.
    fn provider_name(&self) -> &'static str;

    /// Creates a collection with the given vector width if it does not
    /// already exist. Idempotent.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Whether a collection exists.
    async fn collection_exists(&self, name: &str) -> Result<bool>;

    /// Writes embedded passages into a collection, returning how many were
    /// written. Every document must carry an embedding.
    async fn upsert(&self, collection: &str, documents: &[PassageDocument]) -> Result<usize>;

    /// Returns up to `limit` passages most similar to `embedding`, best first.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<PassageHit>>;
}
