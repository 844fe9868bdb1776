//! Passage retrieval over the vector store.

use std::sync::Arc;

use futures::future::join_all;

use crate::db::VectorStore;
use crate::llm::EmbeddingClient;
use crate::rag::reranker::RerankClient;
use crate::types::{AppError, PassageHit, Result};

/// Embeds queries, searches the passage collection, and optionally reranks
/// the candidates through a hosted rerank endpoint.
pub struct DocumentRetriever {
    embeddings: Arc<dyn EmbeddingClient>,
    store: Arc<dyn VectorStore>,
    reranker: Option<Arc<RerankClient>>,
    collection: String,
    rerank_top_n: usize,
}

impl DocumentRetriever {
    /// Creates a retriever over `collection`. When `reranker` is present,
    /// search results are reranked and truncated to `rerank_top_n`.
    pub fn new(
        embeddings: Arc<dyn EmbeddingClient>,
        store: Arc<dyn VectorStore>,
        reranker: Option<Arc<RerankClient>>,
        collection: String,
        rerank_top_n: usize,
    ) -> Self {
        Self {
            embeddings,
            store,
            reranker,
            collection,
            rerank_top_n,
        }
    }

    /// The collection this retriever searches.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Retrieves up to `limit` passages for one query, most relevant first.
    pub async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<PassageHit>> {
        let query_text = [query.to_string()];
        let vectors = self.embeddings.embed(&query_text).await?;
        let vector = vectors.into_iter().next().ok_or_else(|| {
            AppError::Retrieval("Embedding service returned no vectors".to_string())
        })?;

        let hits = self.store.search(&self.collection, &vector, limit).await?;
        tracing::debug!(
            query = %query,
            hits = hits.len(),
            store = self.store.provider_name(),
            "Vector search completed"
        );

        match &self.reranker {
            Some(reranker) if !hits.is_empty() => self.rerank(query, hits, reranker).await,
            _ => Ok(hits),
        }
    }

    /// Retrieves passages for several queries concurrently, concatenating
    /// the per-query results in query order.
    pub async fn retrieve_many(&self, queries: &[String], limit: usize) -> Result<Vec<PassageHit>> {
        let results = join_all(queries.iter().map(|query| self.retrieve(query, limit))).await;

        let mut all = Vec::new();
        for result in results {
            all.extend(result?);
        }
        Ok(all)
    }

    async fn rerank(
        &self,
        query: &str,
        hits: Vec<PassageHit>,
        reranker: &RerankClient,
    ) -> Result<Vec<PassageHit>> {
        let documents: Vec<String> = hits.iter().map(|hit| hit.content.clone()).collect();
        let ranked = reranker.rerank(query, &documents, self.rerank_top_n).await?;

        Ok(ranked
            .into_iter()
            .filter_map(|result| {
                hits.get(result.index).map(|hit| PassageHit {
                    score: result.relevance_score,
                    ..hit.clone()
                })
            })
            .collect())
    }
}

/// Renders retrieved passages into the prompt context block, each passage
/// followed by its citation line.
pub fn format_context(hits: &[PassageHit]) -> String {
    hits.iter()
        .map(|hit| {
            format!(
                "{}\nSource: {}, Page: {}",
                hit.content.trim(),
                hit.source,
                hit.page
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
