//! Qdrant-backed vector store.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
        VectorParamsBuilder,
    },
    Qdrant,
};

use super::vectorstore::VectorStore;
use crate::types::{AppError, PassageDocument, PassageHit, Result};

/// Vector store over a running Qdrant server.
pub struct QdrantVectorStore {
    client: Qdrant,
}

impl QdrantVectorStore {
    /// Connects to a Qdrant server at `url` (gRPC port).
    pub fn new(url: &str, api_key: Option<String>) -> Result<Self> {
        let client = if let Some(key) = api_key {
            Qdrant::from_url(url)
                .api_key(key)
                .build()
                .map_err(|e| AppError::Retrieval(format!("Failed to create Qdrant client: {e}")))?
        } else {
            Qdrant::from_url(url)
                .build()
                .map_err(|e| AppError::Retrieval(format!("Failed to create Qdrant client: {e}")))?
        };

        Ok(Self { client })
    }

    fn parse_search_results(
        &self,
        search_result: qdrant_client::qdrant::SearchResponse,
    ) -> Vec<PassageHit> {
        search_result
            .result
            .into_iter()
            .filter_map(|scored_point| {
                let payload = scored_point.payload;
                let content = payload.get("content")?.as_str()?.to_string();
                let source = payload.get("source")?.as_str()?.to_string();
                let page = payload.get("page")?.as_integer()? as u32;

                Some(PassageHit {
                    content,
                    source,
                    page,
                    score: scored_point.score,
                })
            })
            .collect()
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    fn provider_name(&self) -> &'static str {
        "qdrant"
    }

    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        if self.collection_exists(name).await? {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimensions as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to create collection: {e}")))?;

        Ok(())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to list collections: {e}")))?;

        Ok(collections.collections.iter().any(|c| c.name == name))
    }

    async fn upsert(&self, collection: &str, documents: &[PassageDocument]) -> Result<usize> {
        let mut points = Vec::with_capacity(documents.len());

        for document in documents {
            let embedding = document
                .embedding
                .as_ref()
                .ok_or_else(|| AppError::Retrieval("Passage missing embedding".to_string()))?;

            let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
            payload.insert("content".to_string(), document.content.clone().into());
            payload.insert("source".to_string(), document.source.clone().into());
            payload.insert("page".to_string(), i64::from(document.page).into());

            points.push(PointStruct::new(
                document.id.clone(),
                embedding.clone(),
                payload,
            ));
        }

        let count = points.len();
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to upsert points: {e}")))?;

        Ok(count)
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<PassageHit>> {
        let search_builder = SearchPointsBuilder::new(collection, embedding.to_vec(), limit as u64)
            .with_payload(true);

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to search: {e}")))?;

        Ok(self.parse_search_results(search_result))
    }
}
