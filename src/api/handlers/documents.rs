//! Document ingestion handler.

use crate::rag::TextChunker;
use crate::types::{AppError, IngestRequest, IngestResponse, PassageDocument, Result};
use crate::AppState;
use axum::{extract::State, Json};
use std::time::Instant;
use uuid::Uuid;

/// Ingest a source document into the vector store.
///
/// Pages are chunked with the configured size and overlap, embedded in one
/// batch, and upserted into the configured collection. The collection is
/// created on first use.
#[utoipa::path(
    post,
    path = "/documents/ingest",
    request_body = IngestRequest,
    responses(
        (status = 200, description = "Document chunked and indexed", body = IngestResponse),
        (status = 400, description = "Missing source name or empty pages"),
        (status = 500, description = "Embedding or vector store failure")
    ),
    tag = "documents"
)]
pub async fn ingest(
    State(state): State<AppState>,
    Json(payload): Json<IngestRequest>,
) -> Result<Json<IngestResponse>> {
    if payload.source.trim().is_empty() {
        return Err(AppError::InvalidInput("Source name required".to_string()));
    }
    if payload.pages.is_empty() {
        return Err(AppError::InvalidInput("At least one page required".to_string()));
    }
    let start = Instant::now();

    let chunker = TextChunker::new(
        state.config.retrieval.chunk_size,
        state.config.retrieval.chunk_overlap,
    );

    let mut documents = Vec::new();
    for page in &payload.pages {
        for chunk in chunker.chunk(&page.content) {
            documents.push(PassageDocument {
                id: Uuid::new_v4().to_string(),
                content: chunk,
                source: payload.source.clone(),
                page: page.page,
                embedding: None,
            });
        }
    }
    if documents.is_empty() {
        return Err(AppError::InvalidInput(
            "Pages contain no text to index".to_string(),
        ));
    }

    let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
    let embeddings = state.embeddings.embed(&texts).await?;
    if embeddings.len() != documents.len() {
        return Err(AppError::Retrieval(format!(
            "Embedding count mismatch: {} texts, {} vectors",
            documents.len(),
            embeddings.len()
        )));
    }
    for (document, embedding) in documents.iter_mut().zip(embeddings) {
        document.embedding = Some(embedding);
    }

    let collection = state.config.qdrant.collection.clone();
    state
        .store
        .create_collection(&collection, state.embeddings.dimensions())
        .await?;
    let chunks_created = state.store.upsert(&collection, &documents).await?;

    tracing::info!(
        collection = %collection,
        source = %payload.source,
        chunks = chunks_created,
        duration_ms = start.elapsed().as_millis() as u64,
        "Ingested document"
    );
    Ok(Json(IngestResponse {
        collection,
        chunks_created,
    }))
}
