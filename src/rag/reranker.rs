//! Hosted reranking of retrieved passages.
//!
//! Calls a Cohere-style rerank endpoint: the service posts the query and the
//! candidate passage texts, and gets back indices into the candidate list
//! with relevance scores, best first. The stage is optional; when no endpoint
//! is configured, retrieval returns vector-similarity order.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::types::{AppError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One reranked candidate: its position in the submitted list and the
/// cross-encoder relevance score.
#[derive(Debug, Clone, Deserialize)]
pub struct RerankHit {
    /// Index into the submitted document list.
    pub index: usize,
    /// Relevance of that document to the query; higher is better.
    pub relevance_score: f32,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    results: Vec<RerankHit>,
}

/// Client for a hosted rerank endpoint.
pub struct RerankClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl RerankClient {
    /// Creates a client. `endpoint` is the full URL of the rerank route.
    pub fn new(endpoint: String, api_key: String, model: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("Failed to build rerank HTTP client: {e}"))
            })?;
        Ok(Self {
            http,
            endpoint,
            api_key,
            model,
        })
    }

    /// Reranks `documents` against `query`, returning up to `top_n` results,
    /// most relevant first.
    pub async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RerankHit>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({
            "model": self.model,
            "query": query,
            "documents": documents,
            "top_n": top_n,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Rerank request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Retrieval(format!(
                "Rerank service returned {}",
                response.status()
            )));
        }

        let parsed: RerankResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Invalid rerank response: {e}")))?;

        // Out-of-range indices would panic downstream when mapped back onto
        // the candidate list; drop them here.
        let count = documents.len();
        Ok(parsed
            .results
            .into_iter()
            .filter(|hit| hit.index < count)
            .collect())
    }
}
