//! Client for a remote graph-RAG answering service.
//!
//! The workflow gateway sends generic questions here when an endpoint is
//! configured; graph construction and local search live entirely in that
//! service, this client only exchanges question for answer.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::types::{AppError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct GraphAnswer {
    answer: String,
}

/// Thin HTTP client for the graph-RAG service.
pub struct GraphRagClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GraphRagClient {
    /// Creates a client for the service at `endpoint`.
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("Failed to build graph retrieval client: {e}"))
            })?;
        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }

    /// Sends a question and returns the service's answer.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "question": question }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Graph retrieval request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Retrieval(format!(
                "Graph retrieval service returned {}",
                response.status()
            )));
        }

        let parsed: GraphAnswer = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Invalid graph retrieval response: {e}")))?;

        Ok(parsed.answer)
    }
}
