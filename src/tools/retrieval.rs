use crate::rag::DocumentRetriever;
use crate::tools::registry::Tool;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Name under which the passage search tool is exposed to agents.
pub const RETRIEVAL_TOOL_NAME: &str = "document_search";

/// Vector-store passage search exposed through the tool-calling protocol.
///
/// Accepts a list of queries (a bare string is promoted to a one-element
/// list), retrieves the top passages for each, and returns them with their
/// source metadata. Agents never touch the vector store directly.
pub struct RetrievalTool {
    retriever: Arc<DocumentRetriever>,
    top_k: usize,
}

impl RetrievalTool {
    /// Creates the tool around an existing retriever.
    pub fn new(retriever: Arc<DocumentRetriever>, top_k: usize) -> Self {
        Self { retriever, top_k }
    }

    fn parse_queries(args: &Value) -> Result<Vec<String>> {
        match args.get("query") {
            Some(Value::String(query)) => Ok(vec![query.clone()]),
            Some(Value::Array(items)) => {
                let queries: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect();
                if queries.is_empty() {
                    Err(AppError::Generation(
                        "document_search requires at least one query string".to_string(),
                    ))
                } else {
                    Ok(queries)
                }
            }
            _ => Err(AppError::Generation(
                "document_search arguments must carry a 'query' string or list of strings"
                    .to_string(),
            )),
        }
    }
}

#[async_trait]
impl Tool for RetrievalTool {
    fn name(&self) -> &str {
        RETRIEVAL_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Retrieve relevant passages from the indexed policy documents for a list of queries."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "A list of search queries for the document collection"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let queries = Self::parse_queries(&args)?;
        let hits = self.retriever.retrieve_many(&queries, self.top_k).await?;
        tracing::debug!(
            queries = queries.len(),
            passages = hits.len(),
            "Retrieval tool returned passages"
        );
        Ok(json!({ "passages": hits }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_string_is_promoted_to_a_list() {
        let queries = RetrievalTool::parse_queries(&json!({"query": "renovation fees"})).unwrap();
        assert_eq!(queries, vec!["renovation fees".to_string()]);
    }

    #[test]
    fn test_list_of_strings_passes_through() {
        let queries = RetrievalTool::parse_queries(&json!({
            "query": ["compliance criteria", "available subsidies"]
        }))
        .unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1], "available subsidies");
    }

    #[test]
    fn test_missing_or_empty_queries_are_rejected() {
        assert!(RetrievalTool::parse_queries(&json!({})).is_err());
        assert!(RetrievalTool::parse_queries(&json!({"query": []})).is_err());
        assert!(RetrievalTool::parse_queries(&json!({"query": 7})).is_err());
    }
}
