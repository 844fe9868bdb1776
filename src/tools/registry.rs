use crate::types::{AppError, Result, ToolDefinition};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// An action agents can invoke through the tool-calling protocol.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name exposed to the model.
    fn name(&self) -> &str;
    /// Description exposed to the model.
    fn description(&self) -> &str;
    /// JSON Schema of the accepted arguments.
    fn parameters_schema(&self) -> Value;
    /// Runs the tool with already-parsed arguments.
    async fn execute(&self, args: Value) -> Result<Value>;
}

/// Lookup table of the tools agents may call.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool under its own name, replacing any previous entry.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Definitions of every registered tool, ready to bind to a model request.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect()
    }

    /// Names of every registered tool.
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Whether a tool is registered under `name`.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Executes a registered tool.
    ///
    /// An unknown name is a generation failure: the model asked for a tool it
    /// was never offered.
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value> {
        match self.tools.get(name) {
            Some(tool) => tool.execute(args).await,
            None => Err(AppError::Generation(format!(
                "agent requested unknown tool '{name}'"
            ))),
        }
    }
}
