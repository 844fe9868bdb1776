use crate::agents::AgentRole;
use crate::llm::ChatClient;
use crate::tools::{ToolRegistry, RETRIEVAL_TOOL_NAME};
use crate::types::{AppError, ChatMessage, Result};
use std::sync::Arc;

/// One persona of the report pipeline, wrapping a chat client with a fixed
/// system instruction and an optional tool registry.
///
/// Retrieval-capable roles run a bounded tool loop: each round sends the
/// conversation so far, executes any requested tool calls, and feeds the
/// results back until the model answers in plain text.
pub struct RoleAgent {
    role: AgentRole,
    llm: Arc<dyn ChatClient>,
    registry: Option<Arc<ToolRegistry>>,
    max_tool_rounds: usize,
}

impl RoleAgent {
    /// Creates an agent for `role`. Pass a registry only for roles that may
    /// search the document collection.
    pub fn new(
        role: AgentRole,
        llm: Arc<dyn ChatClient>,
        registry: Option<Arc<ToolRegistry>>,
        max_tool_rounds: usize,
    ) -> Self {
        Self {
            role,
            llm,
            registry,
            max_tool_rounds,
        }
    }

    /// The role this agent speaks as.
    pub fn role(&self) -> AgentRole {
        self.role
    }

    /// Runs the agent over `input` and returns its final text.
    ///
    /// Errors are tagged with the role name so a pipeline failure names the
    /// stage that raised it.
    pub async fn run(&self, input: &str) -> Result<String> {
        let mut messages = vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(input),
        ];

        let registry = match &self.registry {
            Some(registry) => registry,
            None => {
                return self
                    .llm
                    .generate_with_history(&messages, None)
                    .await
                    .map_err(|e| e.with_stage(self.role.name()));
            }
        };

        let tools = registry.definitions();
        for round in 0..self.max_tool_rounds {
            let completion = self
                .llm
                .generate_with_tools(&messages, &tools, None)
                .await
                .map_err(|e| e.with_stage(self.role.name()))?;

            if completion.tool_calls.is_empty() {
                return Ok(completion.content);
            }

            tracing::debug!(
                agent = self.role.name(),
                round,
                calls = completion.tool_calls.len(),
                "Agent requested tool calls"
            );

            messages.push(
                ChatMessage::assistant(completion.content.clone(), completion.tool_calls.clone())
                    .with_name(self.role.name()),
            );
            for call in &completion.tool_calls {
                let result = registry
                    .execute(&call.name, call.arguments.clone())
                    .await
                    .map_err(|e| e.with_stage(self.role.name()))?;
                messages.push(ChatMessage::tool_result(&call.id, &result));
            }
        }

        Err(AppError::Generation(format!(
            "{}: no final reply after {} tool rounds",
            self.role.name(),
            self.max_tool_rounds
        )))
    }

    /// Persona plus task brief for this role.
    ///
    /// The brief covers the whole stage; the runtime input carries only the
    /// upstream material (the query, a summary, or the drafted sections).
    fn system_prompt(&self) -> String {
        match self.role {
            AgentRole::Summarizer => "You are an expert summarizer who condenses any input into \
                a single statement while keeping every relevant and important detail.\n\n\
                Analyze the project-specific query you are given and summarize it into one \
                statement. The summary must include each and every important financial figure, \
                date, and any other project-related metric. Return a list containing that single \
                summary string."
                .to_string(),
            AgentRole::PolicyGenerator => format!(
                "You are a policy expert who provides detailed and accurate answers to \
                 policy questions.\n\n\
                 Use the summary you are given to extract policy information with the \
                 {RETRIEVAL_TOOL_NAME} tool. Include the summary in your tool input together \
                 with keywords such as compliance standards, eligibility criteria, fees, and \
                 the application review and selection process. Your tool input has to be a \
                 list of strings. From the retrieved passages, produce a detailed document \
                 covering all relevant eligibility criteria, compliance criteria, application \
                 procedure, and fees for the project."
            ),
            AgentRole::FinanceGenerator => format!(
                "You are a financial expert who provides detailed and accurate answers to \
                 finance questions.\n\n\
                 Use the summary you are given to extract financing options with the \
                 {RETRIEVAL_TOOL_NAME} tool. Include the summary in your tool input together \
                 with keywords such as financing options, subsidies, and grants. Your tool \
                 input has to be a list of strings. From the retrieved passages, formulate \
                 all the financial options, subsidies, grants, and their benefits related to \
                 the project."
            ),
            AgentRole::ReportGenerator => "You are a report analyst. Combine the policy \
                findings and the financial findings you are given into one detailed report, \
                structured with proper headings, subheadings, and content."
                .to_string(),
        }
    }
}
