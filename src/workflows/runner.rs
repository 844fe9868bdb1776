use crate::agents::AgentRole;
use crate::llm::ChatClient;
use crate::tools::{ToolRegistry, RETRIEVAL_TOOL_NAME};
use crate::types::{AppError, ChatMessage, Result};
use crate::workflows::state::{route, ConversationState, RouteDecision, FINAL_ANSWER};
use std::sync::Arc;

/// Graph-based runner for project-specific queries.
///
/// Drives a finite-state machine over the four roles plus a tool node.
/// After every role turn the router inspects only the newest message: tool
/// requests go to the tool node (which hands control back to the sender),
/// the sentinel ends the run, anything else advances to the next role. The
/// report role ends the run regardless of what the router says.
pub struct WorkflowRunner {
    llm: Arc<dyn ChatClient>,
    registry: Arc<ToolRegistry>,
    step_limit: usize,
}

impl WorkflowRunner {
    /// Creates a runner with the given step budget.
    pub fn new(llm: Arc<dyn ChatClient>, registry: Arc<ToolRegistry>, step_limit: usize) -> Self {
        Self {
            llm,
            registry,
            step_limit,
        }
    }

    /// Runs the workflow to termination and returns the final message text.
    ///
    /// Every node execution, role or tool, consumes one step. Exhausting the
    /// budget is reported as non-convergence, never as a partial answer.
    pub async fn run(&self, query: &str) -> Result<String> {
        let mut state = ConversationState::new(query);
        let mut current = AgentRole::Summarizer;
        let mut steps = 0usize;

        loop {
            self.take_step(&mut steps)?;
            self.run_agent(current, &mut state).await?;

            let decision = route(&state);
            tracing::debug!(
                agent = current.name(),
                decision = ?decision,
                steps,
                "Route evaluated"
            );

            // The report row of the transition table maps every outcome to
            // the terminal state.
            if current == AgentRole::ReportGenerator {
                return final_answer(&state);
            }

            match decision {
                RouteDecision::Terminate => return final_answer(&state),
                RouteDecision::Continue => match current.successor() {
                    Some(next) => current = next,
                    None => return final_answer(&state),
                },
                RouteDecision::CallTool => {
                    self.take_step(&mut steps)?;
                    self.run_tools(&mut state).await?;
                    current = state.sender().ok_or_else(|| {
                        AppError::Internal("tool results with no recorded sender".to_string())
                    })?;
                }
            }
        }
    }

    fn take_step(&self, steps: &mut usize) -> Result<()> {
        if *steps >= self.step_limit {
            return Err(AppError::NonConvergence(self.step_limit));
        }
        *steps += 1;
        Ok(())
    }

    async fn run_agent(&self, role: AgentRole, state: &mut ConversationState) -> Result<()> {
        let tools = if role.uses_retrieval() {
            self.registry.definitions()
        } else {
            Vec::new()
        };

        let mut messages = Vec::with_capacity(state.messages().len() + 1);
        messages.push(ChatMessage::system(self.system_prompt(role)));
        messages.extend_from_slice(state.messages());

        let completion = self
            .llm
            .generate_with_tools(&messages, &tools, None)
            .await
            .map_err(|e| e.with_stage(role.name()))?;

        state.record_assistant(role, completion.content, completion.tool_calls);
        Ok(())
    }

    async fn run_tools(&self, state: &mut ConversationState) -> Result<()> {
        let calls = state
            .last_message()
            .map(|m| m.tool_calls.clone())
            .unwrap_or_default();

        for call in calls {
            tracing::debug!(tool = %call.name, call_id = %call.id, "Executing tool call");
            let result = self
                .registry
                .execute(&call.name, call.arguments.clone())
                .await?;
            state.record_tool_result(&call.id, &result);
        }
        Ok(())
    }

    fn system_prompt(&self, role: AgentRole) -> String {
        let tool_names = if role.uses_retrieval() {
            let mut names = self.registry.names();
            names.sort();
            if names.is_empty() {
                "None".to_string()
            } else {
                names.join(", ")
            }
        } else {
            "None".to_string()
        };

        format!(
            "You are a helpful AI assistant, collaborating with other assistants. \
             Use the provided tools to progress towards answering the question. \
             If you are unable to fully answer, that's OK, another assistant with \
             different tools will help where you left off. Execute what you can to \
             make progress. If you or any of the other assistants have the final \
             answer or deliverable, prefix your response with {FINAL_ANSWER} so the \
             team knows to stop. You have access to the following tools: \
             {tool_names}.\n{instruction}",
            instruction = role_instruction(role),
        )
    }
}

fn final_answer(state: &ConversationState) -> Result<String> {
    state
        .last_message()
        .map(|m| m.content.clone())
        .ok_or_else(|| AppError::Internal("workflow conversation is empty".to_string()))
}

fn role_instruction(role: AgentRole) -> String {
    match role {
        AgentRole::Summarizer => "Summarize the user query. You should include all important \
            data like financial figures, dates, etc. Output format should be a list of strings."
            .to_string(),
        AgentRole::PolicyGenerator => format!(
            "You have the following tasks:\n\
             1. Create a single comprehensive question from the summary provided by the \
             summarizer which includes all financial, date, and project-related data.\n\
             2. Prepend 'What are the compliance criteria, eligibility criteria, fees' at the \
             beginning of the question.\n\
             3. Use the question to call the {RETRIEVAL_TOOL_NAME} tool.\n\
             4. Your input to the tool has to be a list of strings.\n\
             5. After receiving the docs from the tool, extract the information related to the \
             input question into a single document having headers and sub-headings.\n\
             Keep in view the following points:\n\
             1. Remember you have to craft the question from the text, not related to the \
             text.\n\
             2. While drafting the document, keep in mind the input question.\n\
             3. Do not finalize the answer or add '{FINAL_ANSWER}' in your response.\n\
             4. Return 'continue' after creating the document so the next agent takes over."
        ),
        AgentRole::FinanceGenerator => format!(
            "You have the following tasks:\n\
             1. Create a single comprehensive question from the summary provided by the \
             summarizer which includes all financial, date, and project-related data.\n\
             2. Prepend 'What are the financing options, subsidies, grants, and incentives \
             available' at the beginning of the question.\n\
             3. Use the question to call the {RETRIEVAL_TOOL_NAME} tool.\n\
             4. Your input to the tool has to be a list of strings.\n\
             5. After receiving the docs from the tool, extract the information related to the \
             input question into a single document having headers and sub-headings.\n\
             Keep in view the following points:\n\
             1. Remember you have to craft the question from the text, not related to the \
             text.\n\
             2. Do not finalize the answer or add '{FINAL_ANSWER}' in your response.\n\
             3. While drafting the document, keep in mind the input question."
        ),
        AgentRole::ReportGenerator => format!(
            "You have the following tasks:\n\
             1. Collect the answers generated by the policy agent and the finance agent.\n\
             2. Read the answers from both agents.\n\
             3. Create a cumulative report from these two agents' responses.\n\
             4. Be detail oriented, genuine, and act as an expert report generator.\n\
             5. Prefix your response with {FINAL_ANSWER} so the team knows to stop."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_drafters_are_told_about_the_search_tool() {
        for role in [AgentRole::PolicyGenerator, AgentRole::FinanceGenerator] {
            let instruction = role_instruction(role);
            assert!(instruction.contains(RETRIEVAL_TOOL_NAME), "role: {role:?}");
            assert!(instruction.contains("list of strings"), "role: {role:?}");
        }
    }

    #[test]
    fn test_only_the_report_is_told_to_emit_the_sentinel() {
        let report = role_instruction(AgentRole::ReportGenerator);
        assert!(report.contains(&format!("Prefix your response with {FINAL_ANSWER}")));

        let hold_off = format!("Do not finalize the answer or add '{FINAL_ANSWER}'");
        for role in [AgentRole::PolicyGenerator, AgentRole::FinanceGenerator] {
            let instruction = role_instruction(role);
            assert!(instruction.contains(&hold_off), "role: {role:?}");
        }
    }
}
