use crate::agents::{AgentRole, RoleAgent};
use crate::llm::ChatClient;
use crate::tools::ToolRegistry;
use crate::types::Result;
use std::sync::Arc;

/// Sequential four-stage pipeline for project-specific queries.
///
/// Summarizer condenses the query, the policy and finance agents each draft
/// a section from retrieved passages, and the report agent merges both
/// sections. There is no branching and no retry; a failing stage aborts the
/// run with an error naming that stage.
pub struct CrewRunner {
    summarizer: RoleAgent,
    policy: RoleAgent,
    finance: RoleAgent,
    report: RoleAgent,
}

impl CrewRunner {
    /// Builds the four stage agents over one chat client.
    pub fn new(
        llm: Arc<dyn ChatClient>,
        registry: Arc<ToolRegistry>,
        max_tool_rounds: usize,
    ) -> Self {
        Self {
            summarizer: RoleAgent::new(
                AgentRole::Summarizer,
                Arc::clone(&llm),
                None,
                max_tool_rounds,
            ),
            policy: RoleAgent::new(
                AgentRole::PolicyGenerator,
                Arc::clone(&llm),
                Some(Arc::clone(&registry)),
                max_tool_rounds,
            ),
            finance: RoleAgent::new(
                AgentRole::FinanceGenerator,
                Arc::clone(&llm),
                Some(registry),
                max_tool_rounds,
            ),
            report: RoleAgent::new(AgentRole::ReportGenerator, llm, None, max_tool_rounds),
        }
    }

    /// Runs all four stages in order and returns the report text.
    pub async fn run(&self, query: &str) -> Result<String> {
        tracing::info!("Starting sequential crew run");

        let summary = self.summarizer.run(query).await?;
        tracing::debug!(agent = AgentRole::Summarizer.name(), "Stage complete");

        let policy = self.policy.run(&summary).await?;
        tracing::debug!(agent = AgentRole::PolicyGenerator.name(), "Stage complete");

        let finance = self.finance.run(&summary).await?;
        tracing::debug!(agent = AgentRole::FinanceGenerator.name(), "Stage complete");

        let report_input = format!("Policy findings:\n{policy}\n\nFinancial findings:\n{finance}");
        let report = self.report.run(&report_input).await?;
        tracing::info!(agent = AgentRole::ReportGenerator.name(), "Crew run complete");

        Ok(report)
    }
}
