//! Agent layer: query classification, role agents, and the sequential crew.
//!
//! # Module Structure
//!
//! - [`classifier`](crate::agents::classifier) - Generic vs project-specific routing
//! - [`roles`](crate::agents::roles) - The four personas of the report pipeline
//! - [`crew`](crate::agents::crew) - Fixed sequential pipeline over those personas
//!
//! The graph-based alternative to the crew lives in [`crate::workflows`]; both
//! pipelines speak through the same [`AgentRole`] set so their outputs carry
//! consistent attribution.

pub mod classifier;
pub mod crew;
pub mod roles;

pub use classifier::QueryClassifier;
pub use crew::CrewRunner;
pub use roles::RoleAgent;

/// The four speaking roles of the report pipeline, in running order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    /// Condenses the query into one detail-preserving statement.
    Summarizer,
    /// Drafts the compliance and eligibility section from retrieved passages.
    PolicyGenerator,
    /// Drafts the financing options section from retrieved passages.
    FinanceGenerator,
    /// Merges both sections into the final report.
    ReportGenerator,
}

impl AgentRole {
    /// Stable name used for message attribution and logging.
    pub fn name(&self) -> &'static str {
        match self {
            AgentRole::Summarizer => "summarizer",
            AgentRole::PolicyGenerator => "policy_generator",
            AgentRole::FinanceGenerator => "finance_generator",
            AgentRole::ReportGenerator => "report_generator",
        }
    }

    /// The next role in the fixed running order.
    pub fn successor(&self) -> Option<AgentRole> {
        match self {
            AgentRole::Summarizer => Some(AgentRole::PolicyGenerator),
            AgentRole::PolicyGenerator => Some(AgentRole::FinanceGenerator),
            AgentRole::FinanceGenerator => Some(AgentRole::ReportGenerator),
            AgentRole::ReportGenerator => None,
        }
    }

    /// Whether this role may search the document collection.
    pub fn uses_retrieval(&self) -> bool {
        matches!(
            self,
            AgentRole::PolicyGenerator | AgentRole::FinanceGenerator
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_order_ends_at_the_report() {
        let mut role = AgentRole::Summarizer;
        let mut order = vec![role];
        while let Some(next) = role.successor() {
            role = next;
            order.push(role);
        }
        assert_eq!(
            order,
            [
                AgentRole::Summarizer,
                AgentRole::PolicyGenerator,
                AgentRole::FinanceGenerator,
                AgentRole::ReportGenerator,
            ]
        );
    }

    #[test]
    fn test_only_section_drafters_use_retrieval() {
        assert!(!AgentRole::Summarizer.uses_retrieval());
        assert!(AgentRole::PolicyGenerator.uses_retrieval());
        assert!(AgentRole::FinanceGenerator.uses_retrieval());
        assert!(!AgentRole::ReportGenerator.uses_retrieval());
    }
}
