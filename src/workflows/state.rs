use crate::agents::AgentRole;
use crate::types::{ChatMessage, ToolCall};

/// Sentinel substring a role emits when the team should stop.
pub const FINAL_ANSWER: &str = "FINAL ANSWER";

/// Shared conversation of one workflow run.
///
/// Holds the message transcript plus the role that spoke last; the tool node
/// uses `sender` to hand control back to whichever role requested the call.
/// Each run owns its own state, nothing is shared across requests.
#[derive(Debug, Clone)]
pub struct ConversationState {
    messages: Vec<ChatMessage>,
    sender: Option<AgentRole>,
}

impl ConversationState {
    /// Starts a conversation with the raw query as the only message.
    pub fn new(query: &str) -> Self {
        Self {
            messages: vec![ChatMessage::user(query)],
            sender: None,
        }
    }

    /// Full transcript in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The most recent message, if any.
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// The role that produced the most recent assistant turn.
    pub fn sender(&self) -> Option<AgentRole> {
        self.sender
    }

    /// Appends a role's output and records it as the sender.
    pub fn record_assistant(
        &mut self,
        role: AgentRole,
        content: impl Into<String>,
        tool_calls: Vec<ToolCall>,
    ) {
        self.messages
            .push(ChatMessage::assistant(content, tool_calls).with_name(role.name()));
        self.sender = Some(role);
    }

    /// Appends one tool result bound to the call that produced it.
    pub fn record_tool_result(&mut self, tool_call_id: &str, result: &serde_json::Value) {
        self.messages.push(ChatMessage::tool_result(tool_call_id, result));
    }
}

/// Outcome of routing, evaluated after every role turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// The last turn requested tool invocations.
    CallTool,
    /// Hand over to the next role in the running order.
    Continue,
    /// The last turn carried the final answer.
    Terminate,
}

/// Routes on the most recent message only.
///
/// Tool requests win over the sentinel: a turn that both requests a tool and
/// mentions the sentinel still goes to the tool node first.
pub fn route(state: &ConversationState) -> RouteDecision {
    let Some(last) = state.last_message() else {
        return RouteDecision::Continue;
    };
    if !last.tool_calls.is_empty() {
        return RouteDecision::CallTool;
    }
    if last.content.contains(FINAL_ANSWER) {
        return RouteDecision::Terminate;
    }
    RouteDecision::Continue
}
