//! Workflow Graph Runner
//!
//! The graph-based alternative to the sequential crew: a finite-state
//! machine over the four [`crate::agents::AgentRole`] states plus a tool
//! node, driven by a router that inspects only the newest message.
//!
//! # Routing
//!
//! After every role turn, [`route`] yields one of three outcomes:
//!
//! - `CallTool` - the turn requested tool invocations; the tool node runs
//!   them and hands control back to the sender
//! - `Terminate` - the turn contains the `FINAL ANSWER` sentinel
//! - `Continue` - advance to the next role in the running order
//!
//! The report role is terminal for every outcome. Runs that exhaust the
//! step budget fail as non-convergence instead of returning partial text.

pub mod runner;
pub mod state;

pub use runner::WorkflowRunner;
pub use state::{route, ConversationState, RouteDecision, FINAL_ANSWER};
