//! Tools agents can call while drafting their sections.
//!
//! # Module Structure
//!
//! - [`registry`](crate::tools::registry) - Tool registration and dispatch
//! - [`retrieval`](crate::tools::retrieval) - Vector-store passage search
//!
//! Agents never query the vector store directly. They request passages
//! through the tool-calling protocol and the registry dispatches the call,
//! so every tool an agent may use is declared in one place.

pub mod registry;
pub mod retrieval;

pub use registry::{Tool, ToolRegistry};
pub use retrieval::{RetrievalTool, RETRIEVAL_TOOL_NAME};
