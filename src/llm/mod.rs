//! LLM provider clients and abstractions.
//!
//! The service talks to one OpenAI-compatible provider, but everything above
//! this module depends on the [`ChatClient`] and [`EmbeddingClient`] traits,
//! so agent pipelines and handlers can be driven by scripted clients in tests.

/// Chat and embedding client traits.
pub mod client;
/// OpenAI-backed implementations.
pub mod openai;

pub use client::{ChatClient, ChatCompletion, EmbeddingClient};
pub use openai::{OpenAIChatClient, OpenAIEmbeddingClient};
