//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Document ingestion handler.
pub mod documents;
/// Health check handler.
pub mod health;
/// Question history handler.
pub mod questions;
/// Query gateway handlers (crew and workflow endpoints).
pub mod query;
