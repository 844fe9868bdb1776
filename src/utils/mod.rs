//! Shared utilities.

/// Environment-backed configuration.
pub mod config;

pub use config::Config;
