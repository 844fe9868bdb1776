//! CLI for the policy-crew-server binary.
//!
//! Argument parsing for the server. Flags override what the environment
//! provides; everything else comes from [`crate::utils::Config`].

use clap::Parser;
use std::path::PathBuf;

/// Policy document assistant server.
///
/// Classifies each query as generic or project-specific, answers generic
/// questions straight from the indexed documents, and expands
/// project-specific ones into a report through a multi-agent pipeline.
#[derive(Parser, Debug)]
#[command(
    name = "policy-crew-server",
    version,
    about = "Policy document assistant server",
    long_about = "Policy document assistant server.\n\n\
                  Each query is classified as generic or project-specific. Generic\n\
                  questions are answered directly from the indexed document collection;\n\
                  project-specific ones run through a multi-agent report pipeline, either\n\
                  the sequential crew or the workflow graph depending on the endpoint.",
    after_help = "EXAMPLES:\n    \
                  policy-crew-server                      # Start with settings from .env\n    \
                  policy-crew-server --port 9000          # Override the listen port\n    \
                  policy-crew-server --env-file prod.env  # Use a different environment file"
)]
pub struct Cli {
    /// Host address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the environment file
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
