//! Library entry for tfmini-cli used by integration tests and embedding.

pub mod commands;

// Re-export commands for convenience
pub use commands::*;

/// How readings are written to stdout
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per reading
    #[default]
    Text,
    /// One JSON object per line
    Jsonl,
}
