// Error types for the analysis library.
//
// The binary wraps these in anyhow; the library keeps them typed so callers
// (and tests) can tell an unreadable file from an empty one.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A source document is missing, unreadable, or not valid UTF-8.
    #[error("cannot read document '{document}' at {}: {source}", path.display())]
    FileAccess {
        document: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Several documents failed to load. Reported together so the user can
    /// fix them all in one go.
    #[error("{} documents could not be loaded:\n{}", .0.len(), list_failures(.0))]
    Documents(Vec<AnalysisError>),

    /// Zero tokens after normalization, so rates are undefined.
    #[error("document '{0}' has no words after normalization; cannot compute per-1000-word rates")]
    EmptyDocument(String),

    /// The chart could not be drawn or written.
    #[error("failed to render chart to {}: {message}", path.display())]
    Render { path: PathBuf, message: String },

    /// Bad configuration value (env var, topics file, color).
    #[error("invalid configuration: {0}")]
    Config(String),
}

fn list_failures(errors: &[AnalysisError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
