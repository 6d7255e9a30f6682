//! Error types for the command-line tools.

use thiserror::Error;

use battle_core::error::GameError;

/// Errors surfaced by tool commands.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Failure inside the battle core (config, roster, path query).
    #[error(transparent)]
    Game(#[from] GameError),

    /// Output could not be encoded.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Output could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cell argument was not of the form `x,y`.
    #[error("Invalid cell '{input}': {reason}")]
    InvalidCell {
        /// Argument as given.
        input: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result type for tool commands.
pub type Result<T> = std::result::Result<T, ToolError>;
