//! Error types for the battle core.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all battle core errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// Coordinates outside the board.
    #[error("Cell ({x}, {y}) is outside the {width}x{height} board")]
    OutOfBounds {
        /// Requested x coordinate.
        x: i64,
        /// Requested y coordinate.
        y: i64,
        /// Board width.
        width: u32,
        /// Board height.
        height: u32,
    },

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Failed to read a data file.
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration value outside its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Every cell of the placement zone is already taken.
    #[error("No free cell left in a placement zone of {capacity} cells")]
    PlacementExhausted {
        /// Number of cells in the zone.
        capacity: u32,
    },

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
