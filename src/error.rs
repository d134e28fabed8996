//! Error types for parsing user input and board diagrams.
//!
//! Gameplay never fails: an illegal click is reported as an ignored
//! transition. These errors only come from turning text into engine values.

/// Errors that can occur while parsing engine input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Square text was not of the form `row,col`
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),

    /// Square coordinates outside the 8x8 board
    #[error("square out of bounds: ({row}, {col})")]
    OutOfBounds { row: i64, col: i64 },

    /// Board diagram could not be parsed
    #[error("invalid board diagram: {0}")]
    InvalidDiagram(String),

    /// Diagram places a piece on a light square
    #[error("piece on light square ({row}, {col})")]
    LightSquare { row: usize, col: usize },

    /// Unknown game mode name
    #[error("unknown mode: {0:?} (expected ai or friend)")]
    UnknownMode(String),

    /// Unknown difficulty name
    #[error("unknown difficulty: {0:?} (expected easy, medium or expert)")]
    UnknownDifficulty(String),
}

/// Result type alias for engine parsing operations
pub type EngineResult<T> = Result<T, EngineError>;
