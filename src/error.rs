use thiserror::Error;

use crate::types::{ChessPiece, Square};

/// Everything that can go wrong inside the rules engine.
///
/// None of these are transient: each one is a violated precondition that the caller has to fix.
/// Lookups that simply find nothing return `None` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("rows must be at least 1")]
    InvalidRows,

    #[error("columns must be at least 1")]
    InvalidColumns,

    #[error("board dimension {0} is larger than the coordinate range")]
    BoundsTooLarge(usize),

    #[error("invalid pieces list size. Expected: {expected}, Actual: {actual}")]
    BoardSizeMismatch { expected: usize, actual: usize },

    #[error("square out of bounds: {0:?}")]
    OutOfBounds(Square),

    #[error("no move to unmake, history is empty")]
    EmptyHistory,

    #[error("no piece at {0}")]
    NoPieceAt(Square),

    #[error("expected {expected:?} at {square}, found {found:?}")]
    PieceMismatch {
        square: Square,
        expected: ChessPiece,
        found: ChessPiece,
    },

    #[error("invalid board notation: {0}")]
    InvalidNotation(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("`{0}` cannot name a custom piece")]
    ReservedSymbol(char),
}

pub type Result<T> = std::result::Result<T, ChessError>;
