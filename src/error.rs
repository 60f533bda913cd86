use crate::moves::Direction;

/// Errors raised while building boards, parsing puzzles or applying moves.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("piece not found: {0}")]
    PieceNotFound(char),

    #[error("illegal move: piece {piece} cannot move {direction}")]
    IllegalMove { piece: char, direction: Direction },

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PuzzleError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        PuzzleError::InvalidConfiguration(message.into())
    }
}
