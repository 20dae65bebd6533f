//! Error types for board operations.

use thiserror::Error;

use super::{Color, Piece, Square};

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 4)
    #[error("FEN must have at least 4 parts, found {found}")]
    TooFewParts { found: usize },
    /// FEN string has more than the six standard fields
    #[error("FEN must have at most 6 parts, found {found}")]
    TooManyParts { found: usize },
    /// Invalid piece character in position string
    #[error("Invalid piece character '{char}' in FEN")]
    InvalidPiece { char: char },
    /// Invalid castling character
    #[error("Invalid castling character '{char}' in FEN")]
    InvalidCastling { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    #[error("Invalid side to move '{found}', expected 'w' or 'b'")]
    InvalidSideToMove { found: String },
    /// Invalid en passant square
    #[error("Invalid en passant square '{found}'")]
    InvalidEnPassant { found: String },
    /// Placement field does not have exactly 8 ranks
    #[error("Expected 8 ranks in FEN, found {found}")]
    WrongRankCount { found: usize },
    /// A rank does not describe exactly 8 files
    #[error("Rank {rank} describes {files} files, expected 8")]
    WrongFileCount { rank: usize, files: usize },
    /// Half-move clock or full-move number is not a number
    #[error("Invalid move counter '{found}' in FEN")]
    InvalidCounter { found: String },
    /// Each side needs exactly one king
    #[error("{color} must have exactly one king, found {found}")]
    KingCount { color: Color, found: usize },
}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    #[error("Rank {rank} out of bounds (must be 0-7)")]
    RankOutOfBounds { rank: usize },
    /// File out of bounds (must be 0-7)
    #[error("File {file} out of bounds (must be 0-7)")]
    FileOutOfBounds { file: usize },
    /// Invalid algebraic notation
    #[error("Invalid square notation '{notation}'")]
    InvalidNotation { notation: String },
}

/// Error type for SAN (Standard Algebraic Notation) resolution failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    /// The token does not have the shape of any SAN move
    #[error("Malformed move '{token}': {reason}")]
    Malformed { token: String, reason: &'static str },
    /// No legal move matches the token
    #[error("No legal move matches '{san}'")]
    NoMatchingMove { san: String },
    /// More than one legal move matches the token
    #[error("Ambiguous move '{san}' ({candidates} legal candidates)")]
    AmbiguousMove { san: String, candidates: usize },
}

impl SanError {
    pub(crate) fn malformed(token: &str, reason: &'static str) -> Self {
        SanError::Malformed {
            token: token.to_string(),
            reason,
        }
    }
}

/// A move descriptor that does not fit the position it is applied to.
///
/// Resolution only hands out moves taken from the legal move list, so any of
/// these reaching a caller points at a bug in resolution or application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalStateError {
    #[error("No piece on origin square {square}")]
    EmptyOrigin { square: Square },
    #[error("Expected {expected} {piece} on {square}, found {found_color} {found_piece}")]
    WrongPiece {
        square: Square,
        expected: Color,
        piece: Piece,
        found_color: Color,
        found_piece: Piece,
    },
    #[error("Capture flag on {square} does not match the board")]
    CaptureMismatch { square: Square },
    #[error("Cannot capture own piece on {square}")]
    OwnPieceCaptured { square: Square },
    #[error("Castling rook missing from {square}")]
    MissingRook { square: Square },
    #[error("Invalid promotion to {piece}")]
    InvalidPromotion { piece: Piece },
}
