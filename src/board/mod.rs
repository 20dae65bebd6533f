//! Chess board representation and move notation.
//!
//! A position is a plain 8x8 grid of optional pieces plus the FEN side
//! fields. Move generation works directly on the grid and legality is
//! decided by playing a move on a copy and looking at the mover's king.
//! Supports full chess rules including castling, en passant, and promotions.
//!
//! # Example
//! ```
//! use pgn_fen::board::Board;
//!
//! let board = Board::new();
//! let mv = board.parse_san("e4").unwrap();
//! let next = board.apply(&mv).unwrap();
//! assert_eq!(
//!     next.to_fen(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! ```

mod apply;
mod error;
mod fen;
mod movegen;
mod san;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, IllegalStateError, SanError, SquareError};
pub use fen::{EnPassantMode, STARTING_FEN};
pub use state::Board;
pub use types::{CastlingRights, Color, Move, MoveList, Piece, SpecialMove, Square};

pub(crate) use types::{file_from_char, rank_from_char};
