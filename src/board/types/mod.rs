//! Core chess types.
//!
//! - `Piece` and `Color` - chess piece types and colors
//! - `Square` - (rank, file) board square
//! - `Move`, `SpecialMove` and `MoveList` - move descriptors
//! - `CastlingRights` - castling state

mod castling;
mod moves;
mod piece;
mod square;

pub use castling::CastlingRights;
pub use moves::{Move, MoveList, SpecialMove};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use square::{file_from_char, rank_from_char};
