//! Convert chess games in PGN to the FEN of every position they pass through.
//!
//! - [`board`]: position state, legal moves, FEN and SAN resolution
//! - [`replay`]: lazy FEN sequence for one game's SAN tokens
//! - [`pgn`]: splitting PGN text into games and mainline tokens
//! - [`convert`]: batch conversion with per-game failure isolation
//!
//! ```
//! use pgn_fen::convert::{convert_pgn_text_to_fens, ConvertOptions};
//!
//! let fens = convert_pgn_text_to_fens("1. e4 e5 2. Nf3 *", &ConvertOptions::default());
//! assert_eq!(fens.len(), 3);
//! ```

pub mod board;
pub mod convert;
#[cfg(feature = "cli")]
pub mod output;
pub mod pgn;
pub mod replay;

pub use board::{Board, Color, EnPassantMode, Move, Piece, Square};
pub use convert::{convert_pgn_text_to_fens, iterate_games, ConvertOptions};
pub use replay::{replay_game, Replay, ReplayError};
