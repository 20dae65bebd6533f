use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::FenError;
use super::{file_from_char, rank_from_char, Board, Color, Piece, Square};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// How the en passant field is rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum EnPassantMode {
    /// Print the target after every two-square pawn advance.
    #[default]
    Always,
    /// Print the target only when an en passant capture is legal.
    Legal,
}

impl Board {
    /// Parse a board position from FEN notation.
    ///
    /// The half-move clock and full-move number are optional and default to
    /// 0 and 1. Only the shape of each field and the king count are checked.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }
        if parts.len() > 6 {
            return Err(FenError::TooManyParts { found: parts.len() });
        }

        // Piece placement, rank 8 first
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if file < 8 {
                        board.set_piece(Square(7 - rank_idx, file), color, piece);
                    }
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::WrongFileCount {
                    rank: 8 - rank_idx,
                    files: file,
                });
            }
        }
        for color in Color::BOTH {
            let kings = board.count(color, Piece::King);
            if kings != 1 {
                return Err(FenError::KingCount {
                    color,
                    found: kings,
                });
            }
        }

        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        for c in parts[2].chars() {
            match c {
                'K' => board.castling_rights.set(Color::White, true),
                'Q' => board.castling_rights.set(Color::White, false),
                'k' => board.castling_rights.set(Color::Black, true),
                'q' => board.castling_rights.set(Color::Black, false),
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }

        board.en_passant_target = if parts[3] == "-" {
            None
        } else {
            Some(parse_en_passant(parts[3])?)
        };

        if let Some(clock) = parts.get(4) {
            board.halfmove_clock = parse_counter(clock)?;
        }
        if let Some(number) = parts.get(5) {
            board.fullmove_number = parse_counter(number)?;
        }

        Ok(board)
    }

    /// Canonical FEN with the en passant field as stored.
    #[must_use]
    pub fn to_fen(&self) -> String {
        self.to_fen_with(EnPassantMode::Always)
    }

    /// Canonical FEN, choosing how the en passant field is rendered.
    #[must_use]
    pub fn to_fen_with(&self, mode: EnPassantMode) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                if let Some((color, piece)) = self.piece_at(Square(rank, file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let ep = match (self.en_passant_target, mode) {
            (Some(sq), EnPassantMode::Always) => sq.to_string(),
            (Some(sq), EnPassantMode::Legal) if self.has_legal_en_passant() => sq.to_string(),
            _ => "-".to_string(),
        };

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            self.side_to_move.fen_char(),
            self.castling_rights,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

fn parse_en_passant(field: &str) -> Result<Square, FenError> {
    let invalid = || FenError::InvalidEnPassant {
        found: field.to_string(),
    };
    let chars: Vec<char> = field.chars().collect();
    if chars.len() != 2 || !matches!(chars[1], '3' | '6') {
        return Err(invalid());
    }
    let file = file_from_char(chars[0]).ok_or_else(invalid)?;
    let rank = rank_from_char(chars[1]).ok_or_else(invalid)?;
    Ok(Square(rank, file))
}

fn parse_counter(field: &str) -> Result<u32, FenError> {
    field.parse().map_err(|_| FenError::InvalidCounter {
        found: field.to_string(),
    })
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}
