//! Standard Algebraic Notation (SAN) resolution.
//!
//! SAN is the notation used in PGN movetext: "e4", "Nf3", "Bxc6+", "O-O",
//! "e8=Q#". A token only makes sense against a position, so resolving it
//! means finding the single legal move it describes.
//!
//! # Examples
//! ```
//! use pgn_fen::board::Board;
//!
//! let board = Board::new();
//! let mv = board.parse_san("Nf3").unwrap();
//! assert_eq!(mv.to().to_string(), "f3");
//! ```

use log::trace;

use super::error::SanError;
use super::{file_from_char, rank_from_char, Board, Move, MoveList, Piece, Square};

/// The shape of a SAN token, before looking at the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SanShape {
    Castle { kingside: bool },
    Normal(SanMove),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SanMove {
    pub(crate) piece: Piece,
    pub(crate) from_file: Option<usize>,
    pub(crate) from_rank: Option<usize>,
    pub(crate) capture: bool,
    pub(crate) to: Square,
    pub(crate) promotion: Option<Piece>,
}

/// Strip check/mate markers and move-quality glyphs (`+`, `#`, `!`, `?`).
fn strip_suffixes(token: &str) -> &str {
    token.trim_end_matches(['+', '#', '!', '?'])
}

/// Classify a token by its shape. No board is involved.
pub(crate) fn parse_shape(token: &str) -> Result<SanShape, SanError> {
    let san = strip_suffixes(token.trim());
    if san.is_empty() {
        return Err(SanError::malformed(token, "empty move"));
    }

    match san {
        "O-O" | "0-0" => return Ok(SanShape::Castle { kingside: true }),
        "O-O-O" | "0-0-0" => return Ok(SanShape::Castle { kingside: false }),
        _ => {}
    }

    let mut chars: Vec<char> = san.chars().collect();

    // Piece letter, or a pawn when the token starts with a file
    let piece = match chars[0] {
        'a'..='h' => Piece::Pawn,
        c => {
            let piece = Piece::from_san_char(c)
                .ok_or_else(|| SanError::malformed(token, "unknown piece letter"))?;
            chars.remove(0);
            piece
        }
    };

    // Trailing promotion: "=Q", a bare "Q", or either in lowercase
    let mut promotion = None;
    if let Some(&last) = chars.last() {
        if last == '=' {
            return Err(SanError::malformed(token, "promotion piece missing"));
        }
        let after_square = chars.len() >= 2 && matches!(chars[chars.len() - 2], '1'..='8' | '=');
        if last.is_ascii_uppercase() || (last.is_ascii_lowercase() && after_square) {
            let promo = Piece::from_san_char(last.to_ascii_uppercase())
                .filter(|p| p.is_promotion_target())
                .ok_or_else(|| SanError::malformed(token, "invalid promotion piece"))?;
            chars.pop();
            if chars.last() == Some(&'=') {
                chars.pop();
            }
            promotion = Some(promo);
        }
    }

    // Destination is always the last two characters left
    if chars.len() < 2 {
        return Err(SanError::malformed(token, "missing destination square"));
    }
    let rank_char = chars[chars.len() - 1];
    let file_char = chars[chars.len() - 2];
    let to = match (file_from_char(file_char), rank_from_char(rank_char)) {
        (Some(file), Some(rank)) => Square(rank, file),
        _ => return Err(SanError::malformed(token, "destination is not a square")),
    };
    chars.truncate(chars.len() - 2);

    // "x" for captures, or "-" between a full origin and the destination
    let mut capture = false;
    match chars.last() {
        Some('x') => {
            capture = true;
            chars.pop();
        }
        Some('-') => {
            chars.pop();
            if chars.len() != 2 {
                return Err(SanError::malformed(token, "'-' needs a full origin square"));
            }
        }
        _ => {}
    }

    // Whatever is left disambiguates the origin: file, rank, or both
    let (from_file, from_rank) = match chars.as_slice() {
        [] => (None, None),
        [c] => match (file_from_char(*c), rank_from_char(*c)) {
            (Some(file), _) => (Some(file), None),
            (_, Some(rank)) => (None, Some(rank)),
            _ => return Err(SanError::malformed(token, "unexpected character")),
        },
        [f, r] => match (file_from_char(*f), rank_from_char(*r)) {
            (Some(file), Some(rank)) => (Some(file), Some(rank)),
            _ => return Err(SanError::malformed(token, "unexpected character")),
        },
        _ => return Err(SanError::malformed(token, "unexpected character")),
    };

    if piece == Piece::Pawn {
        // A full origin square ("e2e4", "d4xe5") leaves the capture to the board
        if from_rank.is_none() && capture != from_file.is_some() {
            return Err(SanError::malformed(
                token,
                "pawn captures need an origin file and an 'x'",
            ));
        }
    } else if promotion.is_some() {
        return Err(SanError::malformed(token, "only pawns promote"));
    }

    Ok(SanShape::Normal(SanMove {
        piece,
        from_file,
        from_rank,
        capture,
        to,
        promotion,
    }))
}

/// An `x` must land on something. Pawns named by file alone are stricter:
/// a token without `x` is a push and never a capture.
fn capture_marker_fits(parsed: &SanMove, mv: &Move) -> bool {
    if parsed.piece == Piece::Pawn && parsed.from_rank.is_none() {
        mv.is_capture() == parsed.capture
    } else {
        mv.is_capture() || !parsed.capture
    }
}

impl Board {
    /// Resolve a SAN token to the unique legal move it denotes.
    ///
    /// Check (`+`) and mate (`#`) suffixes are accepted and not verified.
    /// Fails with [`SanError::Malformed`] when the token has no SAN shape,
    /// [`SanError::NoMatchingMove`] when no legal move fits and
    /// [`SanError::AmbiguousMove`] when more than one does.
    pub fn parse_san(&self, san: &str) -> Result<Move, SanError> {
        let mv = match parse_shape(san)? {
            SanShape::Castle { kingside } => self.find_castling_move(kingside, san)?,
            SanShape::Normal(parsed) => self.find_san_move(&parsed, san)?,
        };
        trace!("resolved {san} to {mv}");
        Ok(mv)
    }

    /// Resolve a SAN token and play it on the board in one call.
    ///
    /// Returns the resolved move. On error the board is unchanged.
    pub fn make_move_san(&mut self, san: &str) -> Result<Move, SanError> {
        let mv = self.parse_san(san)?;
        self.play_unchecked(&mv);
        Ok(mv)
    }

    fn find_castling_move(&self, kingside: bool, san: &str) -> Result<Move, SanError> {
        let mut moves = MoveList::new();
        if let Some(king_sq) = self.find_king(self.side_to_move) {
            self.generate_king_moves(king_sq, &mut moves);
        }
        moves
            .iter()
            .copied()
            .find(|m| {
                if kingside {
                    m.is_castle_kingside()
                } else {
                    m.is_castle_queenside()
                }
            })
            .filter(|m| self.leaves_king_safe(m))
            .ok_or_else(|| SanError::NoMatchingMove {
                san: san.to_string(),
            })
    }

    fn find_san_move(&self, parsed: &SanMove, san: &str) -> Result<Move, SanError> {
        let color = self.side_to_move;
        if parsed.piece == Piece::Pawn {
            let last_rank = parsed.to.rank() == color.pawn_promotion_rank();
            if last_rank && parsed.promotion.is_none() {
                return Err(SanError::malformed(san, "promotion piece missing"));
            }
            if !last_rank && parsed.promotion.is_some() {
                return Err(SanError::malformed(san, "promotion off the last rank"));
            }
        }

        // Pseudo-legal moves of the named piece onto the destination
        let mut candidates = MoveList::new();
        for from in self.squares_of(color, parsed.piece) {
            if parsed.from_file.is_some_and(|file| from.file() != file)
                || parsed.from_rank.is_some_and(|rank| from.rank() != rank)
            {
                continue;
            }
            self.generate_piece_moves(from, parsed.piece, &mut candidates);
        }
        candidates.retain(|m| {
            m.to() == parsed.to
                && !m.is_castling()
                && m.promotion() == parsed.promotion
                && capture_marker_fits(parsed, m)
        });

        // Full legality last, so pins break ties the way SAN expects
        candidates.retain(|m| self.leaves_king_safe(m));

        match candidates.len() {
            0 => Err(SanError::NoMatchingMove {
                san: san.to_string(),
            }),
            1 => Ok(candidates[0]),
            n => Err(SanError::AmbiguousMove {
                san: san.to_string(),
                candidates: n,
            }),
        }
    }
}
