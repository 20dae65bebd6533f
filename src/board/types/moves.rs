//! Move descriptor and move list.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;

/// Moves that do more than lift one piece and drop it elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpecialMove {
    CastleKingside,
    CastleQueenside,
    EnPassant,
}

/// A fully disambiguated move.
///
/// Produced by move generation (and therefore by SAN resolution) against one
/// specific position, and only meaningful for that position.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub(crate) from: Square,
    pub(crate) to: Square,
    pub(crate) piece: Piece,
    pub(crate) capture: bool,
    pub(crate) promotion: Option<Piece>,
    pub(crate) special: Option<SpecialMove>,
}

impl Move {
    /// A plain move or capture of `piece`.
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square, piece: Piece, capture: bool) -> Self {
        Move {
            from,
            to,
            piece,
            capture,
            promotion: None,
            special: None,
        }
    }

    /// A pawn move onto the last rank.
    #[inline]
    #[must_use]
    pub const fn new_promotion(from: Square, to: Square, capture: bool, promo: Piece) -> Self {
        Move {
            from,
            to,
            piece: Piece::Pawn,
            capture,
            promotion: Some(promo),
            special: None,
        }
    }

    /// An en passant capture landing on `to`.
    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            piece: Piece::Pawn,
            capture: true,
            promotion: None,
            special: Some(SpecialMove::EnPassant),
        }
    }

    /// A castling move, described by the king's origin and destination.
    #[inline]
    #[must_use]
    pub const fn castle(from: Square, to: Square, kingside: bool) -> Self {
        Move {
            from,
            to,
            piece: Piece::King,
            capture: false,
            promotion: None,
            special: Some(if kingside {
                SpecialMove::CastleKingside
            } else {
                SpecialMove::CastleQueenside
            }),
        }
    }

    /// Get the source square
    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Get the destination square
    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    /// The piece being moved (a promoting pawn is still a pawn here)
    #[inline]
    #[must_use]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    /// Returns true if this move captures a piece (including en passant)
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        self.capture
    }

    #[inline]
    #[must_use]
    pub const fn special(self) -> Option<SpecialMove> {
        self.special
    }

    /// Returns true if this move is en passant
    #[inline]
    #[must_use]
    pub fn is_en_passant(self) -> bool {
        self.special == Some(SpecialMove::EnPassant)
    }

    /// Returns true if this move is castling (kingside or queenside)
    #[inline]
    #[must_use]
    pub fn is_castling(self) -> bool {
        self.is_castle_kingside() || self.is_castle_queenside()
    }

    /// Returns true if this is kingside castling (O-O)
    #[inline]
    #[must_use]
    pub fn is_castle_kingside(self) -> bool {
        self.special == Some(SpecialMove::CastleKingside)
    }

    /// Returns true if this is queenside castling (O-O-O)
    #[inline]
    #[must_use]
    pub fn is_castle_queenside(self) -> bool {
        self.special == Some(SpecialMove::CastleQueenside)
    }

    /// Returns true if this move is a two-square pawn advance
    #[inline]
    #[must_use]
    pub const fn is_double_pawn_push(self) -> bool {
        matches!(self.piece, Piece::Pawn) && self.from.0.abs_diff(self.to.0) == 2
    }

    /// Get the promotion piece, if this is a promotion move
    #[inline]
    #[must_use]
    pub const fn promotion(self) -> Option<Piece> {
        self.promotion
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {}{}", self.piece, self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, " ={promo}")?;
        }
        if self.capture {
            write!(f, " capture")?;
        }
        match self.special {
            Some(SpecialMove::CastleKingside) => write!(f, " O-O")?,
            Some(SpecialMove::CastleQueenside) => write!(f, " O-O-O")?,
            Some(SpecialMove::EnPassant) => write!(f, " ep")?,
            None => {}
        }
        write!(f, ")")
    }
}

/// Long algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

/// No legal position has more than 218 moves.
pub(crate) const MAX_MOVES: usize = 256;
pub(crate) const EMPTY_MOVE: Move = Move::new(Square(0, 0), Square(0, 0), Piece::Pawn, false);

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub(crate) fn new() -> Self {
        MoveList {
            moves: [EMPTY_MOVE; MAX_MOVES],
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, mv: Move) {
        self.moves[self.len] = mv;
        self.len += 1;
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&Move) -> bool) {
        let mut kept = 0;
        for idx in 0..self.len {
            let mv = self.moves[idx];
            if keep(&mv) {
                self.moves[kept] = mv;
                kept += 1;
            }
        }
        self.len = kept;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.as_slice()[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_castle_flags() {
        let ks = Move::castle(Square(0, 4), Square(0, 6), true);
        assert!(ks.is_castling());
        assert!(ks.is_castle_kingside());
        assert!(!ks.is_castle_queenside());
        assert_eq!(ks.piece(), Piece::King);
        assert!(!ks.is_capture());
    }

    #[test]
    fn test_en_passant_is_capture() {
        let ep = Move::en_passant(Square(4, 4), Square(5, 3));
        assert!(ep.is_capture());
        assert!(ep.is_en_passant());
        assert!(!ep.is_castling());
    }

    #[test]
    fn test_double_push_detection() {
        assert!(Move::new(Square(1, 4), Square(3, 4), Piece::Pawn, false).is_double_pawn_push());
        assert!(!Move::new(Square(1, 4), Square(2, 4), Piece::Pawn, false).is_double_pawn_push());
        assert!(!Move::new(Square(0, 0), Square(2, 0), Piece::Rook, false).is_double_pawn_push());
    }

    #[test]
    fn test_display_long_algebraic() {
        let promo = Move::new_promotion(Square(6, 4), Square(7, 4), false, Piece::Queen);
        assert_eq!(promo.to_string(), "e7e8q");
    }

    #[test]
    fn test_move_list_retain() {
        let mut list = MoveList::new();
        list.push(Move::new(Square(0, 1), Square(2, 2), Piece::Knight, false));
        list.push(Move::new(Square(0, 6), Square(2, 5), Piece::Knight, false));
        list.push(Move::new(Square(1, 4), Square(3, 4), Piece::Pawn, false));
        list.retain(|m| m.piece() == Piece::Knight);
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].from(), Square(0, 6));
    }
}
