use super::knights::KNIGHT_OFFSETS;
use super::sliders::{DIAGONALS, ORTHOGONALS};
use super::super::{Board, Color, Move, MoveList, Piece, Square};

pub(crate) const KING_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

impl Board {
    pub(crate) fn generate_king_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.side_to_move;
        for (dr, df) in KING_OFFSETS {
            let Some(to) = from.offset(dr, df) else {
                continue;
            };
            match self.color_on(to) {
                None => moves.push(Move::new(from, to, Piece::King, false)),
                Some(c) if c != color => moves.push(Move::new(from, to, Piece::King, true)),
                Some(_) => {}
            }
        }

        let back_rank = color.back_rank();
        if from != Square(back_rank, 4) {
            return;
        }
        let opponent = color.opponent();
        if self.castling_rights.has(color, true)
            && self.is_empty(Square(back_rank, 5))
            && self.is_empty(Square(back_rank, 6))
            && self.piece_at(Square(back_rank, 7)) == Some((color, Piece::Rook))
            && !self.is_square_attacked(from, opponent)
            && !self.is_square_attacked(Square(back_rank, 5), opponent)
            && !self.is_square_attacked(Square(back_rank, 6), opponent)
        {
            moves.push(Move::castle(from, Square(back_rank, 6), true));
        }
        if self.castling_rights.has(color, false)
            && self.is_empty(Square(back_rank, 1))
            && self.is_empty(Square(back_rank, 2))
            && self.is_empty(Square(back_rank, 3))
            && self.piece_at(Square(back_rank, 0)) == Some((color, Piece::Rook))
            && !self.is_square_attacked(from, opponent)
            && !self.is_square_attacked(Square(back_rank, 3), opponent)
            && !self.is_square_attacked(Square(back_rank, 2), opponent)
        {
            moves.push(Move::castle(from, Square(back_rank, 2), false));
        }
    }

    /// Whether any piece of `attacker_color` attacks `square`.
    pub(crate) fn is_square_attacked(&self, square: Square, attacker_color: Color) -> bool {
        // A pawn attacks diagonally forward, so look one rank back from the target.
        let pawn_rank_step = -attacker_color.pawn_direction();
        for df in [-1, 1] {
            if let Some(sq) = square.offset(pawn_rank_step, df) {
                if self.piece_at(sq) == Some((attacker_color, Piece::Pawn)) {
                    return true;
                }
            }
        }

        let hits = |offsets: &[(isize, isize)], piece: Piece| {
            offsets.iter().any(|&(dr, df)| {
                square
                    .offset(dr, df)
                    .is_some_and(|sq| self.piece_at(sq) == Some((attacker_color, piece)))
            })
        };
        if hits(&KNIGHT_OFFSETS, Piece::Knight) || hits(&KING_OFFSETS, Piece::King) {
            return true;
        }

        let slider_hits = |dirs: &[(isize, isize)], piece: Piece| {
            dirs.iter().any(|&(dr, df)| {
                matches!(
                    self.first_piece_along(square, dr, df),
                    Some((c, p)) if c == attacker_color && (p == piece || p == Piece::Queen)
                )
            })
        };
        slider_hits(&ORTHOGONALS, Piece::Rook) || slider_hits(&DIAGONALS, Piece::Bishop)
    }

    /// Whether the king of `color` is attacked. A side without a king is never in check.
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.find_king(color)
            .is_some_and(|king_sq| self.is_square_attacked(king_sq, color.opponent()))
    }
}
