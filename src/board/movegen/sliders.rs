use super::super::{Board, Color, Move, MoveList, Piece, Square};

pub(crate) const DIAGONALS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const ORTHOGONALS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Ray directions for a sliding piece, empty for anything else.
pub(crate) fn slider_directions(piece: Piece) -> &'static [(isize, isize)] {
    const QUEEN: [(isize, isize); 8] = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    match piece {
        Piece::Bishop => &DIAGONALS,
        Piece::Rook => &ORTHOGONALS,
        Piece::Queen => &QUEEN,
        _ => &[],
    }
}

impl Board {
    pub(crate) fn generate_sliding_moves(&self, from: Square, piece: Piece, moves: &mut MoveList) {
        let color = self.side_to_move;
        for &(dr, df) in slider_directions(piece) {
            let mut current = from;
            while let Some(to) = current.offset(dr, df) {
                match self.color_on(to) {
                    None => moves.push(Move::new(from, to, piece, false)),
                    Some(c) => {
                        if c != color {
                            moves.push(Move::new(from, to, piece, true));
                        }
                        break;
                    }
                }
                current = to;
            }
        }
    }

    /// First piece met walking from `from` in direction `(dr, df)`.
    pub(crate) fn first_piece_along(
        &self,
        from: Square,
        dr: isize,
        df: isize,
    ) -> Option<(Color, Piece)> {
        let mut current = from;
        while let Some(next) = current.offset(dr, df) {
            if let Some(found) = self.piece_at(next) {
                return Some(found);
            }
            current = next;
        }
        None
    }
}
