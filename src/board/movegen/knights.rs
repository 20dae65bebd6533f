use super::super::{Board, Move, MoveList, Piece, Square};

pub(crate) const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

impl Board {
    pub(crate) fn generate_knight_moves(&self, from: Square, moves: &mut MoveList) {
        let color = self.side_to_move;
        for (dr, df) in KNIGHT_OFFSETS {
            let Some(to) = from.offset(dr, df) else {
                continue;
            };
            match self.color_on(to) {
                None => moves.push(Move::new(from, to, Piece::Knight, false)),
                Some(c) if c != color => moves.push(Move::new(from, to, Piece::Knight, true)),
                Some(_) => {}
            }
        }
    }
}
