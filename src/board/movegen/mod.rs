mod kings;
mod knights;
mod pawns;
mod sliders;

use super::{Board, Move, MoveList, Piece, Square};

impl Board {
    /// Moves obeying piece movement rules for the side to move, without
    /// checking whether the mover's king is left attacked. Castling is the
    /// exception: its path-not-attacked conditions are checked here.
    pub(crate) fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let color = self.side_to_move;
        for from in Square::all() {
            if let Some((c, piece)) = self.piece_at(from) {
                if c == color {
                    self.generate_piece_moves(from, piece, &mut moves);
                }
            }
        }
        moves
    }

    pub(crate) fn generate_piece_moves(&self, from: Square, piece: Piece, moves: &mut MoveList) {
        match piece {
            Piece::Pawn => self.generate_pawn_moves(from, moves),
            Piece::Knight => self.generate_knight_moves(from, moves),
            Piece::Bishop | Piece::Rook | Piece::Queen => {
                self.generate_sliding_moves(from, piece, moves);
            }
            Piece::King => self.generate_king_moves(from, moves),
        }
    }

    /// Play `mv` on a scratch copy and report whether the mover's king is safe.
    pub(crate) fn leaves_king_safe(&self, mv: &Move) -> bool {
        let color = self.side_to_move;
        let mut scratch = *self;
        scratch.play_unchecked(mv);
        !scratch.is_in_check(color)
    }

    /// All legal moves for the side to move.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = self.generate_pseudo_moves();
        moves.retain(|m| self.leaves_king_safe(m));
        moves
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check(self.side_to_move) && self.legal_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check(self.side_to_move) && self.legal_moves().is_empty()
    }

    /// Whether the recorded en passant target can actually be taken.
    #[must_use]
    pub fn has_legal_en_passant(&self) -> bool {
        self.en_passant_target.is_some() && self.legal_moves().iter().any(|m| m.is_en_passant())
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, Color, Piece, Square};

    #[test]
    fn test_startpos_has_twenty_moves() {
        let board = Board::new();
        assert_eq!(board.legal_moves().len(), 20);
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        // White knight on e2 is pinned by the rook on e8.
        let board: Board = "4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1".parse().unwrap();
        let knight_moves = board
            .legal_moves()
            .iter()
            .filter(|m| m.piece() == Piece::Knight)
            .count();
        assert_eq!(knight_moves, 0);
    }

    #[test]
    fn test_castling_through_attack_is_illegal() {
        // Black rook on f8 covers f1.
        let board: Board = "5rk1/8/8/8/8/8/8/4K2R w K - 0 1".parse().unwrap();
        assert!(!board.legal_moves().iter().any(|m| m.is_castling()));
    }

    #[test]
    fn test_castling_out_of_check_is_illegal() {
        let board: Board = "4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1".parse().unwrap();
        assert!(board.is_in_check(Color::White));
        assert!(!board.legal_moves().iter().any(|m| m.is_castling()));
    }

    #[test]
    fn test_queenside_castle_allows_attacked_b_file() {
        // b1 is attacked but the king never crosses it.
        let board: Board = "1r4k1/8/8/8/8/8/8/R3K3 w Q - 0 1".parse().unwrap();
        assert!(board.legal_moves().iter().any(|m| m.is_castle_queenside()));
    }

    #[test]
    fn test_checkmate_and_stalemate() {
        let mated: Board = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
            .parse()
            .unwrap();
        assert!(mated.is_checkmate());
        assert!(!mated.is_stalemate());

        let stale: Board = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".parse().unwrap();
        assert!(stale.is_stalemate());
        assert!(!stale.is_checkmate());
    }

    #[test]
    fn test_square_attack_by_pawn_direction() {
        let board: Board = "4k3/8/8/8/3p4/8/8/4K3 w - - 0 1".parse().unwrap();
        // Black pawn on d4 attacks c3 and e3, not c5.
        assert!(board.is_square_attacked(Square(2, 2), Color::Black));
        assert!(board.is_square_attacked(Square(2, 4), Color::Black));
        assert!(!board.is_square_attacked(Square(4, 2), Color::Black));
    }

    #[test]
    fn test_en_passant_legality_respects_pins() {
        // Taking en passant would expose the white king on a5 to the rook on h5.
        let board: Board = "8/8/8/KPp4r/8/8/8/7k w - c6 0 2".parse().unwrap();
        assert_eq!(board.en_passant_target(), Some(Square(5, 2)));
        assert!(!board.has_legal_en_passant());
    }
}
