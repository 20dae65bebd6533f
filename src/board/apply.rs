use super::error::IllegalStateError;
use super::{Board, Color, Move, Piece, Square};

impl Board {
    /// Return the position reached by playing `mv`, leaving `self` untouched.
    ///
    /// The descriptor is checked against the board first; a mismatch means
    /// the move did not come from this position.
    pub fn apply(&self, mv: &Move) -> Result<Board, IllegalStateError> {
        let mut next = *self;
        next.make_move(mv)?;
        Ok(next)
    }

    /// In-place form of [`Board::apply`]. On error the board is unchanged.
    pub fn make_move(&mut self, mv: &Move) -> Result<(), IllegalStateError> {
        self.check_descriptor(mv)?;
        self.play_unchecked(mv);
        Ok(())
    }

    fn check_descriptor(&self, mv: &Move) -> Result<(), IllegalStateError> {
        let color = self.side_to_move;
        let (found_color, found_piece) = self
            .piece_at(mv.from)
            .ok_or(IllegalStateError::EmptyOrigin { square: mv.from })?;
        if found_color != color || found_piece != mv.piece {
            return Err(IllegalStateError::WrongPiece {
                square: mv.from,
                expected: color,
                piece: mv.piece,
                found_color,
                found_piece,
            });
        }

        if mv.is_castling() {
            let rook_sq = castling_rook_squares(mv).0;
            if self.piece_at(rook_sq) != Some((color, Piece::Rook)) {
                return Err(IllegalStateError::MissingRook { square: rook_sq });
            }
            return Ok(());
        }

        if mv.is_en_passant() {
            let victim = Square(mv.from.0, mv.to.1);
            if !self.is_empty(mv.to) || self.piece_at(victim) != Some((color.opponent(), Piece::Pawn))
            {
                return Err(IllegalStateError::CaptureMismatch { square: mv.to });
            }
        } else {
            match self.color_on(mv.to) {
                Some(c) if c == color => {
                    return Err(IllegalStateError::OwnPieceCaptured { square: mv.to });
                }
                target if target.is_some() != mv.capture => {
                    return Err(IllegalStateError::CaptureMismatch { square: mv.to });
                }
                _ => {}
            }
        }

        let reaches_last_rank =
            mv.piece == Piece::Pawn && mv.to.rank() == color.pawn_promotion_rank();
        match mv.promotion {
            Some(promo) if !reaches_last_rank || !promo.is_promotion_target() => {
                Err(IllegalStateError::InvalidPromotion { piece: promo })
            }
            None if reaches_last_rank => Err(IllegalStateError::InvalidPromotion {
                piece: Piece::Pawn,
            }),
            _ => Ok(()),
        }
    }

    /// Execute a move taken from this position's move generation.
    pub(crate) fn play_unchecked(&mut self, mv: &Move) {
        let color = self.side_to_move;

        let captured = if mv.is_en_passant() {
            self.clear_square(Square(mv.from.0, mv.to.1))
        } else if mv.is_castling() {
            None
        } else {
            self.clear_square(mv.to)
        };

        self.clear_square(mv.from);
        let placed = mv.promotion.unwrap_or(mv.piece);
        self.set_piece(mv.to, color, placed);

        if mv.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(mv);
            self.clear_square(rook_from);
            self.set_piece(rook_to, color, Piece::Rook);
        }

        self.en_passant_target = None;
        if mv.is_double_pawn_push() {
            let ep_rank = (mv.from.0 + mv.to.0) / 2;
            self.en_passant_target = Some(Square(ep_rank, mv.from.1));
        }

        if mv.piece == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if mv.piece == Piece::King {
            self.castling_rights.remove_color(color);
        }
        self.castling_rights.remove_for_square(mv.from);
        self.castling_rights.remove_for_square(mv.to);

        if color == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.side_to_move = color.opponent();
    }
}

/// Rook origin and destination for a castling move.
fn castling_rook_squares(mv: &Move) -> (Square, Square) {
    let rank = mv.from.0;
    if mv.is_castle_kingside() {
        (Square(rank, 7), Square(rank, 5))
    } else {
        (Square(rank, 0), Square(rank, 3))
    }
}
