//! The `Move` value object.
//!
//! Moves are produced by the generator with everything `make_move` needs to
//! apply and later revert them: the captured piece and the special-move
//! flags travel with the move.

use crate::game_state::chess_types::{Piece, PieceKind, Square};

#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub start: Square,
    pub end: Square,
    pub piece_moved: Piece,
    pub piece_captured: Option<Piece>,
    pub is_en_passant: bool,
    pub is_castle: bool,
    pub is_pawn_promotion: bool,
    /// Piece placed on `end` when `is_pawn_promotion` is set.
    pub promotion_kind: PieceKind,
}

impl Move {
    /// An ordinary move or capture.
    pub fn new(start: Square, end: Square, piece_moved: Piece, piece_captured: Option<Piece>) -> Self {
        Self {
            start,
            end,
            piece_moved,
            piece_captured,
            is_en_passant: false,
            is_castle: false,
            is_pawn_promotion: false,
            promotion_kind: PieceKind::Queen,
        }
    }

    pub fn en_passant(start: Square, end: Square, piece_moved: Piece, captured_pawn: Piece) -> Self {
        Self {
            is_en_passant: true,
            ..Self::new(start, end, piece_moved, Some(captured_pawn))
        }
    }

    pub fn castle(start: Square, end: Square, king: Piece) -> Self {
        Self {
            is_castle: true,
            ..Self::new(start, end, king, None)
        }
    }

    pub fn promotion(start: Square, end: Square, pawn: Piece, piece_captured: Option<Piece>) -> Self {
        Self {
            is_pawn_promotion: true,
            ..Self::new(start, end, pawn, piece_captured)
        }
    }

    /// Same move promoting to `kind`. Kings and pawns fall back to a queen.
    pub fn with_promotion(self, kind: PieceKind) -> Self {
        Self {
            promotion_kind: kind.promotion_or_queen(),
            ..self
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.piece_captured.is_some()
    }

    /// Square of the captured piece. Differs from `end` only for en passant.
    #[inline]
    pub fn capture_square(&self) -> Square {
        if self.is_en_passant {
            Square::new(self.start.row, self.end.col)
        } else {
            self.end
        }
    }
}

/// Identity is start, end and moved piece; captures and flags are derived.
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.piece_moved == other.piece_moved
    }
}

impl Eq for Move {}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};

    #[test]
    fn equality_ignores_derived_fields() {
        let pawn = Piece::new(Color::White, PieceKind::Pawn);
        let plain = Move::new(Square::new(1, 0), Square::new(0, 0), pawn, None);
        let promo = Move::promotion(Square::new(1, 0), Square::new(0, 0), pawn, None)
            .with_promotion(PieceKind::Knight);
        assert_eq!(plain, promo);

        let other_piece = Move::new(
            Square::new(1, 0),
            Square::new(0, 0),
            Piece::new(Color::White, PieceKind::Rook),
            None,
        );
        assert_ne!(plain, other_piece);
    }

    #[test]
    fn en_passant_capture_square_is_beside_the_mover() {
        let white = Piece::new(Color::White, PieceKind::Pawn);
        let black = Piece::new(Color::Black, PieceKind::Pawn);
        let mv = Move::en_passant(Square::new(3, 4), Square::new(2, 3), white, black);
        assert_eq!(mv.capture_square(), Square::new(3, 3));
        assert!(mv.is_capture());
    }
}
