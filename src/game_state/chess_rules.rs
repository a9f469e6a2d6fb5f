//! Canonical chess-rule constants and board geometry.
//!
//! Rules are written in terms of files and ranks; `Orientation` maps them to
//! the `(row, col)` squares stored on the board, so the same rules work when
//! the board is turned around for a human playing Black.

use crate::game_state::chess_types::{CastleSide, Color, PieceKind, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Piece order on the back rank, file a through file h.
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// How files and ranks are laid onto rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Rank 8 on row 0, file a on col 0. White plays up the board.
    #[default]
    WhiteBottom,
    /// Rotated 180 degrees: rank 1 on row 0, file h on col 0.
    BlackBottom,
}

impl Orientation {
    /// Orientation for a human sitting on the given side.
    pub const fn for_human(play_as_black: bool) -> Self {
        if play_as_black {
            Orientation::BlackBottom
        } else {
            Orientation::WhiteBottom
        }
    }

    /// Square for a zero-based `file` (a = 0) and `rank` (rank 1 = 0).
    #[inline]
    pub const fn square(self, file: i8, rank: i8) -> Square {
        match self {
            Orientation::WhiteBottom => Square::new(7 - rank, file),
            Orientation::BlackBottom => Square::new(rank, 7 - file),
        }
    }

    /// Inverse of [`Orientation::square`]: `(file, rank)`, both zero-based.
    #[inline]
    pub const fn file_rank(self, square: Square) -> (i8, i8) {
        match self {
            Orientation::WhiteBottom => (square.col, 7 - square.row),
            Orientation::BlackBottom => (7 - square.col, square.row),
        }
    }

    /// Row delta of a single pawn push for `color`.
    #[inline]
    pub const fn pawn_step(self, color: Color) -> i8 {
        match (self, color) {
            (Orientation::WhiteBottom, Color::White) | (Orientation::BlackBottom, Color::Black) => -1,
            (Orientation::WhiteBottom, Color::Black) | (Orientation::BlackBottom, Color::White) => 1,
        }
    }

    /// Row holding `color`'s pawns before they move.
    #[inline]
    pub const fn pawn_start_row(self, color: Color) -> i8 {
        self.square(0, home_rank(color) + pawn_rank_step(color)).row
    }

    /// Row on which `color`'s pawns promote.
    #[inline]
    pub const fn promotion_row(self, color: Color) -> i8 {
        self.square(0, home_rank(color.opposite())).row
    }

    /// Squares involved in castling for `color` on `side`.
    pub const fn castle_path(self, color: Color, side: CastleSide) -> CastlePath {
        let rank = home_rank(color);
        match side {
            CastleSide::Kingside => CastlePath {
                king_from: self.square(4, rank),
                king_to: self.square(6, rank),
                rook_from: self.square(7, rank),
                rook_to: self.square(5, rank),
                between: [Some(self.square(5, rank)), Some(self.square(6, rank)), None],
                king_transit: self.square(5, rank),
            },
            CastleSide::Queenside => CastlePath {
                king_from: self.square(4, rank),
                king_to: self.square(2, rank),
                rook_from: self.square(0, rank),
                rook_to: self.square(3, rank),
                between: [
                    Some(self.square(1, rank)),
                    Some(self.square(2, rank)),
                    Some(self.square(3, rank)),
                ],
                king_transit: self.square(3, rank),
            },
        }
    }
}

/// Zero-based rank of `color`'s back rank.
#[inline]
pub const fn home_rank(color: Color) -> i8 {
    match color {
        Color::White => 0,
        Color::Black => 7,
    }
}

#[inline]
const fn pawn_rank_step(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// King and rook squares for one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlePath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook that must be empty.
    pub between: [Option<Square>; 3],
    /// The square the king crosses on its way to `king_to`.
    pub king_transit: Square,
}

pub const CASTLE_SIDES: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_bottom_matches_display_layout() {
        let o = Orientation::WhiteBottom;
        assert_eq!(o.square(0, 7), Square::new(0, 0)); // a8
        assert_eq!(o.square(4, 0), Square::new(7, 4)); // e1
        assert_eq!(o.pawn_start_row(Color::White), 6);
        assert_eq!(o.pawn_start_row(Color::Black), 1);
        assert_eq!(o.promotion_row(Color::White), 0);
        assert_eq!(o.promotion_row(Color::Black), 7);
        assert_eq!(o.pawn_step(Color::White), -1);
    }

    #[test]
    fn black_bottom_rotates_the_board() {
        let o = Orientation::BlackBottom;
        assert_eq!(o.square(0, 0), Square::new(0, 7)); // a1
        assert_eq!(o.square(4, 7), Square::new(7, 3)); // e8
        assert_eq!(o.pawn_start_row(Color::White), 1);
        assert_eq!(o.promotion_row(Color::White), 7);
        assert_eq!(o.pawn_step(Color::White), 1);
        assert_eq!(o.pawn_step(Color::Black), -1);
    }

    #[test]
    fn file_rank_inverts_square() {
        for o in [Orientation::WhiteBottom, Orientation::BlackBottom] {
            for file in 0..8 {
                for rank in 0..8 {
                    assert_eq!(o.file_rank(o.square(file, rank)), (file, rank));
                }
            }
        }
    }

    #[test]
    fn kingside_castle_path_for_white() {
        let path = Orientation::WhiteBottom.castle_path(Color::White, CastleSide::Kingside);
        assert_eq!(path.king_from, Square::new(7, 4));
        assert_eq!(path.king_to, Square::new(7, 6));
        assert_eq!(path.rook_from, Square::new(7, 7));
        assert_eq!(path.rook_to, Square::new(7, 5));
        assert_eq!(path.king_transit, Square::new(7, 5));
    }
}
