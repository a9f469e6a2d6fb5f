//! Helpers shared by the per-piece move generators.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::chess_move::Move;

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
pub const KING_OFFSETS: [(i8, i8); 8] = QUEEN_DIRECTIONS;

/// Casts a ray from `from` in each direction, stopping at the first piece.
/// The blocking square is included only when it holds an enemy piece.
pub fn push_sliding_moves(
    game_state: &GameState,
    from: Square,
    piece: Piece,
    directions: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(d_row, d_col) in directions {
        let mut cursor = from.offset(d_row, d_col);
        while let Some(to) = cursor {
            match game_state.piece_at(to) {
                None => out.push(Move::new(from, to, piece, None)),
                Some(target) => {
                    if target.color != piece.color {
                        out.push(Move::new(from, to, piece, Some(target)));
                    }
                    break;
                }
            }
            cursor = to.offset(d_row, d_col);
        }
    }
}

/// Single-step moves to each offset that is on the board and not friendly.
pub fn push_step_moves(
    game_state: &GameState,
    from: Square,
    piece: Piece,
    offsets: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(d_row, d_col) in offsets {
        let Some(to) = from.offset(d_row, d_col) else {
            continue;
        };
        match game_state.piece_at(to) {
            None => out.push(Move::new(from, to, piece, None)),
            Some(target) if target.color != piece.color => {
                out.push(Move::new(from, to, piece, Some(target)))
            }
            Some(_) => {}
        }
    }
}

/// Squares holding pieces of `color` and `kind`, in row-major order.
pub fn squares_with(game_state: &GameState, color: Color, kind: PieceKind) -> Vec<Square> {
    let mut found = Vec::new();
    for row in 0..8 {
        for col in 0..8 {
            let square = Square::new(row, col);
            if game_state.piece_at(square) == Some(Piece::new(color, kind)) {
                found.push(square);
            }
        }
    }
    found
}
