use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_shared::{push_sliding_moves, squares_with, ROOK_DIRECTIONS};
use crate::moves::chess_move::Move;

pub fn generate_rook_moves(game_state: &GameState, color: Color, out: &mut Vec<Move>) {
    let rook = Piece::new(color, PieceKind::Rook);
    for from in squares_with(game_state, color, PieceKind::Rook) {
        push_sliding_moves(game_state, from, rook, &ROOK_DIRECTIONS, out);
    }
}
