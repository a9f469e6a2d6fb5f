use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_shared::{push_sliding_moves, squares_with, BISHOP_DIRECTIONS};
use crate::moves::chess_move::Move;

pub fn generate_bishop_moves(game_state: &GameState, color: Color, out: &mut Vec<Move>) {
    let bishop = Piece::new(color, PieceKind::Bishop);
    for from in squares_with(game_state, color, PieceKind::Bishop) {
        push_sliding_moves(game_state, from, bishop, &BISHOP_DIRECTIONS, out);
    }
}
