use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_shared::{push_sliding_moves, squares_with, QUEEN_DIRECTIONS};
use crate::moves::chess_move::Move;

pub fn generate_queen_moves(game_state: &GameState, color: Color, out: &mut Vec<Move>) {
    let queen = Piece::new(color, PieceKind::Queen);
    for from in squares_with(game_state, color, PieceKind::Queen) {
        push_sliding_moves(game_state, from, queen, &QUEEN_DIRECTIONS, out);
    }
}
