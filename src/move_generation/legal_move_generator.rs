//! Full legal move generation pipeline.
//!
//! Collects pseudo-legal moves from the per-piece generators, then plays each
//! one on the state, drops it if the mover's king is left attacked, and takes
//! it back.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::moves::chess_move::Move;

/// Moves for `color` that obey piece movement rules, ignoring king safety.
pub fn pseudo_legal_moves_for(game_state: &GameState, color: Color) -> Vec<Move> {
    let mut pseudo = Vec::<Move>::with_capacity(64);
    generate_pawn_moves(game_state, color, &mut pseudo);
    generate_knight_moves(game_state, color, &mut pseudo);
    generate_bishop_moves(game_state, color, &mut pseudo);
    generate_rook_moves(game_state, color, &mut pseudo);
    generate_queen_moves(game_state, color, &mut pseudo);
    generate_king_moves(game_state, color, &mut pseudo);
    pseudo
}

#[inline]
pub fn pseudo_legal_moves(game_state: &GameState) -> Vec<Move> {
    pseudo_legal_moves_for(game_state, game_state.side_to_move)
}

/// Legal moves for the side to move. The state is left exactly as found.
pub fn legal_moves(game_state: &mut GameState) -> Vec<Move> {
    let pseudo = pseudo_legal_moves(game_state);
    retain_king_safe(game_state, pseudo)
}

/// Legal moves `color` would have if it were on move now.
///
/// For the side not on move the en-passant target is ignored, since it
/// belongs to the opponent's reply.
pub fn legal_moves_for(game_state: &mut GameState, color: Color) -> Vec<Move> {
    if color == game_state.side_to_move {
        return legal_moves(game_state);
    }

    let saved_side = game_state.side_to_move;
    let saved_en_passant = game_state.en_passant_square.take();
    game_state.side_to_move = color;

    let pseudo = pseudo_legal_moves_for(game_state, color);
    let legal = retain_king_safe(game_state, pseudo);

    game_state.side_to_move = saved_side;
    game_state.en_passant_square = saved_en_passant;
    legal
}

fn retain_king_safe(game_state: &mut GameState, pseudo: Vec<Move>) -> Vec<Move> {
    let mut legal = Vec::with_capacity(pseudo.len());
    for mv in pseudo {
        let mover = mv.piece_moved.color;
        game_state.make_move(mv);
        let safe = !is_king_in_check(game_state, mover);
        game_state.undo_move();
        if safe {
            legal.push(mv);
        }
    }
    legal
}
