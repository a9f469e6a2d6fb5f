use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_shared::{push_step_moves, squares_with, KNIGHT_OFFSETS};
use crate::moves::chess_move::Move;

pub fn generate_knight_moves(game_state: &GameState, color: Color, out: &mut Vec<Move>) {
    let knight = Piece::new(color, PieceKind::Knight);
    for from in squares_with(game_state, color, PieceKind::Knight) {
        push_step_moves(game_state, from, knight, &KNIGHT_OFFSETS, out);
    }
}

#[cfg(test)]
mod tests {
    use super::generate_knight_moves;
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_state::GameState;

    #[test]
    fn knight_in_the_centre_has_eight_targets() {
        let game = GameState::from_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_knight_moves(&game, Color::White, &mut out);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn knight_skips_friendly_squares_and_captures_enemies() {
        let game = GameState::from_fen("4k3/8/8/8/8/1p6/2P5/N3K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_knight_moves(&game, Color::White, &mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_capture());
    }
}
