use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_shared::squares_with;
use crate::moves::chess_move::Move;

pub fn generate_pawn_moves(game_state: &GameState, color: Color, out: &mut Vec<Move>) {
    let pawn = Piece::new(color, PieceKind::Pawn);
    let orientation = game_state.orientation;
    let step = orientation.pawn_step(color);
    let start_row = orientation.pawn_start_row(color);
    let promotion_row = orientation.promotion_row(color);

    let push = |from: Square, to: Square, captured: Option<Piece>, out: &mut Vec<Move>| {
        if to.row == promotion_row {
            out.push(Move::promotion(from, to, pawn, captured));
        } else {
            out.push(Move::new(from, to, pawn, captured));
        }
    };

    for from in squares_with(game_state, color, PieceKind::Pawn) {
        if let Some(one) = from.offset(step, 0) {
            if game_state.piece_at(one).is_none() {
                push(from, one, None, out);

                if from.row == start_row {
                    if let Some(two) = one.offset(step, 0) {
                        if game_state.piece_at(two).is_none() {
                            out.push(Move::new(from, two, pawn, None));
                        }
                    }
                }
            }
        }

        // captures and en-passant
        for d_col in [-1i8, 1i8] {
            let Some(to) = from.offset(step, d_col) else {
                continue;
            };
            match game_state.piece_at(to) {
                Some(target) if target.color != color => push(from, to, Some(target), out),
                Some(_) => {}
                None if game_state.en_passant_square == Some(to) => {
                    let captured = Square::new(from.row, to.col);
                    if let Some(victim) = game_state.piece_at(captured) {
                        out.push(Move::en_passant(from, to, pawn, victim));
                    }
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::chess_rules::Orientation;
    use crate::game_state::chess_types::{Color, Square};
    use crate::game_state::game_state::GameState;

    #[test]
    fn start_rank_pawns_push_one_or_two() {
        let game = GameState::new_game();
        let mut out = Vec::new();
        generate_pawn_moves(&game, Color::White, &mut out);
        assert_eq!(out.len(), 16);
        assert!(out.iter().all(|mv| mv.start.row == 6));
    }

    #[test]
    fn blocked_pawn_cannot_double_step() {
        // Knight on e3 blocks e2 entirely.
        let game = GameState::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, Color::White, &mut out);
        assert!(out.is_empty());

        // Piece on e4 only blocks the double step.
        let game = GameState::from_fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, Color::White, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn last_rank_moves_are_flagged_as_promotions() {
        let game = GameState::from_fen("3rk3/4P3/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, Color::White, &mut out);
        // Capture on d8 only: e8 is occupied by the king.
        assert_eq!(out.len(), 1);
        assert!(out[0].is_pawn_promotion);
        assert!(out[0].is_capture());
    }

    #[test]
    fn en_passant_targets_the_passed_over_square() {
        let game = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, Color::White, &mut out);
        let ep = out.iter().find(|mv| mv.is_en_passant).expect("en passant should be generated");
        assert_eq!(ep.end, Square::new(2, 3));
        assert_eq!(ep.capture_square(), Square::new(3, 3));
    }

    #[test]
    fn pawns_advance_up_the_rotated_board() {
        let game = GameState::new_game_oriented(Orientation::BlackBottom);
        let mut out = Vec::new();
        generate_pawn_moves(&game, Color::White, &mut out);
        assert_eq!(out.len(), 16);
        assert!(out.iter().all(|mv| mv.start.row == 1 && mv.end.row > 1));
    }
}
