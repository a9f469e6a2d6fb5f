use crate::game_state::chess_rules::CASTLE_SIDES;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::{push_step_moves, KING_OFFSETS};
use crate::moves::chess_move::Move;

pub fn generate_king_moves(game_state: &GameState, color: Color, out: &mut Vec<Move>) {
    let king = Piece::new(color, PieceKind::King);
    let from = game_state.king_location(color);
    push_step_moves(game_state, from, king, &KING_OFFSETS, out);
    generate_castling_moves(game_state, color, out);
}

fn generate_castling_moves(game_state: &GameState, color: Color, out: &mut Vec<Move>) {
    let enemy = color.opposite();
    let king = Piece::new(color, PieceKind::King);
    let rook = Piece::new(color, PieceKind::Rook);

    for side in CASTLE_SIDES {
        if !game_state.castling_rights.has(color, side) {
            continue;
        }
        let path = game_state.orientation.castle_path(color, side);
        if game_state.king_location(color) != path.king_from
            || game_state.piece_at(path.rook_from) != Some(rook)
        {
            continue;
        }
        let clear = path
            .between
            .iter()
            .flatten()
            .all(|sq| game_state.piece_at(*sq).is_none());
        if !clear {
            continue;
        }
        // Cannot castle out of, through, or into check.
        let safe = [path.king_from, path.king_transit, path.king_to]
            .iter()
            .all(|sq| !is_square_attacked(game_state, *sq, enemy));
        if safe {
            out.push(Move::castle(path.king_from, path.king_to, king));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_state::GameState;

    fn castles(fen: &str) -> usize {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mut out = Vec::new();
        generate_king_moves(&game, Color::White, &mut out);
        out.iter().filter(|mv| mv.is_castle).count()
    }

    #[test]
    fn both_castles_available_on_an_empty_back_rank() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"), 2);
    }

    #[test]
    fn no_castling_out_of_check() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/4r3/R3K2R w KQ - 0 1"), 0);
    }

    #[test]
    fn no_castling_through_or_into_attacked_squares() {
        // Rook on f8 covers f1 (transit of the short castle).
        assert_eq!(castles("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1"), 1);
        // Rook on c8 covers c1 (destination of the long castle).
        assert_eq!(castles("2r1k3/8/8/8/8/8/8/R3K2R w KQ - 0 1"), 1);
    }

    #[test]
    fn attacked_b1_does_not_stop_long_castling() {
        assert_eq!(castles("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1"), 2);
    }

    #[test]
    fn lost_rights_or_blockers_prevent_castling() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1"), 0);
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/RN2K1NR w KQ - 0 1"), 0);
    }
}
