//! Node counting over the legal move tree.
//!
//! Used to validate move generation against published reference counts.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

/// Counts leaf nodes `depth` plies below `game_state`, with a breakdown of
/// the moves that reach them. The state is restored before returning.
pub fn perft(game_state: &mut GameState, depth: u8) -> PerftCounts {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return total;
    }

    for mv in legal_moves(game_state) {
        perft_recurse(game_state, mv, depth, 1, &mut total);
    }
    total
}

/// Leaf count only, without the per-move breakdown.
pub fn perft_nodes(game_state: &mut GameState, depth: u8) -> usize {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(game_state);
    if depth == 1 {
        return moves.len();
    }

    let mut nodes = 0;
    for mv in moves {
        game_state.make_move(mv);
        nodes += perft_nodes(game_state, depth - 1);
        game_state.undo_move();
    }
    nodes
}

fn perft_recurse(
    game_state: &mut GameState,
    mv: Move,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) {
    game_state.make_move(mv);

    if current_depth == search_depth {
        counts.nodes += 1;
        if mv.is_capture() {
            counts.captures += 1;
        }
        if mv.is_en_passant {
            counts.en_passant += 1;
        }
        if mv.is_castle {
            counts.castles += 1;
        }
        if mv.is_pawn_promotion {
            counts.promotions += 1;
        }
        if is_king_in_check(game_state, game_state.side_to_move) {
            counts.checks += 1;
            if legal_moves(game_state).is_empty() {
                counts.checkmates += 1;
            }
        }
    } else {
        for child in legal_moves(game_state) {
            perft_recurse(game_state, child, search_depth, current_depth + 1, counts);
        }
    }

    game_state.undo_move();
}

#[cfg(test)]
mod tests {
    use super::{perft, perft_nodes, PerftCounts};
    use crate::game_state::chess_rules::Orientation;
    use crate::game_state::game_state::GameState;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn start_position_counts() {
        let mut game = GameState::new_game();
        assert_eq!(perft_nodes(&mut game, 1), 20);
        assert_eq!(perft_nodes(&mut game, 2), 400);
        assert_eq!(
            perft(&mut game, 3),
            PerftCounts {
                nodes: 8902,
                captures: 34,
                en_passant: 0,
                castles: 0,
                promotions: 0,
                checks: 12,
                checkmates: 0,
            }
        );
        assert_eq!(game, GameState::new_game());
    }

    #[test]
    fn kiwipete_counts() {
        let mut game = GameState::from_fen(KIWIPETE).expect("FEN should parse");
        let one = perft(&mut game, 1);
        assert_eq!(one.nodes, 48);
        assert_eq!(one.captures, 8);
        assert_eq!(one.castles, 2);

        let two = perft(&mut game, 2);
        assert_eq!(two.nodes, 2039);
        assert_eq!(two.captures, 351);
        assert_eq!(two.en_passant, 1);
        assert_eq!(two.castles, 91);
        assert_eq!(two.checks, 3);
    }

    #[test]
    fn endgame_counts_with_en_passant_and_pins() {
        let mut game = GameState::from_fen(ENDGAME).expect("FEN should parse");
        assert_eq!(perft_nodes(&mut game, 1), 14);
        assert_eq!(perft_nodes(&mut game, 2), 191);
        assert_eq!(perft_nodes(&mut game, 3), 2812);
    }

    #[test]
    fn black_bottom_orientation_counts_match() {
        let mut game = GameState::from_fen_oriented(KIWIPETE, Orientation::BlackBottom)
            .expect("FEN should parse");
        assert_eq!(perft_nodes(&mut game, 2), 2039);

        let mut start = GameState::new_game_oriented(Orientation::BlackBottom);
        assert_eq!(perft_nodes(&mut start, 3), 8902);
    }
}
