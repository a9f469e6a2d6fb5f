//! Long algebraic move notation (`e2e4`, `e7e8q`).
//!
//! Parsing never builds moves on its own: the text is matched against the
//! legal moves of the position, so the returned `Move` carries the same
//! capture and special-move data the generator produced.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::chess_move::Move;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn move_to_long_algebraic(mv: &Move, game_state: &GameState) -> String {
    let orientation = game_state.orientation;
    let mut out = String::with_capacity(5);
    out.push_str(&square_to_algebraic(mv.start, orientation));
    out.push_str(&square_to_algebraic(mv.end, orientation));
    if mv.is_pawn_promotion {
        out.push(mv.promotion_kind.promotion_or_queen().symbol());
    }
    out
}

/// Resolves `long_algebraic` against the legal moves of `game_state`.
///
/// A promotion without a suffix promotes to a queen.
pub fn long_algebraic_to_move(long_algebraic: &str, game_state: &mut GameState) -> ChessResult<Move> {
    let malformed = || ChessError::InvalidLongAlgebraic(long_algebraic.to_owned());
    if !long_algebraic.is_ascii() || !(4..=5).contains(&long_algebraic.len()) {
        return Err(malformed());
    }

    let orientation = game_state.orientation;
    let from = algebraic_to_square(&long_algebraic[0..2], orientation).map_err(|_| malformed())?;
    let to = algebraic_to_square(&long_algebraic[2..4], orientation).map_err(|_| malformed())?;
    let promotion = match long_algebraic[4..].chars().next() {
        Some(ch) => Some(char_to_promotion(ch).ok_or_else(malformed)?),
        None => None,
    };

    let found = legal_moves(game_state)
        .into_iter()
        .find(|mv| mv.start == from && mv.end == to)
        .ok_or_else(|| ChessError::IllegalMove(long_algebraic.to_owned()))?;

    match (found.is_pawn_promotion, promotion) {
        (true, Some(kind)) => Ok(found.with_promotion(kind)),
        (true, None) => Ok(found.with_promotion(PieceKind::Queen)),
        (false, None) => Ok(found),
        (false, Some(_)) => Err(malformed()),
    }
}

fn char_to_promotion(ch: char) -> Option<PieceKind> {
    match ch.to_ascii_lowercase() {
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{long_algebraic_to_move, move_to_long_algebraic};
    use crate::errors::ChessError;
    use crate::game_state::chess_rules::Orientation;
    use crate::game_state::chess_types::PieceKind;
    use crate::game_state::game_state::GameState;

    #[test]
    fn long_algebraic_round_trip_simple_move() {
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        let mv = long_algebraic_to_move("e2e4", &mut game).expect("move should parse");
        assert_eq!(move_to_long_algebraic(&mv, &game), "e2e4");
        assert_eq!(mv.piece_moved.kind, PieceKind::Pawn);
    }

    #[test]
    fn long_algebraic_round_trip_promotion() {
        let mut game = GameState::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").expect("FEN should parse");
        let knight = long_algebraic_to_move("a7a8n", &mut game).expect("move should parse");
        assert_eq!(knight.promotion_kind, PieceKind::Knight);
        assert_eq!(move_to_long_algebraic(&knight, &game), "a7a8n");

        let default = long_algebraic_to_move("a7a8", &mut game).expect("move should parse");
        assert_eq!(default.promotion_kind, PieceKind::Queen);
        assert_eq!(move_to_long_algebraic(&default, &game), "a7a8q");
    }

    #[test]
    fn long_algebraic_detects_castling_and_en_passant() {
        let mut castle_state =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let castle = long_algebraic_to_move("e1g1", &mut castle_state).expect("castle should parse");
        assert!(castle.is_castle);

        let mut en_passant_state =
            GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let ep = long_algebraic_to_move("e5d6", &mut en_passant_state).expect("en-passant should parse");
        assert!(ep.is_en_passant);
        assert!(ep.is_capture());
    }

    #[test]
    fn notation_follows_orientation() {
        let mut game = GameState::new_game_oriented(Orientation::BlackBottom);
        let mv = long_algebraic_to_move("g1f3", &mut game).expect("move should parse");
        assert_eq!(mv.start.row, 0);
        assert_eq!(move_to_long_algebraic(&mv, &game), "g1f3");
    }

    #[test]
    fn rejects_bad_and_illegal_moves() {
        let mut game = GameState::new_game();
        for bad in ["", "e2", "e2e4qq", "z2e4", "e2e4k", "g1f3q"] {
            assert!(
                matches!(long_algebraic_to_move(bad, &mut game), Err(ChessError::InvalidLongAlgebraic(_))),
                "{bad:?}"
            );
        }
        assert!(matches!(
            long_algebraic_to_move("e2e5", &mut game),
            Err(ChessError::IllegalMove(_))
        ));
    }
}
