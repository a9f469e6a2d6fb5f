use crate::game_state::chess_types::*;

/// Single undo record for `make_move` / `undo_move`.
///
/// The move itself is kept on the move log; this holds the state that the
/// move cannot reconstruct on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoState {
    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_king_locations: [Square; 2],
    pub prev_status: GameStatus,
}
