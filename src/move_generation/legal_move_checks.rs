//! Attacked-square queries.
//!
//! Works backwards from the target square: a square is attacked by a color
//! when one of its pieces could capture there, ignoring whether that piece
//! is pinned. Pawns attack diagonally only.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_shared::{
    BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    is_square_attacked(game_state, game_state.king_location(color), color.opposite())
}

pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let holds = |sq: Square, kinds: &[PieceKind]| {
        matches!(game_state.piece_at(sq), Some(p) if p.color == attacker_color && kinds.contains(&p.kind))
    };

    // An attacking pawn sits one step behind the square, from its own point of view.
    let pawn_step = game_state.orientation.pawn_step(attacker_color);
    for d_col in [-1i8, 1i8] {
        if let Some(from) = square.offset(-pawn_step, d_col) {
            if holds(from, &[PieceKind::Pawn]) {
                return true;
            }
        }
    }

    let steppers = [
        (&KNIGHT_OFFSETS, PieceKind::Knight),
        (&KING_OFFSETS, PieceKind::King),
    ];
    for (offsets, kind) in steppers {
        for &(d_row, d_col) in offsets.iter() {
            if let Some(from) = square.offset(d_row, d_col) {
                if holds(from, &[kind]) {
                    return true;
                }
            }
        }
    }

    let sliders: [(&[(i8, i8)], [PieceKind; 2]); 2] = [
        (&ROOK_DIRECTIONS, [PieceKind::Rook, PieceKind::Queen]),
        (&BISHOP_DIRECTIONS, [PieceKind::Bishop, PieceKind::Queen]),
    ];
    for (directions, kinds) in sliders {
        for &(d_row, d_col) in directions {
            let mut cursor = square.offset(d_row, d_col);
            while let Some(from) = cursor {
                if game_state.piece_at(from).is_some() {
                    if holds(from, &kinds) {
                        return true;
                    }
                    break;
                }
                cursor = from.offset(d_row, d_col);
            }
        }
    }

    false
}
