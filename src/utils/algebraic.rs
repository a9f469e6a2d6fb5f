//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and board
//! squares. Both directions go through the game's `Orientation`, since the
//! same coordinate lands on different rows and columns when the board is
//! turned around.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::Orientation;
use crate::game_state::chess_types::Square;

/// Convert algebraic notation (for example: "e4") to a board square.
#[inline]
pub fn algebraic_to_square(square: &str, orientation: Orientation) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidSquare(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidSquare(square.to_owned()));
    }

    Ok(orientation.square((file - b'a') as i8, (rank - b'1') as i8))
}

/// Convert an on-board square to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square, orientation: Orientation) -> String {
    let (file, rank) = orientation.file_rank(square);
    let file_char = char::from(b'a' + file as u8);
    let rank_char = char::from(b'1' + rank as u8);
    format!("{file_char}{rank_char}")
}
