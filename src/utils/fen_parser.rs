//! FEN-to-GameState parser.
//!
//! Accepts the four position fields (placement, side to move, castling,
//! en passant) optionally followed by the two move clocks, which default to
//! `0 1`.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::Orientation;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::{GameState, StartClocks};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str, orientation: Orientation) -> ChessResult<GameState> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if !(4..=6).contains(&parts.len()) {
        return Err(invalid(format!("expected 4 to 6 fields, got {}", parts.len())));
    }

    let board = parse_board(parts[0], orientation)?;
    let side_to_move = parse_side_to_move(parts[1])?;
    let castling_rights = parse_castling_rights(parts[2])?;
    let en_passant_square = parse_en_passant_square(parts[3], orientation)?;
    let mut start_clocks = StartClocks::default();
    if let Some(halfmove) = parts.get(4) {
        start_clocks.halfmove = parse_clock(halfmove)?;
    }
    if let Some(fullmove) = parts.get(5) {
        start_clocks.fullmove = parse_clock(fullmove)?.max(1);
    }

    GameState::from_parts(
        board,
        side_to_move,
        castling_rights,
        en_passant_square,
        orientation,
        start_clocks,
    )
}

fn parse_clock(clock: &str) -> ChessResult<u32> {
    clock
        .parse::<u32>()
        .map_err(|_| invalid(format!("invalid move clock: {clock}")))
}

#[inline]
fn invalid(message: String) -> ChessError {
    ChessError::InvalidFen(message)
}

fn parse_board(board_part: &str, orientation: Orientation) -> ChessResult<Board> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks".to_owned()));
    }

    let mut board: Board = [[None; 8]; 8];
    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as i8;
        let mut file = 0i8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as i8;
                continue;
            }

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| invalid(format!("invalid piece character '{ch}' in board layout")))?;
            if file >= 8 {
                return Err(invalid("board rank has too many files".to_owned()));
            }

            let square = orientation.square(file, rank);
            board[square.row as usize][square.col as usize] = Some(piece);
            file += 1;
        }

        if file != 8 {
            return Err(invalid(format!("rank '{rank_str}' does not sum to 8 files")));
        }
    }

    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(invalid(format!("invalid side-to-move field: {side_part}"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    let mut rights = CastlingRights::NONE;
    if castling_part == "-" {
        return Ok(rights);
    }

    for ch in castling_part.chars() {
        match ch {
            'K' => rights.set(Color::White, CastleSide::Kingside),
            'Q' => rights.set(Color::White, CastleSide::Queenside),
            'k' => rights.set(Color::Black, CastleSide::Kingside),
            'q' => rights.set(Color::Black, CastleSide::Queenside),
            _ => return Err(invalid(format!("invalid castling rights character: {ch}"))),
        }
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str, orientation: Orientation) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    algebraic_to_square(en_passant_part, orientation)
        .map(Some)
        .map_err(|_| invalid(format!("invalid en-passant square: {en_passant_part}")))
}
