//! GameState-to-FEN generation.

use crate::game_state::chess_rules::Orientation;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::square_to_algebraic;

/// Full six-field FEN.
///
/// Both clocks continue from the state's start clocks: the halfmove clock
/// counts moves since the last pawn move or capture in the log, the fullmove
/// number advances with the plies played.
pub fn generate_fen(game_state: &GameState) -> String {
    let log = game_state.move_log();
    let start = game_state.start_clocks();
    let quiet_tail = log
        .iter()
        .rev()
        .take_while(|mv| mv.piece_moved.kind != PieceKind::Pawn && !mv.is_capture())
        .count();
    let halfmove_clock = if quiet_tail == log.len() {
        start.halfmove as usize + quiet_tail
    } else {
        quiet_tail
    };

    let plies = log.len();
    let started_with_black = if plies % 2 == 0 {
        game_state.side_to_move == Color::Black
    } else {
        game_state.side_to_move == Color::White
    };
    let fullmove_number = start.fullmove as usize + (plies + usize::from(started_with_black)) / 2;

    format!(
        "{} {} {}",
        generate_board_string(game_state),
        halfmove_clock,
        fullmove_number
    )
}

/// First four FEN fields: placement, side to move, castling rights and
/// en-passant target. Identical for both orientations.
pub fn generate_board_string(game_state: &GameState) -> String {
    let side_to_move = match game_state.side_to_move {
        Color::White => "w",
        Color::Black => "b",
    };
    format!(
        "{} {} {} {}",
        generate_board_field(&game_state.board, game_state.orientation),
        side_to_move,
        generate_castling_field(game_state.castling_rights),
        generate_en_passant_field(game_state.en_passant_square, game_state.orientation)
    )
}

fn generate_board_field(board: &Board, orientation: Orientation) -> String {
    let mut out = String::new();

    for rank in (0..8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8 {
            let square = orientation.square(file, rank);
            if let Some(piece) = board[square.row as usize][square.col as usize] {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece.fen_char());
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let mut out = String::new();

    for (color, side, ch) in [
        (Color::White, CastleSide::Kingside, 'K'),
        (Color::White, CastleSide::Queenside, 'Q'),
        (Color::Black, CastleSide::Kingside, 'k'),
        (Color::Black, CastleSide::Queenside, 'q'),
    ] {
        if rights.has(color, side) {
            out.push(ch);
        }
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}

fn generate_en_passant_field(square: Option<Square>, orientation: Orientation) -> String {
    match square {
        Some(square) => square_to_algebraic(square, orientation),
        None => "-".to_owned(),
    }
}
