//! Terminal-oriented Unicode board renderer.
//!
//! Draws the board the way it is laid out in memory, so a game oriented for
//! a human playing Black is shown with Black at the bottom.

use crate::game_state::{chess_types::*, game_state::GameState};

/// Render the board to a Unicode string for terminal output.
pub fn render_game_state(game_state: &GameState) -> String {
    let orientation = game_state.orientation;
    let files: String = (0..8)
        .map(|col| {
            let (file, _) = orientation.file_rank(Square::new(0, col));
            char::from(b'a' + file as u8).to_string()
        })
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::new();
    out.push_str(&format!("  {files}\n"));

    for row in 0..8 {
        let (_, rank) = orientation.file_rank(Square::new(row, 0));
        let rank_char = char::from(b'1' + rank as u8);
        out.push(rank_char);
        out.push(' ');

        for col in 0..8 {
            match game_state.piece_at(Square::new(row, col)) {
                Some(piece) => out.push(piece_to_unicode(piece)),
                None => out.push('·'),
            }

            if col < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(rank_char);
        out.push('\n');
    }

    out.push_str(&format!("  {files}"));

    out
}

fn piece_to_unicode(piece: Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::White, PieceKind::King) => '♔',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::Black, PieceKind::King) => '♚',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Pawn) => '♟',
    }
}
