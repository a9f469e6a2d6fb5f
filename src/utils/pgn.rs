//! PGN export and import for the move log.
//!
//! Move text uses long algebraic notation. Export replays the game from its
//! first position, recovered by undoing a copy of the live state.

use chrono::Local;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{Orientation, STARTING_POSITION_FEN};
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::{GameState, GameStatus};
use crate::moves::chess_move::Move;
use crate::utils::fen_generator::generate_fen;
use crate::utils::long_algebraic::{long_algebraic_to_move, move_to_long_algebraic};

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// A game read back from PGN text.
#[derive(Debug, Clone)]
pub struct PgnGame {
    /// Tag pairs in the order they appeared.
    pub tags: Vec<(String, String)>,
    pub initial_state: GameState,
    pub moves: Vec<Move>,
    pub final_state: GameState,
    pub result: String,
}

impl PgnGame {
    pub fn tag(&self, name: &str) -> Option<&str> {
        find_tag(&self.tags, name)
    }
}

/// Result token for a finished game: `1-0`, `0-1`, `1/2-1/2`, or `*`.
pub fn result_for_status(status: GameStatus, side_to_move: Color) -> &'static str {
    match (status, side_to_move) {
        (GameStatus::Checkmate, Color::White) => "0-1",
        (GameStatus::Checkmate, Color::Black) => "1-0",
        (GameStatus::Stalemate, _) => "1/2-1/2",
        (GameStatus::Ongoing, _) => "*",
    }
}

/// First position of the game: `game_state` with its whole log undone.
pub fn initial_position(game_state: &GameState) -> GameState {
    let mut initial = game_state.clone();
    while initial.can_undo() {
        initial.undo_move();
    }
    initial
}

/// Writes the game with the seven standard tags, plus `SetUp`/`FEN` when it
/// did not begin from the standard starting position.
pub fn write_pgn(game_state: &GameState, result: &str) -> String {
    let result = checked_result(result);
    let mut tags = vec![
        ("Event".to_owned(), "Chess AI Game".to_owned()),
        ("Site".to_owned(), "Local".to_owned()),
        ("Date".to_owned(), Local::now().format("%Y.%m.%d").to_string()),
        ("Round".to_owned(), "-".to_owned()),
        ("White".to_owned(), "White".to_owned()),
        ("Black".to_owned(), "Black".to_owned()),
        ("Result".to_owned(), result.to_owned()),
    ];

    let start_fen = generate_fen(&initial_position(game_state));
    if start_fen != STARTING_POSITION_FEN {
        tags.push(("SetUp".to_owned(), "1".to_owned()));
        tags.push(("FEN".to_owned(), start_fen));
    }

    write_pgn_with_tags(game_state, &tags)
}

/// Writes `tags` verbatim followed by the movetext. The closing result token
/// is taken from the `Result` tag, `*` when absent.
pub fn write_pgn_with_tags(game_state: &GameState, tags: &[(String, String)]) -> String {
    let mut pgn = String::new();
    for (name, value) in tags {
        pgn.push('[');
        pgn.push_str(name);
        pgn.push_str(" \"");
        pgn.push_str(&value.replace('\\', "\\\\").replace('"', "\\\""));
        pgn.push_str("\"]\n");
    }
    pgn.push('\n');

    let mut replay = initial_position(game_state);
    let mut fullmove = replay.start_clocks().fullmove;
    let mut first = true;
    for mv in game_state.move_log() {
        let lan = move_to_long_algebraic(mv, &replay);
        match replay.side_to_move {
            Color::White => pgn.push_str(&format!("{fullmove}. {lan} ")),
            Color::Black if first => pgn.push_str(&format!("{fullmove}... {lan} ")),
            Color::Black => pgn.push_str(&format!("{lan} ")),
        }
        if replay.side_to_move == Color::Black {
            fullmove += 1;
        }
        first = false;
        replay.make_move(*mv);
    }

    pgn.push_str(checked_result(find_tag(tags, "Result").unwrap_or("*")));
    pgn.push('\n');
    pgn
}

/// Reads a PGN whose movetext is long algebraic, replaying it on a board
/// laid out for `orientation`. Comments, variations and annotation glyphs
/// are skipped.
pub fn read_pgn(pgn: &str, orientation: Orientation) -> ChessResult<PgnGame> {
    let mut tags = Vec::new();
    let mut movetext = String::new();
    for line in pgn.lines().map(str::trim) {
        if line.starts_with('[') {
            tags.push(parse_tag_pair(line)?);
        } else if !line.is_empty() {
            movetext.push_str(line);
            movetext.push('\n');
        }
    }

    let initial_state = match (find_tag(&tags, "SetUp"), find_tag(&tags, "FEN")) {
        (_, Some(fen)) => GameState::from_fen_oriented(fen, orientation)?,
        (Some("1"), None) => {
            return Err(ChessError::InvalidPgn("SetUp is 1 but no FEN tag is present".to_owned()))
        }
        _ => GameState::new_game_oriented(orientation),
    };

    let mut state = initial_state.clone();
    let mut moves = Vec::new();
    let mut result = find_tag(&tags, "Result").map(checked_result).unwrap_or("*").to_owned();

    for token in movetext_tokens(&movetext) {
        if RESULT_TOKENS.contains(&token) {
            result = token.to_owned();
            break;
        }
        if is_move_number(token) {
            continue;
        }
        let lan = token
            .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.')
            .trim_end_matches(['+', '#', '!', '?']);
        let mv = long_algebraic_to_move(lan, &mut state)?;
        state.make_move(mv);
        moves.push(mv);
    }

    Ok(PgnGame {
        tags,
        initial_state,
        moves,
        final_state: state,
        result,
    })
}

fn find_tag<'a>(tags: &'a [(String, String)], name: &str) -> Option<&'a str> {
    tags.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
}

fn checked_result(result: &str) -> &str {
    if RESULT_TOKENS.contains(&result) {
        result
    } else {
        "*"
    }
}

fn parse_tag_pair(line: &str) -> ChessResult<(String, String)> {
    let invalid = || ChessError::InvalidPgn(format!("malformed tag pair: {line}"));
    let body = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(invalid)?;
    let (name, quoted) = body.split_once(char::is_whitespace).ok_or_else(invalid)?;
    let value = quoted
        .trim()
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(invalid)?;
    if name.is_empty() {
        return Err(invalid());
    }
    Ok((name.to_owned(), value.replace("\\\"", "\"").replace("\\\\", "\\")))
}

/// Splits movetext into tokens, dropping `{...}` and `;` comments and
/// parenthesised variations (which may nest).
fn movetext_tokens(movetext: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut variation_depth = 0usize;
    let mut in_brace = false;
    let mut in_line_comment = false;

    for (i, c) in movetext.char_indices() {
        let skipping = in_brace || in_line_comment || variation_depth > 0;
        let separator = c.is_whitespace() || matches!(c, '{' | '}' | '(' | ')' | ';');
        if separator || skipping {
            if let Some(s) = start.take() {
                tokens.push(&movetext[s..i]);
            }
        }
        match c {
            '\n' if in_line_comment => in_line_comment = false,
            '}' if in_brace => in_brace = false,
            _ if in_brace || in_line_comment => {}
            '{' => in_brace = true,
            ';' => in_line_comment = true,
            '(' => variation_depth += 1,
            ')' => variation_depth = variation_depth.saturating_sub(1),
            _ if variation_depth > 0 || separator => {}
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        tokens.push(&movetext[s..]);
    }
    tokens
}

/// `12.` or `12...`
fn is_move_number(token: &str) -> bool {
    let digits = token.trim_end_matches('.');
    digits.len() < token.len() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
