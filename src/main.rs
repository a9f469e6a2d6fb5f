//! Self-play driver.
//!
//! Plays the engine against itself in the terminal through the same worker
//! contract an interactive front end would use: search on a worker thread,
//! poll without blocking, fall back to a random move when the search gives
//! nothing back. Stops on checkmate, stalemate, threefold repetition or the
//! ply limit, then prints the game as PGN.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use chess_ai::errors::ChessResult;
use chess_ai::game_state::chess_rules::Orientation;
use chess_ai::game_state::chess_types::PieceKind;
use chess_ai::game_state::game_state::GameState;
use chess_ai::search::board_scoring::PositionalScorer;
use chess_ai::search::negamax::SearchConfig;
use chess_ai::search::threading::{SearchPoll, SearchWorker};
use chess_ai::utils::long_algebraic::move_to_long_algebraic;
use chess_ai::utils::pgn::{result_for_status, write_pgn};
use chess_ai::utils::render_game_state::render_game_state;

const PLAY_AS_BLACK_ENV: &str = "CHESS_AI_PLAY_AS_BLACK";
const MAX_PLIES_ENV: &str = "CHESS_AI_MAX_PLIES";
const DEFAULT_MAX_PLIES: usize = 200;
const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn main() -> ChessResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SearchConfig::from_env();
    let max_plies = std::env::var(MAX_PLIES_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_PLIES);
    let orientation = Orientation::for_human(env_flag(PLAY_AS_BLACK_ENV));

    let mut game = GameState::new_game_oriented(orientation);
    let mut worker = SearchWorker::new(PositionalScorer::for_orientation(orientation), config);
    let mut rng = rand::rng();
    let mut seen = HashMap::<String, u32>::new();
    seen.insert(game.repetition_key(), 1);

    info!(depth = config.depth, max_plies, ?orientation, "starting self-play");
    println!("{}\n", render_game_state(&game));

    let mut result = "*";
    while game.move_log().len() < max_plies {
        let legal_moves = game.get_legal_moves();
        if legal_moves.is_empty() {
            result = result_for_status(game.status(), game.side_to_move);
            break;
        }

        worker.start(&game, &legal_moves)?;
        let chosen = loop {
            match worker.poll(&mut rng) {
                SearchPoll::Pending => thread::sleep(POLL_INTERVAL),
                SearchPoll::Found(mv) => break Some(mv),
                SearchPoll::NoMove | SearchPoll::TimedOut => break None,
            }
        };
        let Some(mv) = chosen else {
            break;
        };

        let notation = move_to_long_algebraic(&mv, &game);
        game.make_move(mv);
        if mv.is_pawn_promotion {
            game.resolve_promotion(PieceKind::Queen)?;
        }
        println!("{}. {notation}\n{}\n", game.move_log().len(), render_game_state(&game));

        let repetitions = seen.entry(game.repetition_key()).or_insert(0);
        *repetitions += 1;
        if *repetitions >= 3 {
            info!("threefold repetition");
            result = "1/2-1/2";
            break;
        }
    }

    info!(plies = game.move_log().len(), result, "game over");
    println!("{}", write_pgn(&game, result));
    Ok(())
}
