//! Fixed-depth negamax search with alpha-beta pruning.
//!
//! The search walks one `GameState` in place through `make_move` /
//! `undo_move` pairs. Scores returned by [`negamax_alpha_beta`] are from the
//! perspective of the side to move at that node; the evaluator's White-based
//! score is turned around with the node's sign.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::game_state::game_state::GameState;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::{BoardScorer, Score, MATE_SCORE};
use crate::utils::long_algebraic::move_to_long_algebraic;

pub const DEFAULT_DEPTH: u8 = 4;
pub const DEFAULT_WORKER_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEPTH_ENV: &str = "CHESS_AI_DEPTH";
pub const WORKER_TIMEOUT_ENV: &str = "CHESS_AI_WORKER_TIMEOUT_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Plies searched below the root.
    pub depth: u8,
    /// How long a caller waits on a worker before falling back.
    pub worker_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            worker_timeout: DEFAULT_WORKER_TIMEOUT,
        }
    }
}

impl SearchConfig {
    /// Defaults overridden by `CHESS_AI_DEPTH` and `CHESS_AI_WORKER_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`SearchConfig::from_env`] with a custom variable source.
    /// Missing or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(depth) = lookup(DEPTH_ENV).and_then(|v| v.trim().parse::<u8>().ok()) {
            config.depth = depth;
        }
        if let Some(ms) = lookup(WORKER_TIMEOUT_ENV).and_then(|v| v.trim().parse::<u64>().ok()) {
            config.worker_timeout = Duration::from_millis(ms);
        }
        config
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// Root score from the side to move's perspective.
    pub best_score: Score,
    pub nodes: u64,
}

/// Per-search bookkeeping shared by every node of one tree walk.
pub struct SearchContext<'a, S: BoardScorer + ?Sized> {
    scorer: &'a S,
    root_depth: u8,
    stop: Option<&'a AtomicBool>,
    best_move: Option<Move>,
    nodes: u64,
}

impl<'a, S: BoardScorer + ?Sized> SearchContext<'a, S> {
    pub fn new(scorer: &'a S, root_depth: u8) -> Self {
        Self {
            scorer,
            root_depth,
            stop: None,
            best_move: None,
            nodes: 0,
        }
    }

    /// Aborts the walk between moves once `stop` is raised.
    pub fn with_stop_flag(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    #[inline]
    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[inline]
    fn should_stop(&self) -> bool {
        self.stop.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Negamax over `moves`, the legal moves of `game_state`.
///
/// `sign` is `+1.0` when White is to move at this node and `-1.0` otherwise.
/// The move producing a new maximum at the root depth is recorded on `ctx`.
pub fn negamax_alpha_beta<S: BoardScorer + ?Sized>(
    ctx: &mut SearchContext<'_, S>,
    game_state: &mut GameState,
    moves: &[Move],
    depth: u8,
    mut alpha: Score,
    beta: Score,
    sign: Score,
) -> Score {
    ctx.nodes += 1;

    // An empty list means mate or stalemate, which the evaluator reports.
    if depth == 0 || moves.is_empty() {
        return sign * ctx.scorer.score(game_state);
    }

    let mut max_score = -MATE_SCORE;
    for &mv in moves {
        if ctx.should_stop() {
            break;
        }

        game_state.make_move(mv);
        let replies = game_state.get_legal_moves();
        let score = -negamax_alpha_beta(ctx, game_state, &replies, depth - 1, -beta, -alpha, -sign);
        game_state.undo_move();

        if score > max_score {
            max_score = score;
            if depth == ctx.root_depth {
                ctx.best_move = Some(mv);
            }
        }
        if max_score > alpha {
            alpha = max_score;
        }
        if alpha >= beta {
            break;
        }
    }

    max_score
}

/// Searches `legal_moves` in random order to `config.depth` plies.
///
/// `best_move` is `None` when the list is empty, when no move beats the
/// losing bound, or when `stop` was raised before any move finished.
pub fn find_best_move<S, R>(
    game_state: &mut GameState,
    legal_moves: &[Move],
    scorer: &S,
    config: &SearchConfig,
    stop: Option<&AtomicBool>,
    rng: &mut R,
) -> SearchResult
where
    S: BoardScorer + ?Sized,
    R: Rng + ?Sized,
{
    let mut ordered = legal_moves.to_vec();
    ordered.shuffle(rng);

    let mut ctx = SearchContext::new(scorer, config.depth);
    if let Some(flag) = stop {
        ctx = ctx.with_stop_flag(flag);
    }

    let sign = game_state.side_to_move.sign();
    let best_score = negamax_alpha_beta(
        &mut ctx,
        game_state,
        &ordered,
        config.depth,
        -MATE_SCORE,
        MATE_SCORE,
        sign,
    );

    let result = SearchResult {
        best_move: ctx.best_move(),
        best_score,
        nodes: ctx.nodes(),
    };
    debug!(
        depth = config.depth,
        nodes = result.nodes,
        score = result.best_score,
        best = ?result.best_move.map(|mv| move_to_long_algebraic(&mv, game_state)),
        "search finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::move_generation::legal_move_generator::legal_moves_for;
    use crate::search::board_scoring::{MaterialScorer, PositionalScorer};

    const BACK_RANK_MATE: &str = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1";
    const SCHOLARS_MATE: &str =
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
    const ROOK_ENDGAME: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    fn game(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("FEN should parse")
    }

    fn config(depth: u8) -> SearchConfig {
        SearchConfig {
            depth,
            ..SearchConfig::default()
        }
    }

    fn search(game: &mut GameState, depth: u8, seed: u64) -> SearchResult {
        let moves = game.get_legal_moves();
        let mut rng = StdRng::seed_from_u64(seed);
        find_best_move(game, &moves, &PositionalScorer::default(), &config(depth), None, &mut rng)
    }

    /// Full-width negamax without pruning, same conventions as the real one.
    fn unpruned<S: BoardScorer>(
        scorer: &S,
        game_state: &mut GameState,
        moves: &[Move],
        depth: u8,
        root_depth: u8,
        sign: Score,
        best: &mut Option<Move>,
    ) -> Score {
        if depth == 0 || moves.is_empty() {
            return sign * scorer.score(game_state);
        }
        let mut max_score = -MATE_SCORE;
        for &mv in moves {
            game_state.make_move(mv);
            let replies = game_state.get_legal_moves();
            let score = -unpruned(scorer, game_state, &replies, depth - 1, root_depth, -sign, best);
            game_state.undo_move();
            if score > max_score {
                max_score = score;
                if depth == root_depth {
                    *best = Some(mv);
                }
            }
        }
        max_score
    }

    /// Flips the board top to bottom and swaps the colors of every piece and
    /// the side to move.
    fn mirrored_fen(fen: &str) -> String {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().expect("placement field");
        let side = fields.next().expect("side field");
        let ranks: Vec<String> = placement
            .split('/')
            .rev()
            .map(|rank| {
                rank.chars()
                    .map(|ch| {
                        if ch.is_ascii_uppercase() {
                            ch.to_ascii_lowercase()
                        } else {
                            ch.to_ascii_uppercase()
                        }
                    })
                    .collect()
            })
            .collect();
        let side = if side == "w" { "b" } else { "w" };
        format!("{} {side} - - 0 1", ranks.join("/"))
    }

    #[test]
    fn config_reads_overrides_and_ignores_garbage() {
        let config = SearchConfig::from_lookup(|key| match key {
            DEPTH_ENV => Some("2".to_owned()),
            WORKER_TIMEOUT_ENV => Some("1500".to_owned()),
            _ => None,
        });
        assert_eq!(config.depth, 2);
        assert_eq!(config.worker_timeout, Duration::from_millis(1500));

        let fallback = SearchConfig::from_lookup(|_| Some("not a number".to_owned()));
        assert_eq!(fallback, SearchConfig::default());
        assert_eq!(fallback.depth, 4);
    }

    #[test]
    fn finds_back_rank_mate_in_one() {
        for depth in [1, 2] {
            let mut board = game(BACK_RANK_MATE);
            let result = search(&mut board, depth, 3);
            let best = result.best_move.expect("a move should be chosen");
            assert_eq!(move_to_long_algebraic(&best, &board), "a1a8");
            assert_eq!(result.best_score, MATE_SCORE);

            board.make_move(best);
            assert!(board.get_legal_moves().is_empty());
            assert!(board.checkmate());
        }
    }

    #[test]
    fn finds_scholars_mate() {
        let mut board = game(SCHOLARS_MATE);
        let result = search(&mut board, 2, 17);
        let best = result.best_move.expect("a move should be chosen");
        assert_eq!(move_to_long_algebraic(&best, &board), "h5f7");
    }

    #[test]
    fn start_position_depth_one_picks_a_best_legal_move() {
        let scorer = PositionalScorer::default();
        let mut board = GameState::new_game();
        let moves = board.get_legal_moves();

        let mut child_scores = Vec::new();
        for &mv in &moves {
            board.make_move(mv);
            board.get_legal_moves();
            child_scores.push(scorer.score(&mut board));
            board.undo_move();
        }
        let worst = child_scores.iter().copied().fold(f64::INFINITY, f64::min);
        let best = child_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let result = search(&mut board, 1, 5);
        let chosen = result.best_move.expect("a move should be chosen");
        assert!(moves.contains(&chosen));
        assert_eq!(chosen.piece_moved.color, Color::White);
        assert!(result.best_score >= worst);
        assert!((result.best_score - best).abs() < 1e-9);
        assert_eq!(board, {
            let mut fresh = GameState::new_game();
            fresh.get_legal_moves();
            fresh
        });
    }

    #[test]
    fn mirrored_positions_score_the_same_for_the_side_to_move() {
        // No rooks or queens: their placement tables are not symmetric top
        // to bottom.
        let fen = "4k3/ppp2ppp/2n5/3p4/4P3/5N2/PPP2PPP/2B1K3 w - - 0 1";
        let mirror = mirrored_fen(fen);
        assert_eq!(mirror, "2b1k3/ppp2ppp/5n2/4p3/3P4/2N5/PPP2PPP/4K3 b - - 0 1");

        for depth in [1, 2] {
            let mut white = game(fen);
            let mut black = game(&mirror);
            let white_score = search(&mut white, depth, 1).best_score;
            let black_score = search(&mut black, depth, 2).best_score;
            assert!(
                (white_score - black_score).abs() < 1e-9,
                "depth {depth}: {white_score} vs {black_score}"
            );
        }
    }

    #[test]
    fn pruning_matches_full_width_search() {
        fn compare<S: BoardScorer>(scorer: &S, fen: &str, depth: u8) {
            let mut board = game(fen);
            let moves = board.get_legal_moves();
            let sign = board.side_to_move.sign();

            let mut expected_best = None;
            let expected = unpruned(scorer, &mut board, &moves, depth, depth, sign, &mut expected_best);

            let mut ctx = SearchContext::new(scorer, depth);
            let actual = negamax_alpha_beta(
                &mut ctx,
                &mut board,
                &moves,
                depth,
                -MATE_SCORE,
                MATE_SCORE,
                sign,
            );

            assert_eq!(actual, expected, "{fen} at depth {depth}");
            assert_eq!(ctx.best_move(), expected_best, "{fen} at depth {depth}");
        }

        compare(&MaterialScorer, ROOK_ENDGAME, 3);
        compare(&MaterialScorer, SCHOLARS_MATE, 2);
        compare(&PositionalScorer::default(), SCHOLARS_MATE, 2);
        compare(&PositionalScorer::default(), ROOK_ENDGAME, 2);
    }

    #[test]
    fn pruning_visits_fewer_nodes() {
        let mut board = game(ROOK_ENDGAME);
        let moves = board.get_legal_moves();
        let mut ctx = SearchContext::new(&MaterialScorer, 3);
        negamax_alpha_beta(&mut ctx, &mut board, &moves, 3, -MATE_SCORE, MATE_SCORE, 1.0);

        // 1 root + 14 + 191 + 2812 nodes without pruning.
        assert!(ctx.nodes() < 1 + 14 + 191 + 2812, "visited {}", ctx.nodes());
    }

    #[test]
    fn promotes_and_the_new_queen_moves() {
        let mut board = game("8/4P3/8/8/8/8/8/k6K w - - 0 1");
        let result = search(&mut board, 2, 9);
        let best = result.best_move.expect("a move should be chosen");
        assert!(best.is_pawn_promotion);
        assert_eq!(best.promotion_kind, PieceKind::Queen);

        board.make_move(best);
        let queen_moves = legal_moves_for(&mut board, Color::White)
            .into_iter()
            .filter(|mv| mv.piece_moved.kind == PieceKind::Queen)
            .count();
        // Queen on e8 with kings on a1 and h1.
        assert_eq!(queen_moves, 7 + 7 + 3 + 4);
    }

    #[test]
    fn raised_stop_flag_returns_without_a_move() {
        let mut board = GameState::new_game();
        let moves = board.get_legal_moves();
        let stop = AtomicBool::new(true);
        let mut rng = StdRng::seed_from_u64(0);
        let result = find_best_move(
            &mut board,
            &moves,
            &PositionalScorer::default(),
            &config(4),
            Some(&stop),
            &mut rng,
        );
        assert_eq!(result.best_move, None);
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn depth_zero_only_evaluates() {
        let mut board = GameState::new_game();
        let result = search(&mut board, 0, 0);
        assert_eq!(result.best_move, None);
        assert!(result.best_score.abs() < 1e-9);
    }
}
