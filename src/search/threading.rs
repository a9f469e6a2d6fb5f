//! Search worker boundary.
//!
//! A search runs on its own thread against a deep copy of the position, so
//! the caller can keep its loop responsive. The caller polls the returned
//! handle without blocking; a worker that outlives its time budget or
//! belongs to a position that changed is cancelled and its result is never
//! observed.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::errors::{ChessError, ChessResult};
use crate::game_state::game_state::GameState;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::BoardScorer;
use crate::search::negamax::{find_best_move, SearchConfig};
use crate::search::random_move::find_random_move;

const WORKER_THREAD_NAME: &str = "chess-search";

/// Cancellation and accounting shared between a handle and its worker.
#[derive(Debug, Default)]
pub struct SharedSearchState {
    stop: AtomicBool,
    nodes_visited: AtomicU64,
}

impl SharedSearchState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[inline]
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn stop_flag(&self) -> &AtomicBool {
        &self.stop
    }

    #[inline]
    pub fn add_nodes(&self, n: u64) {
        self.nodes_visited.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn nodes_visited(&self) -> u64 {
        self.nodes_visited.load(Ordering::Relaxed)
    }
}

/// What a non-blocking poll of a search observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPoll {
    /// Still running inside its time budget.
    Pending,
    Found(Move),
    /// The worker finished without choosing a move, or has gone away.
    NoMove,
    /// The time budget ran out; the worker has been told to stop.
    TimedOut,
}

impl SearchPoll {
    #[inline]
    pub fn is_pending(self) -> bool {
        self == SearchPoll::Pending
    }
}

/// Caller side of one running search.
pub struct SearchHandle {
    receiver: Option<Receiver<Option<Move>>>,
    shared: Arc<SharedSearchState>,
    root_moves: Vec<Move>,
    started_at: Instant,
    timeout: Duration,
    outcome: Option<SearchPoll>,
}

/// Spawns a worker that searches a snapshot of `game_state`.
///
/// The worker owns clones of the state and of `legal_moves`; later changes
/// to the caller's position do not reach it.
pub fn start_search<S>(
    game_state: &GameState,
    legal_moves: &[Move],
    scorer: S,
    config: SearchConfig,
) -> ChessResult<SearchHandle>
where
    S: BoardScorer + 'static,
{
    let mut snapshot = game_state.clone();
    let root_moves = legal_moves.to_vec();
    let worker_moves = root_moves.clone();
    let shared = SharedSearchState::new();
    let worker_shared = Arc::clone(&shared);
    let (sender, receiver) = mpsc::channel();

    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_owned())
        .spawn(move || {
            let mut rng = rand::rng();
            let result = find_best_move(
                &mut snapshot,
                &worker_moves,
                &scorer,
                &config,
                Some(worker_shared.stop_flag()),
                &mut rng,
            );
            worker_shared.add_nodes(result.nodes);

            if worker_shared.should_stop() {
                debug!(nodes = result.nodes, "search worker stopped early");
                return;
            }
            // The receiver is gone if the caller cancelled in the meantime.
            if sender.send(result.best_move).is_err() {
                debug!("search result dropped after cancellation");
            }
        })?;

    info!(
        depth = config.depth,
        root_moves = root_moves.len(),
        timeout_ms = config.worker_timeout.as_millis() as u64,
        "search worker started"
    );

    Ok(SearchHandle {
        receiver: Some(receiver),
        shared,
        root_moves,
        started_at: Instant::now(),
        timeout: config.worker_timeout,
        outcome: None,
    })
}

impl SearchHandle {
    /// Checks for a result without blocking.
    ///
    /// Once a terminal outcome is seen, later polls return the same outcome.
    pub fn poll(&mut self) -> SearchPoll {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        let Some(receiver) = &self.receiver else {
            return SearchPoll::NoMove;
        };

        let outcome = match receiver.try_recv() {
            Ok(Some(mv)) => SearchPoll::Found(mv),
            Ok(None) | Err(TryRecvError::Disconnected) => SearchPoll::NoMove,
            Err(TryRecvError::Empty) if self.started_at.elapsed() >= self.timeout => {
                warn!(
                    elapsed_ms = self.started_at.elapsed().as_millis() as u64,
                    "search worker timed out"
                );
                self.shared.request_stop();
                SearchPoll::TimedOut
            }
            Err(TryRecvError::Empty) => return SearchPoll::Pending,
        };

        debug!(
            ?outcome,
            nodes = self.shared.nodes_visited(),
            elapsed_ms = self.started_at.elapsed().as_millis() as u64,
            "search worker finished"
        );
        self.receiver = None;
        self.outcome = Some(outcome);
        outcome
    }

    /// Like [`SearchHandle::poll`], but a search that ended without a move
    /// is replaced by a uniformly random root move.
    pub fn poll_or_fallback<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SearchPoll {
        match self.poll() {
            SearchPoll::NoMove | SearchPoll::TimedOut => {
                match find_random_move(&self.root_moves, rng) {
                    Some(mv) => {
                        info!("falling back to a random move");
                        SearchPoll::Found(mv)
                    }
                    None => SearchPoll::NoMove,
                }
            }
            other => other,
        }
    }

    /// Stops the worker and discards whatever it would have produced.
    pub fn cancel(mut self) {
        self.abandon();
        debug!("search worker cancelled");
    }

    fn abandon(&mut self) {
        self.shared.request_stop();
        self.receiver = None;
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        self.abandon();
    }
}

/// Owns at most one outstanding search.
pub struct SearchWorker<S> {
    scorer: S,
    config: SearchConfig,
    active: Option<SearchHandle>,
}

impl<S> SearchWorker<S>
where
    S: BoardScorer + Clone + 'static,
{
    pub fn new(scorer: S, config: SearchConfig) -> Self {
        Self {
            scorer,
            config,
            active: None,
        }
    }

    #[inline]
    pub fn is_searching(&self) -> bool {
        self.active.is_some()
    }

    /// Starts searching `game_state`. Fails if a search is already running.
    pub fn start(&mut self, game_state: &GameState, legal_moves: &[Move]) -> ChessResult<()> {
        if self.active.is_some() {
            return Err(ChessError::SearchInProgress);
        }
        let handle = start_search(game_state, legal_moves, self.scorer.clone(), self.config)?;
        self.active = Some(handle);
        Ok(())
    }

    /// Polls the active search, falling back to a random move when it ends
    /// without one. Returns `NoMove` when idle.
    pub fn poll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SearchPoll {
        let Some(handle) = self.active.as_mut() else {
            return SearchPoll::NoMove;
        };
        let outcome = handle.poll_or_fallback(rng);
        if !outcome.is_pending() {
            self.active = None;
        }
        outcome
    }

    /// Cancels the active search, if any. Call before changing the position
    /// the search was started on.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
        }
    }
}
