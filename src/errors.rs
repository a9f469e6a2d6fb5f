//! Errors used throughout the chess engine.
//!
//! `ChessError` is the single error type for recoverable failures: parsing
//! positions and notation, resolving promotions and managing the search
//! worker. Violated preconditions (for example undoing with an empty move
//! log) are not represented here and panic instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChessError {
    /// The FEN (or board string) could not be parsed.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// A coordinate token such as `e4` was malformed.
    #[error("invalid algebraic square: {0}")]
    InvalidSquare(String),

    /// A long algebraic move such as `e2e4` was malformed.
    #[error("invalid long algebraic move: {0}")]
    InvalidLongAlgebraic(String),

    /// A PGN tag pair or movetext token could not be read.
    #[error("invalid PGN: {0}")]
    InvalidPgn(String),

    /// Well-formed notation that does not match any legal move.
    #[error("move {0} is not legal in the current position")]
    IllegalMove(String),

    #[error("the last move was not a pawn promotion")]
    NoPendingPromotion,

    #[error("a search is already in progress")]
    SearchInProgress,

    #[error("failed to spawn search worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

pub type ChessResult<T> = Result<T, ChessError>;
