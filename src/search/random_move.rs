//! Uniform random move selection, used when search yields nothing.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::moves::chess_move::Move;

/// Picks one of `legal_moves` uniformly. `None` only for an empty list.
pub fn find_random_move<R: Rng + ?Sized>(legal_moves: &[Move], rng: &mut R) -> Option<Move> {
    legal_moves.choose(rng).copied()
}
