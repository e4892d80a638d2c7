//! Reproducible random scrambles.
//!
//! Every scramble owns its generator, seeded from the caller's parameter, so
//! the same seed always yields the same move sequence.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::SolveError;
use crate::moves::{MoveTable, NUM_MOVES};
use crate::state::CubeState;

/// Default scramble length used by the CLI's scramble command.
pub const DEFAULT_SCRAMBLE_LENGTH: usize = 1000;

/// Draws `length` uniformly random move indices.
pub fn scramble(seed: u64, length: usize) -> Vec<usize> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..length).map(|_| rng.gen_range(0..NUM_MOVES)).collect()
}

/// Scrambles the solved cube, returning the state and the moves applied.
pub fn scrambled_state(
    table: &MoveTable,
    seed: u64,
    length: usize,
) -> Result<(CubeState, Vec<usize>), SolveError> {
    let moves = scramble(seed, length);
    let state = CubeState::solved().apply_sequence(table, &moves)?;
    Ok((state, moves))
}
