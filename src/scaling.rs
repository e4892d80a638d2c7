//! Split search for scaled-out deployments.
//!
//! Expansion and deduplication are separated so they can run on different
//! workers:
//! - [`expand_batch`] (the rotator) applies all 18 moves to a batch of states.
//!   It only reads the move table and its input, so batches can be expanded in
//!   parallel.
//! - [`Checker`] owns both visited maps. Recording a candidate and checking it
//!   against the other direction must happen as one step, so a checker takes
//!   `&mut self` and must sit behind a single owner (or a lock) when shared.
//!
//! [`solve_batched`] drives one rotator and one checker level by level and
//! finds the same distance as the serial controller. Moving batches between
//! processes is left to the caller.

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::error::SolveError;
use crate::fingerprint::Fingerprint;
use crate::moves::{MoveTable, NUM_MOVES};
use crate::search::{Direction, SearchConfig};
use crate::state::CubeState;

/// Applies every move to every state.
///
/// Entry `k * 18 + i` of the result is `states[k]` after move `i`.
pub fn expand_batch(table: &MoveTable, states: &[CubeState]) -> Vec<CubeState> {
    let mut successors = vec![CubeState::solved(); states.len() * NUM_MOVES];
    successors
        .par_chunks_mut(NUM_MOVES)
        .zip(states.par_iter())
        .for_each(|(chunk, state)| {
            for (permutation, out) in table.permutations().iter().zip(chunk.iter_mut()) {
                state.permute_into(permutation, out);
            }
        });
    successors
}

/// Single-owner deduplication and meeting detection for both directions.
#[derive(Debug, Default)]
pub struct Checker {
    visited: [FxHashMap<Fingerprint, usize>; 2],
    fresh: [Vec<CubeState>; 2],
}

impl Checker {
    /// Creates a checker seeded with the two roots at distance 0.
    pub fn new(start: &CubeState, goal: &CubeState) -> Self {
        let mut checker = Self::default();
        for (direction, root) in [(Direction::Forward, start), (Direction::Backward, goal)] {
            let side = slot(direction);
            checker.visited[side].insert(root.fingerprint(), 0);
            checker.fresh[side].push(root.clone());
        }
        checker
    }

    /// Distance 0 if the two roots are the same state.
    pub fn initial_meeting(&self) -> Option<usize> {
        self.visited[slot(Direction::Forward)]
            .keys()
            .find(|fingerprint| self.visited[slot(Direction::Backward)].contains_key(fingerprint))
            .map(|_| 0)
    }

    /// Records candidates found at `distance` from the root of `direction`.
    ///
    /// Returns the total distance as soon as a candidate is already known to
    /// the other direction. Candidates new to `direction` are kept for
    /// [`Checker::take_frontier`].
    pub fn check_and_record(
        &mut self,
        direction: Direction,
        candidates: &[CubeState],
        distance: usize,
    ) -> Option<usize> {
        let own = slot(direction);
        let other = slot(direction.opposite());
        for candidate in candidates {
            let fingerprint = candidate.fingerprint();
            if let Some(&found) = self.visited[other].get(&fingerprint) {
                return Some(distance + found);
            }
            if self.visited[own].contains_key(&fingerprint) {
                continue;
            }
            self.visited[own].insert(fingerprint, distance);
            self.fresh[own].push(candidate.clone());
        }
        None
    }

    /// Hands over the states recorded since the last call for `direction`.
    pub fn take_frontier(&mut self, direction: Direction) -> Vec<CubeState> {
        std::mem::take(&mut self.fresh[slot(direction)])
    }

    /// Number of states waiting to be expanded in `direction`.
    pub fn frontier_len(&self, direction: Direction) -> usize {
        self.fresh[slot(direction)].len()
    }

    /// Positions recorded in both directions.
    pub fn positions_explored(&self) -> usize {
        self.visited.iter().map(|v| v.len()).sum()
    }
}

const fn slot(direction: Direction) -> usize {
    match direction {
        Direction::Forward => 0,
        Direction::Backward => 1,
    }
}

/// Distance and work reported by the batched driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub distance: usize,
    pub positions_explored: usize,
}

/// Level-synchronous search built only from [`expand_batch`] and [`Checker`].
pub fn solve_batched(
    table: &MoveTable,
    start: &CubeState,
    goal: &CubeState,
    config: &SearchConfig,
) -> Result<BatchOutcome, SolveError> {
    start.check_labels()?;
    goal.check_labels()?;

    let mut checker = Checker::new(start, goal);
    if let Some(distance) = checker.initial_meeting() {
        return Ok(BatchOutcome {
            distance,
            positions_explored: checker.positions_explored(),
        });
    }

    let mut depths = [0usize; 2];
    loop {
        let forward = checker.frontier_len(Direction::Forward);
        let backward = checker.frontier_len(Direction::Backward);
        if forward == 0 || backward == 0 {
            return Err(SolveError::Unreachable {
                positions_explored: checker.positions_explored(),
            });
        }
        let direction = if backward < forward {
            Direction::Backward
        } else {
            Direction::Forward
        };

        let batch = checker.take_frontier(direction);
        let successors = expand_batch(table, &batch);
        if config.verify_states {
            for successor in &successors {
                successor.check_labels().map_err(|e| {
                    SolveError::InternalConsistency(format!("expanded state is invalid: {e}"))
                })?;
            }
        }

        let depth = &mut depths[slot(direction)];
        *depth += 1;
        if let Some(distance) = checker.check_and_record(direction, &successors, *depth) {
            info!(distance, positions = checker.positions_explored(), "batched searches met");
            return Ok(BatchOutcome {
                distance,
                positions_explored: checker.positions_explored(),
            });
        }
        debug!(
            direction = ?direction,
            depth = *depth,
            batch = batch.len(),
            fresh = checker.frontier_len(direction),
            "batch level checked"
        );

        let explored = checker.positions_explored();
        if config.max_positions.is_some_and(|max| explored > max) {
            return Err(SolveError::SearchAbandoned {
                positions_explored: explored,
            });
        }
    }
}
