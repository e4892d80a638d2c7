//! Bidirectional breadth-first search between two cube states.
//!
//! Two searches run against each other: one forward from the start state, one
//! backward from the goal state. The run loop expands one complete level at a
//! time, always from the direction with the smaller queue, and checks every
//! new successor against the other direction's visited map. The first match
//! ends the search.
//!
//! Why the first match is optimal: before a level is expanded, the two visited
//! maps (levels `0..=d` forward, `0..=k` backward) are disjoint, so any
//! connecting path is longer than `d + k`. A successor at depth `d + 1` can
//! only match a backward state at depth `k`, giving exactly `d + k + 1`.
//!
//! Key optimizations:
//! - Fingerprints pack a state into three words for fast hashing
//! - FxHashMap for the visited maps
//! - Queued states live in a reusable [`StatePool`]; successors are computed
//!   into one scratch buffer
//! - Moves on the face that was just turned are never tried

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use crate::arena::{SlotId, StatePool};
use crate::error::SolveError;
use crate::fingerprint::Fingerprint;
use crate::moves::{opposite_of_valid, same_face, MoveTable, NUM_MOVES};
use crate::state::CubeState;

/// Tuning knobs for a search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Give up once more than this many positions have been recorded.
    pub max_positions: Option<usize>,
    /// Recheck the label multiset of every successor.
    pub verify_states: bool,
    /// Emit a progress event every time a direction records this many positions.
    pub progress_interval: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_positions: None,
            verify_states: false,
            progress_interval: 10_000,
        }
    }
}

/// Which of the two searches a frontier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Rooted at the start state.
    Forward,
    /// Rooted at the goal state.
    Backward,
}

impl Direction {
    /// The other direction.
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    const fn index(self) -> usize {
        match self {
            Direction::Forward => 0,
            Direction::Backward => 1,
        }
    }
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Length of a shortest move sequence from start to goal.
    pub distance: usize,
    /// Positions recorded in both visited maps.
    pub positions_explored: usize,
    /// One shortest move sequence from start to goal.
    pub moves: Vec<usize>,
}

/// First-discovery record for a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Visit {
    distance: u8,
    /// Move that produced the state from its parent; `None` for the root.
    last_move: Option<u8>,
}

/// A discovered state waiting to be expanded.
#[derive(Debug, Clone, Copy)]
struct QueuedNode {
    slot: SlotId,
    distance: u8,
    last_move: Option<u8>,
}

/// Queue and visited map for one direction.
#[derive(Debug, Default)]
struct Frontier {
    queue: VecDeque<QueuedNode>,
    visited: FxHashMap<Fingerprint, Visit>,
}

impl Frontier {
    fn rooted_at(root: &CubeState, pool: &mut StatePool) -> Self {
        let mut frontier = Self::default();
        frontier.visited.insert(
            root.fingerprint(),
            Visit {
                distance: 0,
                last_move: None,
            },
        );
        frontier.queue.push_back(QueuedNode {
            slot: pool.store(root),
            distance: 0,
            last_move: None,
        });
        frontier
    }

    /// Walks parent links back to the root, returning the moves root-to-state.
    fn path_to(&self, table: &MoveTable, state: &CubeState) -> Result<Vec<usize>, SolveError> {
        let mut moves = Vec::new();
        let mut current = state.clone();
        let mut scratch = CubeState::solved();
        let mut visit = self.lookup(&current)?;

        while let Some(last_move) = visit.last_move {
            let last_move = last_move as usize;
            moves.push(last_move);
            current.permute_into(
                &table.permutations()[opposite_of_valid(last_move)],
                &mut scratch,
            );
            std::mem::swap(&mut current, &mut scratch);

            let parent = self.lookup(&current)?;
            if parent.distance + 1 != visit.distance {
                return Err(SolveError::InternalConsistency(format!(
                    "parent recorded at distance {} for child at distance {}",
                    parent.distance, visit.distance
                )));
            }
            visit = parent;
        }

        if visit.distance != 0 {
            return Err(SolveError::InternalConsistency(format!(
                "path ended at distance {} without reaching the root",
                visit.distance
            )));
        }
        moves.reverse();
        Ok(moves)
    }

    fn lookup(&self, state: &CubeState) -> Result<Visit, SolveError> {
        self.visited
            .get(&state.fingerprint())
            .copied()
            .ok_or_else(|| {
                SolveError::InternalConsistency("state on a search path was never recorded".into())
            })
    }
}

/// Where the two searches touched.
#[derive(Debug)]
struct Meeting {
    /// Direction whose expansion found the match.
    direction: Direction,
    /// The expanded state, recorded in `direction`.
    parent: CubeState,
    /// Move applied to `parent`.
    move_index: usize,
    /// The successor, recorded in the opposite direction.
    successor: CubeState,
    distance: usize,
}

/// Two-sided breadth-first search controller.
pub struct BidirectionalSearch<'t> {
    table: &'t MoveTable,
    config: SearchConfig,
    frontiers: [Frontier; 2],
    pool: StatePool,
    start: Fingerprint,
}

impl<'t> BidirectionalSearch<'t> {
    /// Sets up both frontiers after validating the endpoint states.
    pub fn new(
        table: &'t MoveTable,
        start: &CubeState,
        goal: &CubeState,
        config: SearchConfig,
    ) -> Result<Self, SolveError> {
        start.check_labels()?;
        goal.check_labels()?;

        let mut pool = StatePool::new();
        let forward = Frontier::rooted_at(start, &mut pool);
        let backward = Frontier::rooted_at(goal, &mut pool);

        Ok(Self {
            table,
            config,
            frontiers: [forward, backward],
            pool,
            start: start.fingerprint(),
        })
    }

    /// Total positions recorded across both visited maps.
    pub fn positions_explored(&self) -> usize {
        self.frontiers.iter().map(|f| f.visited.len()).sum()
    }

    /// Runs until the searches meet.
    pub fn run(mut self) -> Result<SearchOutcome, SolveError> {
        if self.frontiers[Direction::Backward.index()]
            .visited
            .contains_key(&self.start)
        {
            info!(positions = self.positions_explored(), "start equals goal");
            return Ok(SearchOutcome {
                distance: 0,
                positions_explored: self.positions_explored(),
                moves: Vec::new(),
            });
        }

        loop {
            let direction = self.next_direction()?;
            if let Some(meeting) = self.expand_level(direction)? {
                let moves = self.reconstruct(&meeting)?;
                if moves.len() != meeting.distance {
                    return Err(SolveError::InternalConsistency(format!(
                        "reconstructed {} moves for distance {}",
                        moves.len(),
                        meeting.distance
                    )));
                }
                info!(
                    distance = meeting.distance,
                    positions = self.positions_explored(),
                    direction = ?meeting.direction,
                    "searches met"
                );
                return Ok(SearchOutcome {
                    distance: meeting.distance,
                    positions_explored: self.positions_explored(),
                    moves,
                });
            }
        }
    }

    /// Picks the direction with the smaller queue; ties go forward.
    fn next_direction(&self) -> Result<Direction, SolveError> {
        let forward = self.frontiers[Direction::Forward.index()].queue.len();
        let backward = self.frontiers[Direction::Backward.index()].queue.len();
        if forward == 0 || backward == 0 {
            // one side has visited its whole component without meeting the other
            return Err(SolveError::Unreachable {
                positions_explored: self.positions_explored(),
            });
        }
        Ok(if backward < forward {
            Direction::Backward
        } else {
            Direction::Forward
        })
    }

    /// Expands every queued node at the front level of `direction`.
    fn expand_level(&mut self, direction: Direction) -> Result<Option<Meeting>, SolveError> {
        let Self {
            table,
            config,
            frontiers,
            pool,
            ..
        } = self;
        let (first, second) = frontiers.split_at_mut(1);
        let (own, other) = match direction {
            Direction::Forward => (&mut first[0], &second[0]),
            Direction::Backward => (&mut second[0], &first[0]),
        };

        let Some(level) = own.queue.front().map(|node| node.distance) else {
            return Ok(None);
        };

        let mut current = CubeState::solved();
        let mut scratch = CubeState::solved();
        let mut expanded = 0usize;

        while let Some(node) = own.queue.front().copied() {
            if node.distance != level {
                break;
            }
            own.queue.pop_front();
            expanded += 1;

            if !pool.take_into(node.slot, &mut current) {
                return Err(SolveError::InternalConsistency(
                    "queued node refers to a released slot".into(),
                ));
            }

            let child_distance = node.distance + 1;
            for move_index in 0..NUM_MOVES {
                if let Some(last) = node.last_move {
                    if same_face(move_index, last as usize) {
                        continue;
                    }
                }

                current.permute_into(&table.permutations()[move_index], &mut scratch);
                if config.verify_states {
                    scratch.check_labels().map_err(|e| {
                        SolveError::InternalConsistency(format!(
                            "move {move_index} broke label conservation: {e}"
                        ))
                    })?;
                }

                let fingerprint = scratch.fingerprint();
                if let Some(found) = other.visited.get(&fingerprint) {
                    return Ok(Some(Meeting {
                        direction,
                        parent: current,
                        move_index,
                        successor: scratch,
                        distance: child_distance as usize + found.distance as usize,
                    }));
                }

                if own.visited.contains_key(&fingerprint) {
                    continue;
                }
                own.visited.insert(
                    fingerprint,
                    Visit {
                        distance: child_distance,
                        last_move: Some(move_index as u8),
                    },
                );
                own.queue.push_back(QueuedNode {
                    slot: pool.store(&scratch),
                    distance: child_distance,
                    last_move: Some(move_index as u8),
                });

                let recorded = own.visited.len();
                if config.progress_interval > 0 && recorded % config.progress_interval == 0 {
                    debug!(direction = ?direction, positions = recorded, "progress");
                }
                let explored = recorded + other.visited.len();
                if config.max_positions.is_some_and(|max| explored > max) {
                    return Err(SolveError::SearchAbandoned {
                        positions_explored: explored,
                    });
                }
            }
        }

        debug!(
            direction = ?direction,
            depth = level + 1,
            expanded,
            queued = own.queue.len(),
            live = pool.live_count(),
            pooled = pool.capacity(),
            "level expanded"
        );
        Ok(None)
    }

    /// Rebuilds the full start-to-goal move sequence through a meeting point.
    fn reconstruct(&self, meeting: &Meeting) -> Result<Vec<usize>, SolveError> {
        let forward = &self.frontiers[Direction::Forward.index()];
        let backward = &self.frontiers[Direction::Backward.index()];

        // (state recorded forward, bridging move, state recorded backward)
        let (near, bridge, far) = match meeting.direction {
            Direction::Forward => (&meeting.parent, meeting.move_index, &meeting.successor),
            Direction::Backward => (
                &meeting.successor,
                opposite_of_valid(meeting.move_index),
                &meeting.parent,
            ),
        };

        let mut moves = forward.path_to(self.table, near)?;
        moves.push(bridge);
        let from_goal = backward.path_to(self.table, far)?;
        moves.extend(from_goal.iter().rev().map(|&m| opposite_of_valid(m)));
        Ok(moves)
    }
}

/// Finds a shortest move sequence from `start` to `goal` with default settings.
pub fn solve(start: &CubeState, goal: &CubeState) -> Result<SearchOutcome, SolveError> {
    let table = MoveTable::new();
    solve_with(&table, start, goal, SearchConfig::default())
}

/// Finds a shortest move sequence using a caller-owned table and config.
pub fn solve_with(
    table: &MoveTable,
    start: &CubeState,
    goal: &CubeState,
    config: SearchConfig,
) -> Result<SearchOutcome, SolveError> {
    BidirectionalSearch::new(table, start, goal, config)?.run()
}

/// Counts positions at each distance from the solved state.
///
/// Only the listed moves are used. Entry `d` of the result is the number of
/// positions first reached after `d` moves, for `d` in `0..=max_depth`.
pub fn distance_census(
    table: &MoveTable,
    moves: &[usize],
    max_depth: usize,
) -> Result<Vec<usize>, SolveError> {
    let permutations = moves
        .iter()
        .map(|&index| table.permutation(index))
        .collect::<Result<Vec<_>, _>>()?;

    let solved = CubeState::solved();
    let mut seen: FxHashSet<Fingerprint> = FxHashSet::default();
    seen.insert(solved.fingerprint());

    let mut counts = vec![1];
    let mut level = vec![solved];
    let mut scratch = CubeState::solved();

    for depth in 1..=max_depth {
        let mut next_level = Vec::new();
        for state in &level {
            for permutation in &permutations {
                state.permute_into(permutation, &mut scratch);
                if seen.insert(scratch.fingerprint()) {
                    next_level.push(scratch.clone());
                }
            }
        }
        debug!(depth, positions = next_level.len(), total = seen.len(), "census level");
        counts.push(next_level.len());
        if next_level.is_empty() {
            break;
        }
        level = next_level;
    }

    Ok(counts)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::moves::Permutation;
    use crate::scramble::scrambled_state;

    /// Standard table whose front quarter turn sends two facelets to one spot.
    pub(crate) fn label_dropping_table() -> MoveTable {
        let mut moves = *MoveTable::new().permutations();
        let mut mapping = *moves[0].mapping();
        mapping[9] = mapping[0];
        moves[0] = Permutation::from_mapping(mapping);
        MoveTable::from_permutations(moves)
    }

    /// Solved cube with two stickers of different colors exchanged.
    pub(crate) fn swapped_stickers() -> CubeState {
        let mut labels = *CubeState::solved().labels();
        labels.swap(1, 10);
        CubeState::from_labels(&labels).unwrap()
    }

    fn goal_after(table: &MoveTable, moves: &[usize]) -> CubeState {
        CubeState::solved().apply_sequence(table, moves).unwrap()
    }

    fn assert_no_repeated_face(moves: &[usize]) {
        for pair in moves.windows(2) {
            assert!(
                !same_face(pair[0], pair[1]),
                "Consecutive moves on one face: {moves:?}"
            );
        }
    }

    #[test]
    fn test_same_state_is_distance_zero() {
        let table = MoveTable::new();
        let (state, _) = scrambled_state(&table, 11, 20).unwrap();
        let outcome = solve_with(&table, &state, &state, SearchConfig::default()).unwrap();
        assert_eq!(outcome.distance, 0);
        assert_eq!(outcome.positions_explored, 2);
        assert!(outcome.moves.is_empty());
    }

    #[test]
    fn test_single_move() {
        let table = MoveTable::new();
        for index in 0..NUM_MOVES {
            let goal = goal_after(&table, &[index]);
            let outcome = solve_with(&table, &CubeState::solved(), &goal, SearchConfig::default())
                .unwrap();
            assert_eq!(outcome.distance, 1, "Move {index}");
            assert_eq!(outcome.moves, vec![index]);
        }
    }

    #[test]
    fn test_front_left_top() {
        let table = MoveTable::new();
        let goal = goal_after(&table, &[0, 1, 2]);
        let start = CubeState::solved();

        let first = solve_with(&table, &start, &goal, SearchConfig::default()).unwrap();
        assert_eq!(first.distance, 3);
        assert_eq!(
            CubeState::solved().apply_sequence(&table, &first.moves).unwrap(),
            goal
        );

        // expansion order is fixed, so the work done is too
        let second = solve_with(&table, &start, &goal, SearchConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_solution_reaches_goal() {
        let table = MoveTable::new();
        for seed in 0..6 {
            let (goal, scramble) = scrambled_state(&table, seed, 5).unwrap();
            let outcome =
                solve_with(&table, &CubeState::solved(), &goal, SearchConfig::default()).unwrap();
            assert!(outcome.distance <= scramble.len());
            assert_eq!(outcome.moves.len(), outcome.distance);
            assert_no_repeated_face(&outcome.moves);
            assert_eq!(
                CubeState::solved().apply_sequence(&table, &outcome.moves).unwrap(),
                goal,
                "Seed {seed}"
            );
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let table = MoveTable::new();
        let (goal, _) = scrambled_state(&table, 3, 6).unwrap();
        let there = solve_with(&table, &CubeState::solved(), &goal, SearchConfig::default())
            .unwrap();
        let back = solve_with(&table, &goal, &CubeState::solved(), SearchConfig::default())
            .unwrap();
        assert_eq!(there.distance, back.distance);
    }

    #[test]
    fn test_distance_matches_census_depth() {
        // every position at census depth 2 must solve in exactly 2 moves
        let table = MoveTable::new();
        for first in [0, 7, 14] {
            for second in [3, 10, 17] {
                let goal = goal_after(&table, &[first, second]);
                let outcome =
                    solve_with(&table, &CubeState::solved(), &goal, SearchConfig::default())
                        .unwrap();
                assert_eq!(outcome.distance, 2, "Moves {first}, {second}");
            }
        }
    }

    #[test]
    fn test_cancelling_moves_collapse() {
        let table = MoveTable::new();
        // F F' R2 R2 U == U
        let goal = goal_after(&table, &[0, 12, 9, 9, 2]);
        let outcome =
            solve_with(&table, &CubeState::solved(), &goal, SearchConfig::default()).unwrap();
        assert_eq!(outcome.distance, 1);
        assert_eq!(outcome.moves, vec![2]);
    }

    #[test]
    fn test_verified_search_agrees() {
        let table = MoveTable::new();
        let (goal, _) = scrambled_state(&table, 21, 4).unwrap();
        let plain = solve_with(&table, &CubeState::solved(), &goal, SearchConfig::default())
            .unwrap();
        let config = SearchConfig {
            verify_states: true,
            ..SearchConfig::default()
        };
        let verified = solve_with(&table, &CubeState::solved(), &goal, config).unwrap();
        assert_eq!(plain, verified);
    }

    #[test]
    fn test_work_ceiling_abandons_search() {
        let table = MoveTable::new();
        let goal = goal_after(&table, &[0, 1, 2, 3, 4, 5, 0, 1]);
        let config = SearchConfig {
            max_positions: Some(500),
            ..SearchConfig::default()
        };
        match solve_with(&table, &CubeState::solved(), &goal, config) {
            Err(SolveError::SearchAbandoned { positions_explored }) => {
                assert!(positions_explored > 500);
            }
            other => panic!("expected SearchAbandoned, got {other:?}"),
        }
    }

    #[test]
    fn test_verification_catches_broken_move() {
        let table = label_dropping_table();
        let goal = CubeState::solved().apply(&MoveTable::new(), 5).unwrap();
        let config = SearchConfig {
            verify_states: true,
            ..SearchConfig::default()
        };
        assert!(matches!(
            solve_with(&table, &CubeState::solved(), &goal, config),
            Err(SolveError::InternalConsistency(_))
        ));
    }

    #[test]
    fn test_exhausted_direction_is_unreachable() {
        // with every move the identity, the start's component is just the start
        let table = MoveTable::from_permutations([Permutation::IDENTITY; NUM_MOVES]);
        let goal = CubeState::solved().apply(&MoveTable::new(), 0).unwrap();
        assert_eq!(
            solve_with(&table, &CubeState::solved(), &goal, SearchConfig::default()),
            Err(SolveError::Unreachable {
                positions_explored: 2
            })
        );
    }

    #[test]
    fn test_unreachable_goal_is_abandoned() {
        let table = MoveTable::new();
        let config = SearchConfig {
            max_positions: Some(2_000),
            ..SearchConfig::default()
        };
        assert!(matches!(
            solve_with(&table, &CubeState::solved(), &swapped_stickers(), config),
            Err(SolveError::SearchAbandoned { positions_explored }) if positions_explored > 2_000
        ));
    }

    #[test]
    fn test_path_without_root_is_inconsistent() {
        let table = MoveTable::new();
        let turned = CubeState::solved().apply(&table, 0).unwrap();
        let mut frontier = Frontier::default();
        frontier.visited.insert(
            turned.fingerprint(),
            Visit {
                distance: 1,
                last_move: Some(0),
            },
        );
        assert!(matches!(
            frontier.path_to(&table, &turned),
            Err(SolveError::InternalConsistency(_))
        ));
    }

    #[test]
    fn test_path_with_distance_gap_is_inconsistent() {
        let table = MoveTable::new();
        let mut pool = StatePool::new();
        let mut frontier = Frontier::rooted_at(&CubeState::solved(), &mut pool);
        let turned = CubeState::solved().apply(&table, 0).unwrap();
        frontier.visited.insert(
            turned.fingerprint(),
            Visit {
                distance: 2,
                last_move: Some(0),
            },
        );
        assert!(matches!(
            frontier.path_to(&table, &turned),
            Err(SolveError::InternalConsistency(_))
        ));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let table = MoveTable::new();
        let mut labels = *CubeState::solved().labels();
        labels[0] = 5;
        let bad = CubeState::from_cells_unchecked(labels);
        assert!(matches!(
            BidirectionalSearch::new(&table, &CubeState::solved(), &bad, SearchConfig::default()),
            Err(SolveError::InvalidState(_))
        ));
    }

    #[test]
    fn test_solve_uses_default_table() {
        let table = MoveTable::new();
        let goal = goal_after(&table, &[3, 10]);
        let outcome = solve(&CubeState::solved(), &goal).unwrap();
        assert_eq!(outcome.distance, 2);
    }

    #[test]
    fn test_census_all_moves() {
        let table = MoveTable::new();
        let moves: Vec<usize> = (0..NUM_MOVES).collect();
        let counts = distance_census(&table, &moves, 3).unwrap();
        assert_eq!(counts, vec![1, 18, 243, 3240]);
    }

    #[test]
    fn test_census_quarter_turns_only() {
        let table = MoveTable::new();
        let moves: Vec<usize> = (0..6).collect();
        let counts = distance_census(&table, &moves, 4).unwrap();
        assert_eq!(counts, vec![1, 6, 33, 180, 975]);
    }

    #[test]
    fn test_census_single_face_is_finite() {
        // one quarter turn generates a cyclic group of order 4
        let table = MoveTable::new();
        let counts = distance_census(&table, &[0], 10).unwrap();
        assert_eq!(counts, vec![1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_census_rejects_bad_move() {
        let table = MoveTable::new();
        assert_eq!(
            distance_census(&table, &[0, 18], 2),
            Err(SolveError::InvalidMove(18))
        );
    }
}
