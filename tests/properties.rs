//! Property tests for the move engine and search.

use proptest::collection::vec;
use proptest::prelude::*;

use rcube::moves::{same_face, NUM_MOVES};
use rcube::{opposite_move, solve_with, CubeState, MoveTable, SearchConfig};

fn moves(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    vec(0..NUM_MOVES, 0..max_len)
}

proptest! {
    /// Every reachable state holds each label exactly nine times.
    #[test]
    fn labels_are_conserved(sequence in moves(60)) {
        let table = MoveTable::new();
        let state = CubeState::solved().apply_sequence(&table, &sequence).unwrap();
        prop_assert_eq!(state.label_counts(), [9; 6]);
    }

    /// Undoing a sequence move by move in reverse returns to the start.
    #[test]
    fn inverse_sequence_restores_state(sequence in moves(40)) {
        let table = MoveTable::new();
        let scrambled = CubeState::solved().apply_sequence(&table, &sequence).unwrap();
        let inverse: Vec<usize> = sequence
            .iter()
            .rev()
            .map(|&m| opposite_move(m).unwrap())
            .collect();
        prop_assert_eq!(
            scrambled.apply_sequence(&table, &inverse).unwrap(),
            CubeState::solved()
        );
    }

    /// Fingerprints agree exactly when states agree.
    #[test]
    fn fingerprint_is_exact(a in moves(20), b in moves(20)) {
        let table = MoveTable::new();
        let first = CubeState::solved().apply_sequence(&table, &a).unwrap();
        let second = CubeState::solved().apply_sequence(&table, &b).unwrap();
        prop_assert_eq!(first == second, first.fingerprint() == second.fingerprint());
        prop_assert_eq!(first.fingerprint().to_state(), first);
    }

    /// Short scrambles are solved optimally by a valid, non-redundant sequence.
    #[test]
    fn search_finds_short_solutions(sequence in moves(5)) {
        let table = MoveTable::new();
        let goal = CubeState::solved().apply_sequence(&table, &sequence).unwrap();
        let outcome =
            solve_with(&table, &CubeState::solved(), &goal, SearchConfig::default()).unwrap();

        prop_assert!(outcome.distance <= sequence.len());
        prop_assert_eq!(outcome.moves.len(), outcome.distance);
        prop_assert_eq!(
            CubeState::solved().apply_sequence(&table, &outcome.moves).unwrap(),
            goal
        );
        for pair in outcome.moves.windows(2) {
            prop_assert!(!same_face(pair[0], pair[1]));
        }
    }
}
