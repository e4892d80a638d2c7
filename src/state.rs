//! Cube states and the transition function that applies moves to them.
//!
//! A state assigns a label (0-5) to each of the 54 facelet positions.
//! Positions are numbered face by face in move-index order (front, left, top,
//! right, bottom, back), nine per face, row-major from the top-left.

use std::ops::Index;

use crate::error::SolveError;
use crate::fingerprint::Fingerprint;
use crate::moves::{MoveTable, Permutation};

/// Number of facelet positions.
pub const NUM_POSITIONS: usize = 54;

/// Number of distinct labels (one per face color).
pub const NUM_LABELS: usize = 6;

/// How many times each label occurs in every valid state.
pub const LABEL_MULTIPLICITY: usize = 9;

/// The label on every facelet position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeState {
    cells: [u8; NUM_POSITIONS],
}

impl CubeState {
    /// The solved cube: face `k` carries label `k` on all nine positions.
    pub const fn solved() -> Self {
        let mut cells = [0u8; NUM_POSITIONS];
        let mut p = 0;
        while p < NUM_POSITIONS {
            cells[p] = (p / LABEL_MULTIPLICITY) as u8;
            p += 1;
        }
        Self { cells }
    }

    /// Builds a state from raw labels, checking the label multiset.
    pub fn from_labels(labels: &[u8]) -> Result<Self, SolveError> {
        let cells: [u8; NUM_POSITIONS] = labels.try_into().map_err(|_| {
            SolveError::InvalidState(format!(
                "expected {NUM_POSITIONS} labels, got {}",
                labels.len()
            ))
        })?;
        let state = Self { cells };
        state.check_labels()?;
        Ok(state)
    }

    /// Wraps raw labels without validation; callers guarantee the invariant.
    pub(crate) const fn from_cells_unchecked(cells: [u8; NUM_POSITIONS]) -> Self {
        Self { cells }
    }

    /// The labels in canonical position order.
    #[inline(always)]
    pub fn labels(&self) -> &[u8; NUM_POSITIONS] {
        &self.cells
    }

    /// Counts how often each label occurs.
    ///
    /// Labels outside `0..6` are not counted.
    pub fn label_counts(&self) -> [usize; NUM_LABELS] {
        let mut counts = [0usize; NUM_LABELS];
        for &label in &self.cells {
            if let Some(count) = counts.get_mut(label as usize) {
                *count += 1;
            }
        }
        counts
    }

    /// Checks that every label is in range and occurs exactly nine times.
    pub fn check_labels(&self) -> Result<(), SolveError> {
        if let Some((position, &label)) = self
            .cells
            .iter()
            .enumerate()
            .find(|&(_, &label)| label as usize >= NUM_LABELS)
        {
            return Err(SolveError::InvalidState(format!(
                "label {label} at position {position} is out of range"
            )));
        }
        for (label, &count) in self.label_counts().iter().enumerate() {
            if count != LABEL_MULTIPLICITY {
                return Err(SolveError::InvalidState(format!(
                    "label {label} occurs {count} times, expected {LABEL_MULTIPLICITY}"
                )));
            }
        }
        Ok(())
    }

    /// Returns the exact lookup key for this state.
    #[inline]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }

    /// Returns a new state with move `index` applied.
    pub fn apply(&self, table: &MoveTable, index: usize) -> Result<Self, SolveError> {
        let mut next = Self::solved();
        self.apply_into(table, index, &mut next)?;
        Ok(next)
    }

    /// Writes the result of applying move `index` into `scratch`.
    ///
    /// Produces exactly what [`CubeState::apply`] returns, without allocating.
    pub fn apply_into(
        &self,
        table: &MoveTable,
        index: usize,
        scratch: &mut Self,
    ) -> Result<(), SolveError> {
        let permutation = table.permutation(index)?;
        self.permute_into(permutation, scratch);
        Ok(())
    }

    /// Applies a sequence of moves in order.
    pub fn apply_sequence(&self, table: &MoveTable, moves: &[usize]) -> Result<Self, SolveError> {
        let mut current = self.clone();
        let mut scratch = Self::solved();
        for &index in moves {
            current.apply_into(table, index, &mut scratch)?;
            std::mem::swap(&mut current, &mut scratch);
        }
        Ok(current)
    }

    /// Moves each label to its permuted position: `out[perm[p]] = self[p]`.
    #[inline(always)]
    pub(crate) fn permute_into(&self, permutation: &Permutation, out: &mut Self) {
        for (&label, &dest) in self.cells.iter().zip(permutation.mapping()) {
            out.cells[dest as usize] = label;
        }
    }
}

impl Default for CubeState {
    fn default() -> Self {
        Self::solved()
    }
}

impl Index<usize> for CubeState {
    type Output = u8;

    fn index(&self, position: usize) -> &u8 {
        &self.cells[position]
    }
}
