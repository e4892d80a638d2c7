//! Exact, compact lookup keys for cube states.
//!
//! Each label fits in 3 bits, so 21 positions pack into one `u64` and the
//! whole state into three words. The packing is injective: two fingerprints
//! are equal exactly when the states agree position by position.

use crate::state::{CubeState, NUM_POSITIONS};

/// Bits used per packed label.
const BITS_PER_LABEL: usize = 3;

/// Labels packed into each word.
const LABELS_PER_WORD: usize = 64 / BITS_PER_LABEL;

/// Words needed to hold all positions.
const WORDS: usize = NUM_POSITIONS.div_ceil(LABELS_PER_WORD);

const LABEL_MASK: u64 = (1 << BITS_PER_LABEL) - 1;

/// Packed labels of a cube state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u64; WORDS]);

impl Fingerprint {
    /// Packs a state.
    #[inline]
    pub fn of(state: &CubeState) -> Self {
        let mut words = [0u64; WORDS];
        for (chunk, word) in state.labels().chunks(LABELS_PER_WORD).zip(&mut words) {
            // later positions in a chunk occupy higher bits
            *word = chunk
                .iter()
                .rev()
                .fold(0u64, |acc, &label| (acc << BITS_PER_LABEL) | label as u64);
        }
        Self(words)
    }

    /// Recovers the state this fingerprint was taken from.
    pub fn to_state(&self) -> CubeState {
        let mut cells = [0u8; NUM_POSITIONS];
        for (position, cell) in cells.iter_mut().enumerate() {
            let word = self.0[position / LABELS_PER_WORD];
            let shift = (position % LABELS_PER_WORD) * BITS_PER_LABEL;
            *cell = ((word >> shift) & LABEL_MASK) as u8;
        }
        CubeState::from_cells_unchecked(cells)
    }
}
