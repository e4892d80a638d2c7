//! The 18 face turns as fixed permutations of the 54 facelet positions.
//!
//! Moves are numbered in three blocks of six, one entry per face in the order
//! front, left, top, right, bottom, back:
//! - Moves 0-5: quarter turns
//! - Moves 6-11: double turns (quarter turn applied twice)
//! - Moves 12-17: reverse quarter turns (quarter turn applied three times)
//!
//! Other components (scrambles, rendering, the CLI) rely on this numbering.

use std::fmt;

use crate::error::SolveError;
use crate::state::NUM_POSITIONS;

/// Number of faces on the cube.
pub const NUM_FACES: usize = 6;

/// Number of distinct moves (6 faces x 3 turn kinds).
pub const NUM_MOVES: usize = 18;

/// Number of position cycles declared per face.
const CYCLES_PER_FACE: usize = 5;

/// The position cycles making up one quarter turn.
type FaceCycles = [[u8; 4]; CYCLES_PER_FACE];

/// Quarter-turn definitions, one per face.
///
/// Each face lists its corner cycle, its edge cycle, then three cycles that
/// carry the border facelets of the adjacent faces around with it. Within a
/// cycle `[p0, p1, p2, p3]` the occupant of `p0` moves to `p1`, `p1` to `p2`,
/// and so on, wrapping back to `p0`.
const FACE_CYCLES: [FaceCycles; NUM_FACES] = [
    // front
    [
        [0, 2, 8, 6],
        [1, 5, 7, 3],
        [11, 26, 33, 36],
        [14, 25, 30, 37],
        [17, 24, 27, 38],
    ],
    // left
    [
        [9, 11, 17, 15],
        [10, 14, 16, 12],
        [18, 0, 36, 53],
        [21, 3, 39, 50],
        [24, 6, 42, 47],
    ],
    // top
    [
        [18, 20, 26, 24],
        [19, 23, 25, 21],
        [47, 29, 2, 11],
        [46, 28, 1, 10],
        [45, 27, 0, 9],
    ],
    // right
    [
        [27, 29, 35, 33],
        [28, 32, 34, 30],
        [26, 45, 44, 8],
        [23, 48, 41, 5],
        [20, 51, 38, 2],
    ],
    // bottom
    [
        [36, 38, 44, 42],
        [37, 41, 43, 39],
        [6, 33, 51, 15],
        [7, 34, 52, 16],
        [8, 35, 53, 17],
    ],
    // back
    [
        [45, 47, 53, 51],
        [46, 50, 52, 48],
        [20, 9, 42, 35],
        [19, 12, 43, 32],
        [18, 15, 44, 29],
    ],
];

/// One of the six cube faces, in move-index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Left,
    Top,
    Right,
    Bottom,
    Back,
}

impl Face {
    /// All faces in move-index order.
    pub const ALL: [Face; NUM_FACES] = [
        Face::Front,
        Face::Left,
        Face::Top,
        Face::Right,
        Face::Bottom,
        Face::Back,
    ];

    /// Position of this face in move-index order (0-5).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-letter face name used in move notation.
    pub const fn letter(self) -> char {
        match self {
            Face::Front => 'F',
            Face::Left => 'L',
            Face::Top => 'U',
            Face::Right => 'R',
            Face::Bottom => 'D',
            Face::Back => 'B',
        }
    }
}

/// How far a face is turned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    Quarter,
    Double,
    Reverse,
}

impl Turn {
    const fn block_offset(self) -> usize {
        match self {
            Turn::Quarter => 0,
            Turn::Double => NUM_FACES,
            Turn::Reverse => 2 * NUM_FACES,
        }
    }

    /// The turn that undoes this one.
    pub const fn inverse(self) -> Self {
        match self {
            Turn::Quarter => Turn::Reverse,
            Turn::Double => Turn::Double,
            Turn::Reverse => Turn::Quarter,
        }
    }
}

/// Returns the move index for turning `face` by `turn`.
pub const fn move_index(face: Face, turn: Turn) -> usize {
    turn.block_offset() + face.index()
}

/// Splits a move index into its face and turn.
pub fn decompose(index: usize) -> Result<(Face, Turn), SolveError> {
    if index >= NUM_MOVES {
        return Err(SolveError::InvalidMove(index));
    }
    let turn = match index / NUM_FACES {
        0 => Turn::Quarter,
        1 => Turn::Double,
        _ => Turn::Reverse,
    };
    Ok((Face::ALL[index % NUM_FACES], turn))
}

/// Returns true if both moves turn the same face.
#[inline(always)]
pub const fn same_face(a: usize, b: usize) -> bool {
    a % NUM_FACES == b % NUM_FACES
}

/// Returns the move that undoes `index`.
///
/// Quarter and reverse-quarter turns of a face are paired; double turns undo
/// themselves.
pub fn opposite_move(index: usize) -> Result<usize, SolveError> {
    let (face, turn) = decompose(index)?;
    Ok(move_index(face, turn.inverse()))
}

/// Move index without bounds checking, for indices already known valid.
#[inline(always)]
pub(crate) const fn opposite_of_valid(index: usize) -> usize {
    if index < NUM_FACES {
        index + 2 * NUM_FACES
    } else if index < 2 * NUM_FACES {
        index
    } else {
        index - 2 * NUM_FACES
    }
}

/// Display wrapper giving a move index its short notation (`F`, `U2`, `B'`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveName(pub usize);

impl fmt::Display for MoveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match decompose(self.0) {
            Ok((face, Turn::Quarter)) => write!(f, "{}", face.letter()),
            Ok((face, Turn::Double)) => write!(f, "{}2", face.letter()),
            Ok((face, Turn::Reverse)) => write!(f, "{}'", face.letter()),
            Err(_) => write!(f, "?{}", self.0),
        }
    }
}

/// Formats a move sequence as space-separated notation.
pub fn format_moves(moves: &[usize]) -> String {
    moves
        .iter()
        .map(|&index| MoveName(index).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A permutation of facelet positions.
///
/// Entry `p` is the destination of the occupant currently at position `p`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Permutation([u8; NUM_POSITIONS]);

impl Permutation {
    /// Wraps a raw destination mapping without checking it.
    #[cfg(test)]
    pub(crate) const fn from_mapping(mapping: [u8; NUM_POSITIONS]) -> Self {
        Self(mapping)
    }

    /// The permutation that leaves every position in place.
    pub const IDENTITY: Self = {
        let mut mapping = [0u8; NUM_POSITIONS];
        let mut p = 0;
        while p < NUM_POSITIONS {
            mapping[p] = p as u8;
            p += 1;
        }
        Self(mapping)
    };

    /// Builds a quarter turn from its position cycles.
    const fn from_cycles(cycles: &FaceCycles) -> Self {
        let mut mapping = Self::IDENTITY.0;
        let mut c = 0;
        while c < CYCLES_PER_FACE {
            let cycle = cycles[c];
            let mut n = 0;
            while n < cycle.len() {
                mapping[cycle[n] as usize] = cycle[(n + 1) % cycle.len()];
                n += 1;
            }
            c += 1;
        }
        Self(mapping)
    }

    /// Composes two permutations: `self` is applied first, then `next`.
    pub const fn then(&self, next: &Self) -> Self {
        let mut mapping = [0u8; NUM_POSITIONS];
        let mut p = 0;
        while p < NUM_POSITIONS {
            mapping[p] = next.0[self.0[p] as usize];
            p += 1;
        }
        Self(mapping)
    }

    /// Destination of each position, indexed by source position.
    #[inline(always)]
    pub fn mapping(&self) -> &[u8; NUM_POSITIONS] {
        &self.0
    }

    /// Number of positions this permutation moves.
    pub(crate) fn moved_count(&self) -> usize {
        self.0
            .iter()
            .enumerate()
            .filter(|&(source, &dest)| source != dest as usize)
            .count()
    }

    /// Returns true if every position is hit exactly once.
    pub fn is_bijection(&self) -> bool {
        let mut seen = [false; NUM_POSITIONS];
        for &dest in &self.0 {
            let dest = dest as usize;
            if dest >= NUM_POSITIONS || seen[dest] {
                return false;
            }
            seen[dest] = true;
        }
        true
    }
}

/// The 18 move permutations, built once and shared read-only by the search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveTable {
    moves: [Permutation; NUM_MOVES],
}

impl MoveTable {
    /// Builds the table from the face definitions.
    ///
    /// The build is deterministic, so every table is identical.
    pub const fn new() -> Self {
        let mut moves = [Permutation::IDENTITY; NUM_MOVES];
        let mut face = 0;
        while face < NUM_FACES {
            let quarter = Permutation::from_cycles(&FACE_CYCLES[face]);
            let double = quarter.then(&quarter);
            moves[face] = quarter;
            moves[face + NUM_FACES] = double;
            moves[face + 2 * NUM_FACES] = double.then(&quarter);
            face += 1;
        }
        Self { moves }
    }

    /// Builds a table from arbitrary permutations, bypassing the face definitions.
    #[cfg(test)]
    pub(crate) const fn from_permutations(moves: [Permutation; NUM_MOVES]) -> Self {
        Self { moves }
    }

    /// Returns the permutation for a move index.
    pub fn permutation(&self, index: usize) -> Result<&Permutation, SolveError> {
        self.moves.get(index).ok_or(SolveError::InvalidMove(index))
    }

    /// All permutations in move-index order.
    #[inline(always)]
    pub fn permutations(&self) -> &[Permutation; NUM_MOVES] {
        &self.moves
    }

    /// Checks the group identities every correct table satisfies.
    ///
    /// A failure here means the face definitions are wrong.
    pub fn validate(&self) -> Result<(), SolveError> {
        for (index, permutation) in self.moves.iter().enumerate() {
            if !permutation.is_bijection() {
                return Err(SolveError::InternalConsistency(format!(
                    "move {index} is not a bijection"
                )));
            }
            // 8 facelets on the turned face plus 12 on the adjacent borders
            if permutation.moved_count() != 20 {
                return Err(SolveError::InternalConsistency(format!(
                    "move {index} shifts {} positions, expected 20",
                    permutation.moved_count()
                )));
            }
            let inverse = &self.moves[opposite_of_valid(index)];
            if permutation.then(inverse) != Permutation::IDENTITY {
                return Err(SolveError::InternalConsistency(format!(
                    "move {index} is not undone by move {}",
                    opposite_of_valid(index)
                )));
            }
        }

        for face in 0..NUM_FACES {
            let quarter = &self.moves[face];
            let mut power = Permutation::IDENTITY;
            for turns in 1..=4 {
                power = power.then(quarter);
                let is_identity = power == Permutation::IDENTITY;
                if is_identity != (turns == 4) {
                    return Err(SolveError::InternalConsistency(format!(
                        "quarter turn of face {face} has wrong order"
                    )));
                }
            }
        }

        Ok(())
    }
}

impl Default for MoveTable {
    fn default() -> Self {
        Self::new()
    }
}
