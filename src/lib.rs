//! Shortest-path search between cube states.
//!
//! A cube state assigns one of six labels to each of 54 facelet positions.
//! The 18 face turns act on states as fixed position permutations; the
//! bidirectional search in [`search`] finds a shortest move sequence between
//! any two states.

pub mod arena;
pub mod display;
pub mod error;
pub mod fingerprint;
pub mod moves;
pub mod scaling;
pub mod scramble;
pub mod search;
pub mod state;

pub use error::SolveError;
pub use fingerprint::Fingerprint;
pub use moves::{opposite_move, MoveTable};
pub use search::{solve, solve_with, BidirectionalSearch, SearchConfig, SearchOutcome};
pub use state::CubeState;
