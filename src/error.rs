//! Error type shared by the move table, state engine and search controller.

use thiserror::Error;

/// Errors raised while building states, applying moves or searching.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    /// The move index is outside `0..18`.
    #[error("invalid move index {0} (expected 0..18)")]
    InvalidMove(usize),

    /// A label sequence does not describe a valid cube state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The move table or transition engine produced an impossible result.
    #[error("internal consistency failure: {0}")]
    InternalConsistency(String),

    /// The configured work ceiling was reached before the searches met.
    #[error("search abandoned after exploring {positions_explored} positions")]
    SearchAbandoned { positions_explored: usize },

    /// Raised only when one direction's queue empties without meeting the other.
    ///
    /// With the standard move table both components hold tens of quintillions
    /// of states, so a goal outside the start's orbit never empties a queue in
    /// practice. Bound such searches with `SearchConfig::max_positions`, which
    /// ends them with [`SolveError::SearchAbandoned`].
    #[error("goal is unreachable from start ({positions_explored} positions explored)")]
    Unreachable { positions_explored: usize },
}
