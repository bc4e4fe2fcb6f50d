//! Sliding-tile (N-puzzle) solver.
//!
//! Boards are shuffled into solvable configurations and solved with A* under
//! one of three heuristics. `Solver` wraps one search run and can be
//! cancelled from another thread.

pub mod board;
pub mod heuristic;
mod pqueue;
pub mod search;
pub mod shuffle;
pub mod solvability;
pub mod solver;

pub use board::{Board, BoardError, Direction, Position};
pub use heuristic::{Heuristic, HeuristicKind};
pub use search::{Search, SearchOutcome};
pub use shuffle::{shuffle, shuffle_seeded, shuffle_with_rng};
pub use solvability::is_solvable;
pub use solver::{Solver, SolverError, SolverStatus};
