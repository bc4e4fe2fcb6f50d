use crate::board::{Board, BoardError, Direction};
use crate::heuristic::{HeuristicKind, UnknownHeuristic};
use crate::search::{Search, SearchOutcome};
use crate::solvability::is_solvable;
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lifecycle of a solver: `Ready -> Running -> {Solved | Exhausted | Stopped}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    Ready,
    Running,
    Solved,
    /// Every reachable board was expanded without finding the goal
    Exhausted,
    /// Cancelled through `Solver::stop`
    Stopped,
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverStatus::Ready => write!(f, "ready"),
            SolverStatus::Running => write!(f, "running"),
            SolverStatus::Solved => write!(f, "solved"),
            SolverStatus::Exhausted => write!(f, "exhausted"),
            SolverStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// Error type for setting up a solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// The board could not be built
    Board(BoardError),
    /// The heuristic name is not recognised
    UnknownHeuristic(UnknownHeuristic),
    /// The board cannot reach the goal
    Unsolvable,
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::Board(err) => write!(f, "Invalid board: {}", err),
            SolverError::UnknownHeuristic(err) => write!(f, "{}", err),
            SolverError::Unsolvable => write!(f, "Board is not solvable"),
        }
    }
}

impl Error for SolverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SolverError::Board(err) => Some(err),
            SolverError::UnknownHeuristic(err) => Some(err),
            SolverError::Unsolvable => None,
        }
    }
}

impl From<BoardError> for SolverError {
    fn from(err: BoardError) -> Self {
        SolverError::Board(err)
    }
}

impl From<UnknownHeuristic> for SolverError {
    fn from(err: UnknownHeuristic) -> Self {
        SolverError::UnknownHeuristic(err)
    }
}

struct Progress {
    status: SolverStatus,
    solution: Vec<Board>,
    nodes_expanded: usize,
}

/// Owns a single search run for one starting board.
///
/// `Solver` is `Sync`: share it through an `Arc`, call `run` on a worker
/// thread and `stop` from anywhere. The result of the first run is kept,
/// later calls to `run` return its status without searching again. Calling
/// `stop` before `run` makes the run finish immediately as `Stopped`.
pub struct Solver {
    start: Board,
    heuristic: HeuristicKind,
    stop: AtomicBool,
    progress: Mutex<Progress>,
}

impl Solver {
    pub fn new(start: Board, heuristic: HeuristicKind) -> Result<Self, SolverError> {
        if !is_solvable(&start) {
            return Err(SolverError::Unsolvable);
        }
        Ok(Solver {
            start,
            heuristic,
            stop: AtomicBool::new(false),
            progress: Mutex::new(Progress {
                status: SolverStatus::Ready,
                solution: Vec::new(),
                nodes_expanded: 0,
            }),
        })
    }

    /// Build a solver from a heuristic name such as `"manhattan_distance"`.
    pub fn with_heuristic_name(start: Board, heuristic: &str) -> Result<Self, SolverError> {
        Self::new(start, heuristic.parse()?)
    }

    /// Build a solver from board text (see `Board::from_text`).
    pub fn from_text(text: &str, heuristic: HeuristicKind) -> Result<Self, SolverError> {
        Self::new(Board::from_text(text)?, heuristic)
    }

    fn progress(&self) -> MutexGuard<'_, Progress> {
        // a panicking run leaves nothing half-written worth discarding
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the search to completion or cancellation, blocking the caller.
    ///
    /// The lock on the result is not held while searching, so `stop`,
    /// `status` and the other accessors stay responsive from other threads.
    /// A start board the search refuses is returned as an error and leaves
    /// the solver `Ready`.
    pub fn run(&self) -> Result<SolverStatus, SolverError> {
        {
            let mut progress = self.progress();
            if progress.status != SolverStatus::Ready {
                return Ok(progress.status);
            }
            if self.stop.load(Ordering::Relaxed) {
                log::debug!("Solver stopped before it started");
                progress.status = SolverStatus::Stopped;
                return Ok(progress.status);
            }
            progress.status = SolverStatus::Running;
        }

        let mut search = Search::new(self.heuristic, &self.stop);
        let outcome = search.run(&self.start);

        let mut progress = self.progress();
        progress.nodes_expanded = search.nodes_expanded();
        let status = match outcome {
            Ok(SearchOutcome::Solved(path)) => {
                progress.solution = path;
                SolverStatus::Solved
            }
            Ok(SearchOutcome::Exhausted) => {
                log::warn!("Search exhausted on a board classified as solvable");
                SolverStatus::Exhausted
            }
            Ok(SearchOutcome::Stopped) => SolverStatus::Stopped,
            Err(err) => {
                log::error!("Search refused its start board: {}", err);
                progress.status = SolverStatus::Ready;
                return Err(err);
            }
        };
        progress.status = status;
        log::debug!(
            "Solver finished: {} with {} expanded nodes",
            progress.status,
            progress.nodes_expanded
        );
        Ok(progress.status)
    }

    /// Request cancellation. Safe to call any number of times, from any thread.
    pub fn stop(&self) {
        if !self.stop.swap(true, Ordering::Relaxed) {
            log::debug!("Stop requested");
        }
    }

    pub fn status(&self) -> SolverStatus {
        self.progress().status
    }

    /// Boards from the start to the goal inclusive; empty unless solved, or if the start was solved already.
    pub fn solution(&self) -> Vec<Board> {
        self.progress().solution.clone()
    }

    /// The solution as the directions the blank travels.
    pub fn solution_moves(&self) -> Vec<Direction> {
        self.progress()
            .solution
            .windows(2)
            .filter_map(|pair| pair[0].direction_to(&pair[1]))
            .collect()
    }

    /// Nodes expanded by the run; zero until it finishes.
    pub fn expanded_node_count(&self) -> usize {
        self.progress().nodes_expanded
    }

    pub fn start(&self) -> &Board {
        &self.start
    }

    pub fn heuristic(&self) -> HeuristicKind {
        self.heuristic
    }
}
