use crate::board::Board;
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

/// Trait for estimating the number of moves left to reach the solved board.
pub trait Heuristic {
    /// Estimated moves from `board` to the goal; zero on the goal itself.
    fn estimate(&self, board: &Board) -> u16;
}

/// Number of tiles, blank excluded, not on their goal cell.
pub struct Misplaced;

impl Heuristic for Misplaced {
    fn estimate(&self, board: &Board) -> u16 {
        board
            .cells()
            .iter()
            .enumerate()
            .filter(|&(idx, &value)| value != 0 && value as usize != idx + 1)
            .count() as u16
    }
}

/// Sum of each tile's row and column distance from its goal cell.
pub struct ManhattanDistance;

impl Heuristic for ManhattanDistance {
    fn estimate(&self, board: &Board) -> u16 {
        let size = board.size();
        let mut distance = 0usize;
        for (idx, &value) in board.cells().iter().enumerate() {
            if value == 0 {
                continue;
            }
            let (goal_row, goal_col) = board.goal_position(value);
            distance += (idx / size).abs_diff(goal_row) + (idx % size).abs_diff(goal_col);
        }
        distance as u16
    }
}

/// Manhattan distance plus misplaced tiles.
///
/// Not admissible: a tile one step from home counts twice. Searches with it
/// expand far fewer nodes but may return longer than optimal paths.
pub struct Total;

impl Heuristic for Total {
    fn estimate(&self, board: &Board) -> u16 {
        ManhattanDistance.estimate(board) + Misplaced.estimate(board)
    }
}

/// The heuristics a caller can choose from, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum HeuristicKind {
    #[value(name = "manhattan_distance")]
    ManhattanDistance,
    #[value(name = "misplaced")]
    Misplaced,
    #[value(name = "total")]
    Total,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 3] = [
        HeuristicKind::ManhattanDistance,
        HeuristicKind::Misplaced,
        HeuristicKind::Total,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HeuristicKind::ManhattanDistance => "manhattan_distance",
            HeuristicKind::Misplaced => "misplaced",
            HeuristicKind::Total => "total",
        }
    }

    /// Whether searches with this heuristic are guaranteed optimal.
    pub fn is_admissible(&self) -> bool {
        !matches!(self, HeuristicKind::Total)
    }
}

impl Heuristic for HeuristicKind {
    fn estimate(&self, board: &Board) -> u16 {
        match self {
            HeuristicKind::ManhattanDistance => ManhattanDistance.estimate(board),
            HeuristicKind::Misplaced => Misplaced.estimate(board),
            HeuristicKind::Total => Total.estimate(board),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when parsing an unknown heuristic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownHeuristic(pub String);

impl fmt::Display for UnknownHeuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown heuristic '{}' (expected manhattan_distance, misplaced or total)",
            self.0
        )
    }
}

impl std::error::Error for UnknownHeuristic {}

impl FromStr for HeuristicKind {
    type Err = UnknownHeuristic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HeuristicKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownHeuristic(s.to_string()))
    }
}
