use crate::board::Board;
use crate::heuristic::Heuristic;
use crate::pqueue::{MAX_PRIORITY, PriorityQueue};
use crate::solvability::is_solvable;
use crate::solver::SolverError;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// How a search run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Boards from the start to the goal inclusive; empty if the start was already solved.
    Solved(Vec<Board>),
    /// The frontier emptied without reaching the goal
    Exhausted,
    /// The stop flag was raised
    Stopped,
}

struct Node {
    board: Board,
    g: u16,
    parent: Option<usize>,
}

/// A* search over boards.
///
/// The frontier is ordered by `f = g + h` with FIFO ties, so identical inputs
/// always expand nodes in the same order. The stop flag is polled once per
/// expansion step.
pub struct Search<'a, H: Heuristic> {
    heuristic: H,
    stop: &'a AtomicBool,
    nodes_expanded: usize,
}

impl<'a, H: Heuristic> Search<'a, H> {
    pub fn new(heuristic: H, stop: &'a AtomicBool) -> Self {
        Search {
            heuristic,
            stop,
            nodes_expanded: 0,
        }
    }

    /// Nodes expanded by the last call to `run`.
    pub fn nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }

    fn priority(&self, g: u16, board: &Board) -> usize {
        (g as usize + self.heuristic.estimate(board) as usize).min(MAX_PRIORITY)
    }

    /// Search from `start` to the solved board.
    ///
    /// Refuses unsolvable boards up front, since the search would otherwise
    /// enumerate half the state space before giving up.
    pub fn run(&mut self, start: &Board) -> Result<SearchOutcome, SolverError> {
        self.nodes_expanded = 0;

        if !is_solvable(start) {
            return Err(SolverError::Unsolvable);
        }
        if start.is_goal() {
            return Ok(SearchOutcome::Solved(Vec::new()));
        }

        log::debug!(
            "Searching {}x{} board, initial estimate {}",
            start.size(),
            start.size(),
            self.heuristic.estimate(start)
        );

        let mut nodes = vec![Node {
            board: start.clone(),
            g: 0,
            parent: None,
        }];
        let mut best_g: FxHashMap<Board, u16> = FxHashMap::default();
        best_g.insert(start.clone(), 0);
        let mut frontier = PriorityQueue::new();
        frontier.push(self.priority(0, start), 0usize);

        loop {
            if self.stop.load(Ordering::Relaxed) {
                log::debug!("Search stopped after {} expansions", self.nodes_expanded);
                return Ok(SearchOutcome::Stopped);
            }

            let Some((f_cost, node_idx)) = frontier.pop_min() else {
                log::debug!("Frontier exhausted after {} expansions", self.nodes_expanded);
                return Ok(SearchOutcome::Exhausted);
            };

            let node = &nodes[node_idx];
            if best_g.get(&node.board).is_some_and(|&g| g < node.g) {
                // reached again more cheaply after this entry was queued
                continue;
            }

            if node.board.is_goal() {
                let path = Self::reconstruct_path(&nodes, node_idx);
                log::debug!(
                    "Solved in {} moves after {} expansions",
                    path.len() - 1,
                    self.nodes_expanded
                );
                return Ok(SearchOutcome::Solved(path));
            }

            self.nodes_expanded += 1;
            log::trace!(
                "expand #{} g={} f={} frontier={}",
                self.nodes_expanded,
                node.g,
                f_cost,
                frontier.len()
            );

            let g = node.g + 1;
            for (_, next) in node.board.successors() {
                if best_g.get(&next).is_some_and(|&known| known <= g) {
                    continue;
                }
                best_g.insert(next.clone(), g);

                let priority = self.priority(g, &next);
                frontier.push(priority, nodes.len());
                nodes.push(Node {
                    board: next,
                    g,
                    parent: Some(node_idx),
                });
            }
        }
    }

    fn reconstruct_path(nodes: &[Node], goal_idx: usize) -> Vec<Board> {
        let mut path = Vec::new();
        let mut current = Some(goal_idx);
        while let Some(idx) = current {
            path.push(nodes[idx].board.clone());
            current = nodes[idx].parent;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::HeuristicKind;
    use crate::shuffle::shuffle_seeded;
    use std::collections::{HashMap, VecDeque};

    fn solve(board: &Board, heuristic: HeuristicKind) -> (SearchOutcome, usize) {
        let stop = AtomicBool::new(false);
        let mut search = Search::new(heuristic, &stop);
        let outcome = search.run(board).unwrap();
        (outcome, search.nodes_expanded())
    }

    fn assert_valid_path(start: &Board, path: &[Board]) {
        assert_eq!(path.first(), Some(start));
        assert!(path.last().unwrap().is_goal());
        for pair in path.windows(2) {
            assert!(
                pair[0].direction_to(&pair[1]).is_some(),
                "not one move apart:\n{}\n{}",
                pair[0],
                pair[1]
            );
        }
    }

    /// Distance to the goal of every solvable 3x3 board, by breadth-first search from the goal.
    fn bfs_distances() -> HashMap<Board, usize> {
        let goal = Board::goal(3).unwrap();
        let mut distances = HashMap::new();
        let mut queue = VecDeque::new();
        distances.insert(goal.clone(), 0);
        queue.push_back(goal);

        while let Some(board) = queue.pop_front() {
            let dist = distances[&board];
            for (_, next) in board.successors() {
                if !distances.contains_key(&next) {
                    distances.insert(next.clone(), dist + 1);
                    queue.push_back(next);
                }
            }
        }
        distances
    }

    #[test]
    fn test_two_move_scenario() {
        let start = Board::from_text("1 2 3\n4 0 6\n7 5 8").unwrap();
        let (outcome, expanded) = solve(&start, HeuristicKind::ManhattanDistance);

        let SearchOutcome::Solved(path) = outcome else {
            panic!("expected a solution, got {:?}", outcome);
        };
        assert_eq!(path.len() - 1, 2);
        assert_valid_path(&start, &path);
        assert_eq!(path[1].cells(), &[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        assert!(expanded <= 4, "expanded {} nodes", expanded);
    }

    #[test]
    fn test_already_solved() {
        let goal = Board::goal(4).unwrap();
        let (outcome, expanded) = solve(&goal, HeuristicKind::Total);
        assert_eq!(outcome, SearchOutcome::Solved(Vec::new()));
        assert_eq!(expanded, 0);
    }

    #[test]
    fn test_unsolvable_is_refused() {
        let board = Board::from_text("2 1 3\n4 5 6\n7 8 0").unwrap();
        let stop = AtomicBool::new(false);
        let mut search = Search::new(HeuristicKind::ManhattanDistance, &stop);
        assert_eq!(search.run(&board), Err(SolverError::Unsolvable));
        assert_eq!(search.nodes_expanded(), 0);
    }

    #[test]
    fn test_stop_flag_raised_before_run() {
        let board = shuffle_seeded(4, 11).unwrap();
        let stop = AtomicBool::new(true);
        let mut search = Search::new(HeuristicKind::ManhattanDistance, &stop);
        assert_eq!(search.run(&board), Ok(SearchOutcome::Stopped));
        assert_eq!(search.nodes_expanded(), 0);
    }

    #[test]
    fn test_deterministic() {
        let board = shuffle_seeded(3, 5).unwrap();
        let first = solve(&board, HeuristicKind::Misplaced);
        let second = solve(&board, HeuristicKind::Misplaced);
        assert_eq!(first, second);
    }

    #[test]
    fn test_optimal_against_bfs() {
        let distances = bfs_distances();
        assert_eq!(distances.len(), 181440);

        for seed in 0..100 {
            let start = shuffle_seeded(3, seed).unwrap();
            let expected = distances[&start];

            let (outcome, _) = solve(&start, HeuristicKind::ManhattanDistance);
            let SearchOutcome::Solved(path) = outcome else {
                panic!("seed {}: expected a solution, got {:?}", seed, outcome);
            };
            assert_valid_path(&start, &path);
            assert_eq!(path.len() - 1, expected, "seed {}:\n{}", seed, start);
        }
    }

    #[test]
    fn test_misplaced_optimal_against_bfs() {
        let distances = bfs_distances();

        for seed in 100..120 {
            let start = shuffle_seeded(3, seed).unwrap();
            let (outcome, _) = solve(&start, HeuristicKind::Misplaced);
            let SearchOutcome::Solved(path) = outcome else {
                panic!("seed {}: expected a solution, got {:?}", seed, outcome);
            };
            assert_eq!(path.len() - 1, distances[&start], "seed {}", seed);
        }
    }

    #[test]
    fn test_deepest_boards() {
        // the two 3x3 boards furthest from the goal need 31 moves
        let distances = bfs_distances();
        let deepest: Vec<&Board> = distances
            .iter()
            .filter(|&(_, &dist)| dist == 31)
            .map(|(board, _)| board)
            .collect();
        assert_eq!(deepest.len(), 2);

        for start in deepest {
            let (outcome, _) = solve(start, HeuristicKind::ManhattanDistance);
            let SearchOutcome::Solved(path) = outcome else {
                panic!("expected a solution, got {:?}", outcome);
            };
            assert_eq!(path.len() - 1, 31);
        }
    }

    #[test]
    fn test_total_solves_4x4() {
        let start = shuffle_seeded(4, 3).unwrap();
        let (outcome, expanded) = solve(&start, HeuristicKind::Total);
        let SearchOutcome::Solved(path) = outcome else {
            panic!("expected a solution, got {:?}", outcome);
        };
        assert_valid_path(&start, &path);
        assert!(expanded > 0);
    }
}
