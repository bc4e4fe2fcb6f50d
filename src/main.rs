use anyhow::{Context, bail};
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::fs;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tilesolver::{Board, HeuristicKind, Solver, SolverStatus, shuffle, shuffle_seeded};

fn print_solution(solver: &Solver) {
    let solution = solver.solution();
    let total = solution.len().saturating_sub(1);
    println!("\nStarting position:\n{}", solver.start());
    for (count, pair) in solution.windows(2).enumerate() {
        let direction = pair[0]
            .direction_to(&pair[1])
            .map(|dir| dir.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "Move blank {} ({}/{}):\n{}",
            direction,
            count + 1,
            total,
            pair[1]
        );
    }
}

/// Stop the solver once `timeout` elapses. A run that has already finished
/// keeps its result; one that has not started yet will not search.
fn spawn_watchdog(solver: Arc<Solver>, timeout: Duration) -> JoinHandle<()> {
    thread::spawn(move || {
        thread::sleep(timeout);
        log::info!("Timeout of {} ms reached, stopping", timeout.as_millis());
        solver.stop();
    })
}

fn load_board(args: &Args) -> anyhow::Result<Board> {
    if let Some(path) = &args.board_file {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
        return Board::from_text(&text).with_context(|| format!("parsing {}", path));
    }

    let board = match args.seed {
        Some(seed) => shuffle_seeded(args.size, seed),
        None => shuffle(args.size),
    };
    board.context("shuffling board")
}

#[derive(Parser)]
#[command(name = "tilesolver")]
#[command(about = "A sliding-tile puzzle solver", long_about = None)]
struct Args {
    /// Path to a board file (one row per line, 0 or . for the blank)
    #[arg(value_name = "FILE")]
    board_file: Option<String>,

    /// Board size for a shuffled puzzle when no file is given
    #[arg(short, long, default_value = "4")]
    size: usize,

    /// Seed for a reproducible shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Heuristic to use for solving
    #[arg(short = 'H', long, value_enum, default_value = "total")]
    heuristic: HeuristicKind,

    /// Print the solution step-by-step
    #[arg(short, long)]
    print_solution: bool,

    /// Stop searching after this many milliseconds
    #[arg(short, long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new().with_level(level).init()?;

    let board = load_board(&args)?;
    println!("Puzzle:\n{}", board);

    if !args.heuristic.is_admissible() {
        log::info!("Heuristic {} may return a longer than optimal solution", args.heuristic);
    }

    let solver = Arc::new(Solver::new(board, args.heuristic)?);
    if let Some(ms) = args.timeout_ms {
        spawn_watchdog(Arc::clone(&solver), Duration::from_millis(ms));
    }

    let start = Instant::now();
    let status = solver.run()?;
    let elapsed_ms = start.elapsed().as_millis();

    let steps = solver.solution().len().saturating_sub(1);
    println!(
        "heuristic: {}  status: {}  steps: {:<5}  expanded: {:<12}  elapsed: {} ms",
        args.heuristic,
        status,
        steps,
        solver.expanded_node_count(),
        elapsed_ms
    );

    match status {
        SolverStatus::Solved => {
            if args.print_solution {
                print_solution(&solver);
            }
            Ok(())
        }
        SolverStatus::Stopped => Ok(()),
        other => bail!("search ended without a solution ({})", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watchdog_before_run_stops_search() {
        let board = shuffle_seeded(6, 2024).unwrap();
        let solver = Arc::new(Solver::new(board, HeuristicKind::ManhattanDistance).unwrap());

        spawn_watchdog(Arc::clone(&solver), Duration::ZERO)
            .join()
            .unwrap();
        assert_eq!(solver.status(), SolverStatus::Ready);

        assert_eq!(solver.run(), Ok(SolverStatus::Stopped));
        assert_eq!(solver.expanded_node_count(), 0);
        assert!(solver.solution().is_empty());
    }

    #[test]
    fn test_watchdog_after_run_keeps_solution() {
        let solver = Arc::new(
            Solver::new(shuffle_seeded(3, 9).unwrap(), HeuristicKind::ManhattanDistance).unwrap(),
        );
        assert_eq!(solver.run(), Ok(SolverStatus::Solved));

        spawn_watchdog(Arc::clone(&solver), Duration::ZERO)
            .join()
            .unwrap();
        assert_eq!(solver.status(), SolverStatus::Solved);
        assert!(!solver.solution().is_empty() || solver.start().is_goal());
    }
}
