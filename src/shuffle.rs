use crate::board::{Board, BoardError};
use crate::solvability::is_solvable;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, thread_rng};
use rand_chacha::ChaCha8Rng;

/// Random solvable board of the given size, drawn from the thread RNG.
pub fn shuffle(size: usize) -> Result<Board, BoardError> {
    shuffle_with_rng(size, &mut thread_rng())
}

/// Reproducible random solvable board; the same seed always gives the same board.
pub fn shuffle_seeded(size: usize, seed: u64) -> Result<Board, BoardError> {
    shuffle_with_rng(size, &mut ChaCha8Rng::seed_from_u64(seed))
}

/// Random solvable board of the given size.
///
/// Permutes the solved board uniformly and rejects unsolvable permutations.
/// Half of all permutations are solvable, so two draws are expected.
pub fn shuffle_with_rng<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Board, BoardError> {
    let mut cells = Board::goal(size)?.cells().to_vec();
    let mut attempts = 0usize;

    loop {
        attempts += 1;
        cells.shuffle(rng);
        let board = Board::from_cells(size, &cells)?;
        if is_solvable(&board) {
            log::info!("Shuffled {}x{} board in {} attempt(s)", size, size, attempts);
            return Ok(board);
        }
    }
}
