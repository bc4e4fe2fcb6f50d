use crate::board::Board;

/// Count pairs of tiles that appear in the wrong relative order, ignoring the blank.
pub fn count_inversions(cells: &[u8]) -> usize {
    cells
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value != 0)
        .map(|(i, &value)| {
            cells[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < value)
                .count()
        })
        .sum()
}

/// Whether `board` can reach the solved board (blank bottom-right) by legal moves.
///
/// Odd sizes: every move keeps the inversion parity, so the inversion count
/// must be even. Even sizes: a vertical move flips the inversion parity, so
/// the inversion count plus the number of rows the blank sits above the
/// bottom row must be even.
pub fn is_solvable(board: &Board) -> bool {
    let inversions = count_inversions(board.cells());
    let size = board.size();

    if size % 2 == 1 {
        inversions % 2 == 0
    } else {
        let (blank_row, _) = board.blank();
        let rows_above_bottom = size - 1 - blank_row;
        (inversions + rows_above_bottom) % 2 == 0
    }
}
