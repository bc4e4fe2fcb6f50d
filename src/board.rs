use arrayvec::ArrayVec;
use std::error::Error;
use std::fmt;

pub const MIN_SIZE: usize = 3;
pub const MAX_SIZE: usize = 8;
pub const MAX_CELLS: usize = MAX_SIZE * MAX_SIZE;

/// A cell coordinate as `(row, col)`, zero-based from the top-left corner.
pub type Position = (usize, usize);

/// Direction the blank travels when a move is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Successors are always generated in this order.
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "Up"),
            Direction::Down => write!(f, "Down"),
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

/// Error type for board construction and manual moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Side length outside `MIN_SIZE..=MAX_SIZE`
    InvalidSize(usize),
    /// The grid is not square
    NotSquare { row: usize, len: usize, size: usize },
    /// The values are not exactly `0..size*size`
    InvalidTiles(String),
    /// Unparseable board text
    Parse(String),
    /// Manual swap of cells that are not the blank and one of its neighbours
    IllegalMove { from: Position, to: Position },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::InvalidSize(size) => write!(
                f,
                "Invalid board size {} (must be between {} and {})",
                size, MIN_SIZE, MAX_SIZE
            ),
            BoardError::NotSquare { row, len, size } => write!(
                f,
                "Row {} has {} cells but the board is {}x{}",
                row, len, size, size
            ),
            BoardError::InvalidTiles(msg) => write!(f, "Invalid tiles: {}", msg),
            BoardError::Parse(msg) => write!(f, "Parse error: {}", msg),
            BoardError::IllegalMove { from, to } => write!(
                f,
                "Illegal move: ({}, {}) and ({}, {}) are not the blank and an adjacent tile",
                from.0, from.1, to.0, to.1
            ),
        }
    }
}

impl Error for BoardError {}

/// One configuration of the sliding-tile puzzle.
///
/// Cells are stored row-major; `0` is the blank. A `Board` is never mutated
/// after construction, moves produce new boards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: u8,
    blank: u8,
    cells: ArrayVec<u8, MAX_CELLS>,
}

impl Board {
    /// Build a board from rows of tile values.
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self, BoardError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            cells.extend_from_slice(values);
        }
        Self::from_cells(size, &cells)
    }

    /// Build a board from a row-major list of `size * size` values.
    pub fn from_cells(size: usize, values: &[u8]) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize(size));
        }
        let len = size * size;
        if values.len() != len {
            return Err(BoardError::InvalidTiles(format!(
                "expected {} values, found {}",
                len,
                values.len()
            )));
        }

        let mut seen = [false; MAX_CELLS];
        let mut blank = None;
        for (idx, &value) in values.iter().enumerate() {
            if value as usize >= len {
                return Err(BoardError::InvalidTiles(format!(
                    "value {} out of range 0..{}",
                    value, len
                )));
            }
            if seen[value as usize] {
                return Err(BoardError::InvalidTiles(format!(
                    "value {} appears more than once",
                    value
                )));
            }
            seen[value as usize] = true;
            if value == 0 {
                blank = Some(idx as u8);
            }
        }

        // len distinct values below len means every value, blank included, is present
        let blank = blank.ok_or_else(|| BoardError::InvalidTiles("no blank".to_string()))?;
        let mut cells = ArrayVec::new();
        cells.extend(values.iter().copied());

        Ok(Board {
            size: size as u8,
            blank,
            cells,
        })
    }

    /// Parse a board from text: one row per line, values separated by
    /// whitespace. The blank may be written as `0`, `.` or `_`. Blank lines
    /// and lines starting with `#` are ignored.
    pub fn from_text(text: &str) -> Result<Self, BoardError> {
        let mut rows = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|token| match token {
                    "." | "_" => Ok(0),
                    _ => token.parse::<u8>().map_err(|_| {
                        BoardError::Parse(format!(
                            "invalid tile '{}' on line {}",
                            token,
                            line_no + 1
                        ))
                    }),
                })
                .collect::<Result<Vec<u8>, BoardError>>()?;
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(BoardError::Parse("empty board".to_string()));
        }
        Self::new(rows)
    }

    /// The solved board: `1..size*size` row-major with the blank bottom-right.
    pub fn goal(size: usize) -> Result<Self, BoardError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize(size));
        }
        let len = size * size;
        let values: Vec<u8> = (1..len).map(|v| v as u8).chain(std::iter::once(0)).collect();
        Self::from_cells(size, &values)
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Row-major cell values.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Tile at `(row, col)`; `0` for the blank. Panics if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        assert!(
            row < self.size() && col < self.size(),
            "Cell ({}, {}) out of bounds",
            row,
            col
        );
        self.cells[row * self.size() + col]
    }

    pub fn blank(&self) -> Position {
        self.position_of_index(self.blank as usize)
    }

    /// Where `value` sits on the solved board.
    pub fn goal_position(&self, value: u8) -> Position {
        if value == 0 {
            (self.size() - 1, self.size() - 1)
        } else {
            self.position_of_index(value as usize - 1)
        }
    }

    pub fn is_goal(&self) -> bool {
        let last = self.cells.len() - 1;
        self.cells[last] == 0
            && self.cells[..last]
                .iter()
                .enumerate()
                .all(|(idx, &value)| value as usize == idx + 1)
    }

    fn position_of_index(&self, idx: usize) -> Position {
        (idx / self.size(), idx % self.size())
    }

    /// Step from `pos` in the given direction.
    /// Returns None if the new position falls off the board.
    fn step(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        let row = pos.0.checked_add_signed(dr)?;
        let col = pos.1.checked_add_signed(dc)?;
        if row < self.size() && col < self.size() {
            Some((row, col))
        } else {
            None
        }
    }

    fn swap_blank_with(&self, target: Position) -> Board {
        let target_idx = target.0 * self.size() + target.1;
        let mut next = self.clone();
        next.cells.swap(self.blank as usize, target_idx);
        next.blank = target_idx as u8;
        next
    }

    /// Move the blank one cell in `dir`. Returns None if that leaves the board.
    pub fn apply(&self, dir: Direction) -> Option<Board> {
        self.step(self.blank(), dir)
            .map(|target| self.swap_blank_with(target))
    }

    /// All boards one move away, in `ALL_DIRECTIONS` order.
    pub fn successors(&self) -> ArrayVec<(Direction, Board), 4> {
        ALL_DIRECTIONS
            .iter()
            .filter_map(|&dir| self.apply(dir).map(|next| (dir, next)))
            .collect()
    }

    /// The direction that turns `self` into `next`, if they are one move apart.
    pub fn direction_to(&self, next: &Board) -> Option<Direction> {
        if self.size != next.size {
            return None;
        }
        ALL_DIRECTIONS
            .iter()
            .copied()
            .find(|&dir| self.apply(dir).as_ref() == Some(next))
    }

    /// Manual move: swap the blank with an orthogonally adjacent tile.
    ///
    /// Exactly one of `from` and `to` must be the blank. Anything else,
    /// including out-of-bounds cells, is rejected with
    /// `BoardError::IllegalMove`.
    pub fn slide_tile(&self, from: Position, to: Position) -> Result<Board, BoardError> {
        let illegal = BoardError::IllegalMove { from, to };
        let blank = self.blank();
        let tile = if from == blank {
            to
        } else if to == blank {
            from
        } else {
            return Err(illegal);
        };

        ALL_DIRECTIONS
            .iter()
            .find(|&&dir| self.step(blank, dir) == Some(tile))
            .map(|_| self.swap_blank_with(tile))
            .ok_or(illegal)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.cells.len() - 1).to_string().len();
        for row in self.cells.chunks(self.size()) {
            for (col, &value) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if value == 0 {
                    write!(f, "{:>width$}", ".", width = width)?;
                } else {
                    write!(f, "{:>width$}", value, width = width)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
