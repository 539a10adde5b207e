use std::fmt;

use super::{piece::Position, shape::PieceKind};

/// A single cell of the board grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum Cell {
    #[default]
    Empty,
    /// Locked block of a specific piece type.
    Occupied(PieceKind),
}

impl Cell {
    /// Text form used by board dumps: `.` for empty, the kind letter otherwise.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(kind) => kind.as_char(),
        }
    }
}

/// Fixed-size grid of locked blocks.
///
/// Cells are stored in one flat slice indexed by `row * width + col`, row 0 at
/// the top. The slice is allocated once; locking and clearing only rewrite it
/// in place, so every occupied cell always lies within bounds.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceKind, Position};
///
/// let mut board = Board::new(20, 10);
/// let cells: Vec<_> = (0..10).map(|col| Position::new(19, col)).collect();
///
/// assert!(board.is_valid(&cells));
/// board.lock(&cells, PieceKind::I);
/// assert!(!board.is_valid(&cells));
///
/// assert_eq!(board.clear_full_lines(), 1);
/// assert!(board.is_valid(&cells));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Box<[Cell]>,
}

impl Board {
    /// Creates an empty board of `height` rows and `width` columns.
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        assert!(height > 0 && width > 0, "board must not be empty");
        Self {
            height,
            width,
            cells: vec![Cell::Empty; height * width].into_boxed_slice(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the cell at `pos`, or `None` when `pos` lies outside the grid.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    /// Empties every cell, keeping the dimensions and the allocation.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Returns `true` if every position is inside the grid and empty.
    ///
    /// Used both for move legality and for detecting spawn collisions.
    #[must_use]
    pub fn is_valid(&self, cells: &[Position]) -> bool {
        cells
            .iter()
            .all(|&pos| self.cell(pos).is_some_and(|cell| cell.is_empty()))
    }

    /// Writes `kind` into every position of `cells` that lies inside the grid.
    ///
    /// Positions outside the grid, such as blocks still above the top row, are
    /// skipped.
    pub fn lock(&mut self, cells: &[Position], kind: PieceKind) {
        for &pos in cells {
            if let Some(i) = self.index(pos) {
                self.cells[i] = Cell::Occupied(kind);
            }
        }
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows are scanned bottom to top. Remaining rows keep their relative order
    /// and drop by the number of full rows found beneath them; the freed rows
    /// at the top become empty. Non-adjacent full rows are handled in the same
    /// pass.
    pub fn clear_full_lines(&mut self) -> usize {
        let width = self.width;
        let mut count = 0;
        for row in (0..self.height).rev() {
            if self.is_row_full(row) {
                count += 1;
                continue;
            }
            if count > 0 {
                let src = row * width;
                self.cells.copy_within(src..src + width, src + count * width);
            }
        }
        self.cells[..count * width].fill(Cell::Empty);
        count
    }

    /// Creates a board from ASCII art, top row first, for tests and tooling.
    ///
    /// `.` is an empty cell and a piece letter (`I`, `O`, `T`, `S`, `Z`, `J`,
    /// `L`) is a cell occupied by that kind. Blank lines and surrounding
    /// whitespace are ignored.
    ///
    /// # Panics
    ///
    /// Panics on an unknown character or on rows of different widths.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = lines.first().map_or(0, |line| line.chars().count());
        let mut board = Self::new(lines.len(), width);

        for (y, line) in lines.iter().enumerate() {
            assert_eq!(
                line.chars().count(),
                width,
                "Each row must have exactly {width} cells, got {line:?} at row {y}"
            );
            for (x, ch) in line.chars().enumerate() {
                board.cells[y * width + x] = match ch {
                    '.' => Cell::Empty,
                    _ => Cell::Occupied(
                        PieceKind::from_char(ch)
                            .unwrap_or_else(|| panic!("invalid cell {ch:?} at ({x}, {y})")),
                    ),
                };
            }
        }
        board
    }

    fn is_row_full(&self, row: usize) -> bool {
        self.cells[row * self.width..][..self.width]
            .iter()
            .all(|cell| cell.is_occupied())
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        (row < self.height && col < self.width).then_some(row * self.width + col)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}
