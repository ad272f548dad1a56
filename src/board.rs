//! Board: square grid of cells, placement checks and row/column clears.

use crate::shapes::Shape;

/// Side length of the classic board.
pub const DEFAULT_GRID_SIZE: usize = 8;

/// Single cell: either empty or filled with a block colour index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(u8),
}

impl Cell {
    #[inline]
    pub fn is_filled(self) -> bool {
        matches!(self, Self::Filled(_))
    }
}

/// Full rows and columns found by [`Board::check_lines`], ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSet {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl LineSet {
    /// Rows plus columns; a cell shared by a full row and column is not deduplicated.
    pub fn len(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

/// Offset (x, y) moved by a mask cell; `None` when it leaves the `i32` range.
fn shift(x: i32, y: i32, dx: usize, dy: usize) -> Option<(i32, i32)> {
    let dx = i32::try_from(dx).ok()?;
    let dy = i32::try_from(dy).ok()?;
    Some((x.checked_add(dx)?, y.checked_add(dy)?))
}

/// Grid of `size` x `size` cells. (x, y) = (column, row), y=0 is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// cells[y * size + x]
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Board from text rows: `#` is a filled cell (colour 0), anything else empty.
    /// The board is as large as the longer of row count and widest row.
    pub fn from_pattern(rows: &[&str]) -> Self {
        let size = rows
            .iter()
            .map(|r| r.chars().count())
            .max()
            .unwrap_or(0)
            .max(rows.len());
        let mut board = Self::new(size);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    board.cells[y * size + x] = Cell::Filled(0);
                }
            }
        }
        board
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at (x, y), `None` when outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let n = self.size as i32;
        (x >= 0 && x < n && y >= 0 && y < n).then(|| y as usize * self.size + x as usize)
    }

    /// Rows of cells, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_filled()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    /// True if every filled cell of `shape`, shifted by (x, y), is on the grid and empty.
    pub fn can_place(&self, x: i32, y: i32, shape: &Shape) -> bool {
        shape.cells().all(|(dx, dy)| {
            matches!(
                shift(x, y, dx, dy).and_then(|(tx, ty)| self.get(tx, ty)),
                Some(Cell::Empty)
            )
        })
    }

    /// Write `color` into every cell `shape` covers at (x, y).
    /// Callers check [`Board::can_place`] first; targets off the grid are skipped.
    pub fn place(&mut self, x: i32, y: i32, shape: &Shape, color: u8) {
        debug_assert!(self.can_place(x, y, shape), "place without can_place");
        for (dx, dy) in shape.cells() {
            if let Some(i) = shift(x, y, dx, dy).and_then(|(tx, ty)| self.index(tx, ty)) {
                self.cells[i] = Cell::Filled(color);
            }
        }
    }

    /// True if `shape` fits at any origin of the grid.
    pub fn fits_anywhere(&self, shape: &Shape) -> bool {
        let n = self.size as i32;
        (0..n).any(|y| (0..n).any(|x| self.can_place(x, y, shape)))
    }

    fn row_full(&self, y: usize) -> bool {
        self.cells[y * self.size..(y + 1) * self.size]
            .iter()
            .all(|c| c.is_filled())
    }

    fn col_full(&self, x: usize) -> bool {
        (0..self.size).all(|y| self.cells[y * self.size + x].is_filled())
    }

    /// Every full row and every full column, checked independently.
    pub fn check_lines(&self) -> LineSet {
        LineSet {
            rows: (0..self.size).filter(|&y| self.row_full(y)).collect(),
            cols: (0..self.size).filter(|&x| self.col_full(x)).collect(),
        }
    }

    /// Empty every cell of the listed rows and columns. Indices off the grid are ignored.
    pub fn clear_lines(&mut self, lines: &LineSet) {
        for &y in lines.rows.iter().filter(|&&y| y < self.size) {
            self.cells[y * self.size..(y + 1) * self.size].fill(Cell::Empty);
        }
        for &x in lines.cols.iter().filter(|&&x| x < self.size) {
            for y in 0..self.size {
                self.cells[y * self.size + x] = Cell::Empty;
            }
        }
    }
}
