//! Board module - manages the game grid
//!
//! The board is a width x height grid (default 10x20) of [`Cell`]s, stored
//! row-major in a single allocation. Coordinates: (x, y) with x left to right
//! and y top to bottom, row 0 at the top. Cells above the visible board
//! (y < 0) are legal piece positions but are never stored.

use crate::types::Cell;

/// The game grid. One instance per session; no global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    /// Row-major cells (y * width + x).
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board. Dimensions are validated by `GameConfig` before
    /// they reach here; this only debug-asserts the invariant.
    pub fn new(width: i32, height: i32) -> Self {
        debug_assert!(width > 0 && height > 0, "board dimensions must be positive");
        Self {
            width,
            height,
            cells: vec![Cell::Empty; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// Get the cell at (x, y), or `None` outside the stored grid.
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set the cell at (x, y). Out-of-bounds writes are a guarded no-op
    /// returning `false`; the engine never relies on them succeeding.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether a piece cell may occupy (x, y): inside the side walls, above
    /// the floor, and not overlapping a filled cell. Positions above row 0
    /// are open as long as x is in range.
    pub fn cell_open(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width || y >= self.height {
            return false;
        }
        if y < 0 {
            return true;
        }
        self.cells[(y * self.width + x) as usize].is_empty()
    }

    /// Check if a row is completely filled. Rows outside the board are never
    /// full.
    pub fn is_row_full(&self, y: i32) -> bool {
        if y < 0 || y >= self.height {
            return false;
        }
        let start = (y * self.width) as usize;
        let end = start + self.width as usize;
        self.cells[start..end].iter().all(|cell| cell.is_filled())
    }

    /// Indices of all completely filled rows, top to bottom. Engine-driven
    /// play completes at most four per lock, but externally prepared boards
    /// may hold any number of full rows, so the result is unbounded.
    pub fn full_rows(&self) -> Vec<i32> {
        (0..self.height).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Remove row `y`, shift every row above it down by one, and insert a
    /// fresh empty row at the top. Total row count is preserved. Returns
    /// `false` for an out-of-range row.
    pub fn clear_row(&mut self, y: i32) -> bool {
        if y < 0 || y >= self.height {
            return false;
        }
        let width = self.width as usize;
        for row in (1..=y as usize).rev() {
            let src = (row - 1) * width;
            let dst = row * width;
            self.cells.copy_within(src..src + width, dst);
        }
        for cell in &mut self.cells[0..width] {
            *cell = Cell::Empty;
        }
        true
    }

    /// True iff every cell on the board is empty (perfect-clear probe).
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }

    /// Wipe the board back to all-empty.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::Empty;
        }
    }

    /// Copy of the grid as rows of cells (row 0 first).
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        (0..self.height as usize)
            .map(|y| {
                let start = y * self.width as usize;
                self.cells[start..start + self.width as usize].to_vec()
            })
            .collect()
    }
}
