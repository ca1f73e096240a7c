use crate::InvalidCoordinateError;

use super::{block::Block, piece::Piece};

/// A single row of frozen cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRow {
    cells: Box<[Block]>,
}

impl BlockRow {
    fn empty(width: usize) -> Self {
        Self {
            cells: vec![Block::Empty; width].into_boxed_slice(),
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Block] {
        &self.cells
    }

    /// A row is filled when none of its cells is empty.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|b| !b.is_empty())
    }
}

/// The frozen cells of a board, stored bottom row first.
///
/// Only rows that have ever been written are materialized. Everything above
/// [`row_count`](Self::row_count) reads as [`Block::Empty`], and
/// [`fill_block_at`](Self::fill_block_at) grows the grid upward on demand.
///
/// # Example
///
/// ```
/// use blocktris_engine::{Block, Grid, PieceKind};
///
/// let mut grid = Grid::new(5);
/// assert_eq!(grid.row_count(), 0);
///
/// grid.fill_block_at(2, 3, Block::Piece(PieceKind::T)).unwrap();
/// assert_eq!(grid.row_count(), 4);
/// assert_eq!(grid.block_at(2, 3).unwrap(), Block::Piece(PieceKind::T));
/// assert_eq!(grid.block_at(2, 50).unwrap(), Block::Empty);
/// assert!(grid.block_at(5, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    rows: Vec<BlockRow>,
}

impl Grid {
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of materialized rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterates over the materialized rows, floor first.
    pub fn rows(&self) -> impl Iterator<Item = &BlockRow> {
        self.rows.iter()
    }

    fn index(&self, x: i32, y: i32) -> Result<(usize, usize), InvalidCoordinateError> {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(col), Ok(row)) if col < self.width => Ok((col, row)),
            _ => Err(InvalidCoordinateError { x, y }),
        }
    }

    /// Returns the block at `(x, y)`.
    ///
    /// Rows above the materialized ones are empty. Negative coordinates and
    /// columns at or beyond the width are rejected.
    pub fn block_at(&self, x: i32, y: i32) -> Result<Block, InvalidCoordinateError> {
        let (col, row) = self.index(x, y)?;
        Ok(self.rows.get(row).map_or(Block::Empty, |r| r.cells[col]))
    }

    /// Returns `true` if `(x, y)` is inside the walls, above the floor, and empty.
    #[must_use]
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.block_at(x, y).is_ok_and(Block::is_empty)
    }

    /// Writes a block at `(x, y)`, appending empty rows until row `y` exists.
    pub fn fill_block_at(
        &mut self,
        x: i32,
        y: i32,
        block: Block,
    ) -> Result<(), InvalidCoordinateError> {
        let (col, row) = self.index(x, y)?;
        while row >= self.rows.len() {
            self.rows.push(BlockRow::empty(self.width));
        }
        self.rows[row].cells[col] = block;
        Ok(())
    }

    /// Writes all cells of `piece` with the piece's block.
    ///
    /// Cells are validated before anything is written, so a rejected piece
    /// leaves the grid untouched.
    pub fn fill_piece(&mut self, piece: &Piece) -> Result<(), InvalidCoordinateError> {
        let cells = piece.board_coordinates();
        for cell in &cells {
            self.index(cell.x, cell.y)?;
        }
        for cell in cells {
            self.fill_block_at(cell.x, cell.y, piece.block())?;
        }
        Ok(())
    }

    /// Removes every filled row and returns their indices.
    ///
    /// Rows are scanned from the topmost materialized row down to the floor,
    /// so each reported index is the row's position at the moment it was
    /// removed, and indices come out in descending order.
    pub fn clear_lines(&mut self) -> Vec<usize> {
        let mut cleared = Vec::new();
        for y in (0..self.rows.len()).rev() {
            if self.rows[y].is_filled() {
                self.rows.remove(y);
                cleared.push(y);
            }
        }
        cleared
    }

    /// Removes every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Returns an owned copy of all materialized rows, floor first.
    #[must_use]
    pub fn to_blocks(&self) -> Vec<Vec<Block>> {
        self.rows.iter().map(|row| row.cells.to_vec()).collect()
    }
}
