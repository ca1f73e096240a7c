use std::fmt::{self, Write as _};

use super::{block::Block, grid::Grid, piece::Piece};

/// Number of headroom rows drawn above the visible board.
pub const EXTRA_ROWS: usize = 4;

const WALL: char = '|';
const CORNER: char = '+';
const FLOOR: char = '-';
const EMPTY: char = ' ';
const FROZEN: char = 'X';
const CURRENT_PIECE: char = '*';

/// Diagnostic text view of a board.
///
/// The layout, top to bottom:
///
/// - [`EXTRA_ROWS`] headroom rows, each prefixed by a space and without walls,
///   so that pieces about to top out stay visible
/// - `height` rows framed by `|`
/// - a floor line `+----------+`
///
/// Frozen cells are drawn as `X`, the falling piece as `*`.
///
/// ```text
///     ****
///
/// |          |
/// |X     XX  |
/// +----------+
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TextBoard<'a> {
    grid: &'a Grid,
    piece: &'a Piece,
    height: usize,
}

impl<'a> TextBoard<'a> {
    #[must_use]
    pub fn new(grid: &'a Grid, piece: &'a Piece, height: usize) -> Self {
        Self {
            grid,
            piece,
            height,
        }
    }

    fn write_row(&self, f: &mut fmt::Formatter<'_>, y: usize) -> fmt::Result {
        let Ok(y) = i32::try_from(y) else {
            return Err(fmt::Error);
        };
        for x in 0..self.grid.width() {
            let Ok(x) = i32::try_from(x) else {
                return Err(fmt::Error);
            };
            let glyph = if self.piece.occupies(x, y) {
                CURRENT_PIECE
            } else if self.grid.block_at(x, y).unwrap_or(Block::Empty).is_empty() {
                EMPTY
            } else {
                FROZEN
            };
            f.write_char(glyph)?;
        }
        Ok(())
    }
}

impl fmt::Display for TextBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (self.height..self.height + EXTRA_ROWS).rev() {
            f.write_char(EMPTY)?;
            self.write_row(f, y)?;
            f.write_char('\n')?;
        }
        for y in (0..self.height).rev() {
            f.write_char(WALL)?;
            self.write_row(f, y)?;
            f.write_char(WALL)?;
            f.write_char('\n')?;
        }
        f.write_char(CORNER)?;
        for _ in 0..self.grid.width() {
            f.write_char(FLOOR)?;
        }
        f.write_char(CORNER)?;
        f.write_char('\n')
    }
}

#[cfg(test)]
mod tests {
    use crate::{PieceKind, Position};

    use super::*;

    #[test]
    fn test_empty_board_layout() {
        let grid = Grid::new(5);
        let piece = Piece::new(PieceKind::O, Position::new(1, 5));
        let text = TextBoard::new(&grid, &piece, 5).to_string();

        let expected = [
            "      ", "      ", "  **  ", "  **  ", "|     |", "|     |", "|     |", "|     |",
            "|     |", "+-----+",
        ]
        .map(|line| format!("{line}\n"))
        .concat();
        assert_eq!(text, expected);
    }

    #[test]
    fn test_frozen_and_falling_cells() {
        let mut grid = Grid::new(5);
        grid.fill_block_at(0, 0, Block::Piece(PieceKind::I)).unwrap();
        grid.fill_block_at(4, 1, Block::Piece(PieceKind::Z)).unwrap();
        let piece = Piece::new(PieceKind::I, Position::new(1, 2));
        let text = TextBoard::new(&grid, &piece, 5).to_string();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5 + EXTRA_ROWS + 1);
        assert_eq!(lines[EXTRA_ROWS + 2], "| ****|");
        assert_eq!(lines[EXTRA_ROWS + 3], "|    X|");
        assert_eq!(lines[EXTRA_ROWS + 4], "|X    |");
    }
}
