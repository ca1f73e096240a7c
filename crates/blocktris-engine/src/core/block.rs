use serde::{Deserialize, Serialize};

use super::piece::PieceKind;

/// A single cell of the grid.
///
/// A cell is either empty or remembers which kind of piece froze there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Block {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Frozen cell of a specific piece type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    /// Returns the piece kind that froze here, if any.
    #[must_use]
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Block::Empty => None,
            Block::Piece(kind) => Some(kind),
        }
    }

    /// One-letter label: a space for empty cells, the piece letter otherwise.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Block::Empty => ' ',
            Block::Piece(kind) => kind.as_char(),
        }
    }
}

impl From<PieceKind> for Block {
    fn from(kind: PieceKind) -> Self {
        Block::Piece(kind)
    }
}
