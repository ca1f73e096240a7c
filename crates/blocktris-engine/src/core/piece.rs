use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::block::Block;

/// A falling piece (tetromino) with position, rotation, and type.
///
/// Unlike the frozen cells of a [`Grid`](super::grid::Grid), a piece is a
/// small value type: copying it yields an independent piece, so callers can
/// hold a snapshot that later engine mutation will not touch.
///
/// # Coordinate System
///
/// - Position is the anchor of the piece-local offsets, in board coordinates
/// - X increases rightward, Y increases upward, row 0 is the floor
/// - Movement methods do no bounds checking; the board validates moves
///
/// # Example
///
/// ```
/// use blocktris_engine::{Piece, PieceKind, Position};
///
/// let mut piece = Piece::new(PieceKind::T, Position::new(4, 20));
/// piece.move_left();
/// piece.rotate();
/// assert_eq!(piece.position(), Position::new(3, 20));
/// assert_eq!(piece.rotation().index(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: Position,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@x,y" (e.g., "S#1@4,18")
        let s = format!(
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.position.x,
            self.position.y
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let (kind_str, rest) = s.split_once('#').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing '#' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;

        let mut kind_chars = kind_str.chars();
        let kind = match (kind_chars.next(), kind_chars.next()) {
            (Some(c), None) => PieceKind::from_char(c)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid piece kind: {c}")))?,
            _ => {
                return Err(serde::de::Error::custom(format!(
                    "piece kind must be single character, got '{kind_str}'"
                )));
            }
        };

        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing '@' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;

        let rotation_num = rotation_str.parse::<u8>().map_err(|e| {
            serde::de::Error::custom(format!("invalid rotation: {rotation_str} ({e})"))
        })?;
        if usize::from(rotation_num) >= kind.rotation_count() {
            return Err(serde::de::Error::custom(format!(
                "rotation of {} piece must be below {}, got {rotation_num}",
                kind.as_char(),
                kind.rotation_count()
            )));
        }

        let (x_str, y_str) = position_str.split_once(',').ok_or_else(|| {
            serde::de::Error::custom(format!(
                "missing ',' in format 'kind#rotation@x,y', got '{s}'"
            ))
        })?;
        let x = x_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<i32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        Ok(Piece {
            position: Position::new(x, y),
            rotation: PieceRotation(rotation_num),
            kind,
        })
    }
}

impl Piece {
    /// Creates a piece of the given kind in its first rotation state.
    #[must_use]
    pub const fn new(kind: PieceKind, position: Position) -> Self {
        Self {
            position,
            rotation: PieceRotation(0),
            kind,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the block this piece leaves behind when it freezes.
    #[must_use]
    pub fn block(&self) -> Block {
        Block::Piece(self.kind)
    }

    pub fn move_left(&mut self) {
        self.position.x -= 1;
    }

    pub fn move_right(&mut self) {
        self.position.x += 1;
    }

    pub fn move_down(&mut self) {
        self.position.y -= 1;
    }

    /// Rotates one quarter turn counter-clockwise.
    pub fn rotate(&mut self) {
        self.rotation = self.rotation.rotated(self.kind);
    }

    /// Undoes one [`rotate`](Self::rotate).
    pub fn rotate_back(&mut self) {
        self.rotation = self.rotation.rotated_back(self.kind);
    }

    /// Offsets of the four cells in the current rotation, relative to the anchor.
    #[must_use]
    pub fn block_locations(&self) -> [Position; 4] {
        self.kind.block_locations(self.rotation)
    }

    /// Absolute board coordinates of the four cells in the current rotation.
    #[must_use]
    pub fn board_coordinates(&self) -> [Position; 4] {
        self.block_locations()
            .map(|offset| self.position.offset(offset.x, offset.y))
    }

    /// Returns `true` if one of the piece's cells sits at `(x, y)`.
    #[must_use]
    pub fn occupies(&self, x: i32, y: i32) -> bool {
        self.board_coordinates()
            .iter()
            .any(|cell| cell.x == x && cell.y == y)
    }
}

/// Renders the current rotation as a small preview, top row first.
///
/// Occupied cells are drawn as `[]`, empty cells as two spaces.
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let locations = self.block_locations();
        let width = locations.iter().map(|p| p.x).max().unwrap_or(0) + 1;
        let height = locations.iter().map(|p| p.y).max().unwrap_or(0) + 1;
        for y in (0..height).rev() {
            for x in 0..width {
                if locations.contains(&Position::new(x, y)) {
                    f.write_str("[]")?;
                } else {
                    f.write_str("  ")?;
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// A point on the board, or an offset within a piece.
///
/// Coordinates are signed so that a piece translated past a wall can still be
/// represented; the board rejects such positions before they are committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rotation state of a piece.
///
/// Index `0` is the spawn orientation; each step is a quarter turn
/// counter-clockwise. The valid range depends on the piece kind
/// (see [`PieceKind::rotation_count`]), and rotation wraps around within it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    #[must_use]
    fn rotated(self, kind: PieceKind) -> Self {
        PieceRotation((self.0 + 1) % kind.rotation_count_u8())
    }

    #[must_use]
    fn rotated_back(self, kind: PieceKind) -> Self {
        let count = kind.rotation_count_u8();
        PieceRotation((self.0 + count - 1) % count)
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in declaration order.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Number of distinct rotation states: 1 for O, 2 for I/S/Z, 4 otherwise.
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        PIECE_ROTATIONS[self as usize].len()
    }

    #[expect(clippy::cast_possible_truncation)]
    const fn rotation_count_u8(self) -> u8 {
        self.rotation_count() as u8
    }

    /// Returns the cell offsets for the piece in the given rotation.
    #[must_use]
    pub fn block_locations(self, rotation: PieceRotation) -> [Position; 4] {
        PIECE_ROTATIONS[self as usize][rotation.index()]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocktris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blocktris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('J'), Some(PieceKind::J));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// Four cell offsets of one rotation state, `(x, y)` with y pointing up.
type PieceShape = [Position; 4];

const fn shape(cells: [(i32, i32); 4]) -> PieceShape {
    let mut shape = [Position::new(0, 0); 4];
    let mut i = 0;
    while i < 4 {
        shape[i] = Position::new(cells[i].0, cells[i].1);
        i += 1;
    }
    shape
}

// Each successive state is the previous one turned a quarter counter-clockwise
// and shifted back to non-negative offsets.
const PIECE_ROTATIONS: [&[PieceShape]; PieceKind::LEN] = [
    // I-piece
    &[
        shape([(0, 0), (1, 0), (2, 0), (3, 0)]),
        shape([(0, 0), (0, 1), (0, 2), (0, 3)]),
    ],
    // J-piece
    &[
        shape([(0, 0), (1, 0), (2, 0), (0, 1)]),
        shape([(0, 0), (1, 0), (1, 1), (1, 2)]),
        shape([(2, 0), (0, 1), (1, 1), (2, 1)]),
        shape([(0, 0), (0, 1), (0, 2), (1, 2)]),
    ],
    // L-piece
    &[
        shape([(0, 0), (1, 0), (2, 0), (2, 1)]),
        shape([(1, 0), (1, 1), (0, 2), (1, 2)]),
        shape([(0, 0), (0, 1), (1, 1), (2, 1)]),
        shape([(0, 0), (1, 0), (0, 1), (0, 2)]),
    ],
    // O-piece
    &[shape([(0, 0), (1, 0), (0, 1), (1, 1)])],
    // S-piece
    &[
        shape([(0, 0), (1, 0), (1, 1), (2, 1)]),
        shape([(1, 0), (0, 1), (1, 1), (0, 2)]),
    ],
    // T-piece
    &[
        shape([(0, 0), (1, 0), (2, 0), (1, 1)]),
        shape([(1, 0), (0, 1), (1, 1), (1, 2)]),
        shape([(1, 0), (0, 1), (1, 1), (2, 1)]),
        shape([(0, 0), (0, 1), (1, 1), (0, 2)]),
    ],
    // Z-piece
    &[
        shape([(1, 0), (2, 0), (0, 1), (1, 1)]),
        shape([(0, 0), (0, 1), (1, 1), (1, 2)]),
    ],
];
