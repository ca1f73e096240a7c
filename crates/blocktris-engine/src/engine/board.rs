use std::{fmt, sync::mpsc, time::Duration};

use crate::{
    InvalidBoardSizeError, InvalidCoordinateError,
    core::{
        block::Block,
        grid::Grid,
        piece::{Piece, PieceKind, Position},
        render::TextBoard,
    },
};

use super::{
    config::{BoardConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH, validate_size},
    event::{BoardEvent, ObserverId, Observers},
    game_info::GameInfo,
    piece_supply::{PieceSeed, PieceSupply},
};

/// The game engine: grid, falling piece, next piece, and progress.
///
/// Every command runs synchronously and publishes its [`BoardEvent`]s to all
/// observers before returning. Rejected moves are not errors; they return
/// `false` and leave the board untouched.
///
/// # Example
///
/// ```
/// use blocktris_engine::{Board, BoardEvent, PieceKind};
///
/// let mut board = Board::new(10, 20, [PieceKind::I, PieceKind::O]).unwrap();
/// let events = board.subscribe_channel();
///
/// assert!(board.move_left());
/// assert!(events.try_recv().unwrap().is_move_applied());
///
/// board.hard_drop();
/// assert_eq!(board.row_count(), 1);
/// assert_eq!(board.current_piece().kind(), PieceKind::O);
/// assert!(events.try_iter().any(|event| event.is_piece_froze()));
/// ```
#[derive(Debug)]
pub struct Board {
    width: usize,
    height: usize,
    grid: Grid,
    current: Piece,
    next: Piece,
    supply: PieceSupply,
    info: GameInfo,
    observers: Observers,
}

impl Default for Board {
    /// A standard 10×20 board with random pieces.
    fn default() -> Self {
        Self::build(DEFAULT_WIDTH, DEFAULT_HEIGHT, PieceSupply::default())
    }
}

/// Converts a board dimension to a coordinate; dimensions never exceed `MAX_SIZE`.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn to_coord(n: usize) -> i32 {
    n as i32
}

/// Spawn anchor: horizontally centered, just above the visible rows.
fn spawn_position(width: usize, height: usize) -> Position {
    Position::new(to_coord(width / 2 - 1), to_coord(height))
}

impl Board {
    /// Creates a board of the given size.
    ///
    /// `pieces` is the predetermined piece sequence; pass an empty one for a
    /// random game.
    pub fn new<I>(width: usize, height: usize, pieces: I) -> Result<Self, InvalidBoardSizeError>
    where
        I: IntoIterator<Item = PieceKind>,
    {
        validate_size(width, height)?;
        Ok(Self::build(width, height, PieceSupply::new(pieces)))
    }

    /// Like [`Self::new`], but with a fixed seed for the random pieces.
    pub fn with_seed<I>(
        width: usize,
        height: usize,
        pieces: I,
        seed: PieceSeed,
    ) -> Result<Self, InvalidBoardSizeError>
    where
        I: IntoIterator<Item = PieceKind>,
    {
        validate_size(width, height)?;
        Ok(Self::build(width, height, PieceSupply::with_seed(pieces, seed)))
    }

    pub fn from_config(config: &BoardConfig) -> Result<Self, InvalidBoardSizeError> {
        config.validate()?;
        let pieces = config.pieces.iter().copied();
        let supply = match config.seed {
            Some(seed) => PieceSupply::with_seed(pieces, seed),
            None => PieceSupply::new(pieces),
        };
        Ok(Self::build(config.width, config.height, supply))
    }

    fn build(width: usize, height: usize, mut supply: PieceSupply) -> Self {
        let spawn = spawn_position(width, height);
        let current = Piece::new(supply.draw(), spawn);
        let next = Piece::new(supply.draw(), spawn);
        Self {
            width,
            height,
            grid: Grid::new(width),
            current,
            next,
            supply,
            info: GameInfo::new(next),
            observers: Observers::default(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Visible height, excluding the headroom above it.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns a copy of all frozen rows, floor first.
    #[must_use]
    pub fn blocks(&self) -> Vec<Vec<Block>> {
        self.grid.to_blocks()
    }

    /// Returns the frozen block at `(x, y)`.
    pub fn block_at(&self, x: i32, y: i32) -> Result<Block, InvalidCoordinateError> {
        self.grid.block_at(x, y)
    }

    /// Number of materialized grid rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    /// Returns a copy of the falling piece.
    #[must_use]
    pub fn current_piece(&self) -> Piece {
        self.current
    }

    /// Returns a copy of the piece that spawns after the current one freezes.
    #[must_use]
    pub fn next_piece(&self) -> Piece {
        self.next
    }

    #[must_use]
    pub fn info(&self) -> &GameInfo {
        &self.info
    }

    #[must_use]
    pub fn info_snapshot(&self) -> GameInfo {
        self.info.clone()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.info.is_game_over()
    }

    /// Gravity interval the driver should use between [`step`](Self::step)s.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.info.tick_interval()
    }

    #[must_use]
    pub fn piece_supply(&self) -> &PieceSupply {
        &self.supply
    }

    /// Where the falling piece would come to rest if dropped now.
    #[must_use]
    pub fn drop_position(&self) -> Piece {
        let mut dropped = self.current;
        loop {
            let mut below = dropped;
            below.move_down();
            if !self.fits(&below) {
                return dropped;
            }
            dropped = below;
        }
    }

    /// Registers a callback that receives every event, after all callbacks
    /// registered before it.
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(&BoardEvent) + 'static,
    {
        self.observers.subscribe(callback)
    }

    /// Registers a channel observer. It is dropped automatically once the
    /// receiver is gone.
    pub fn subscribe_channel(&mut self) -> mpsc::Receiver<BoardEvent> {
        self.observers.subscribe_channel()
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn fits(&self, piece: &Piece) -> bool {
        piece
            .board_coordinates()
            .iter()
            .all(|cell| self.grid.is_free(cell.x, cell.y))
    }

    fn try_move(&mut self, apply: impl FnOnce(&mut Piece)) -> bool {
        let mut moved = self.current;
        apply(&mut moved);
        if !self.fits(&moved) {
            return false;
        }
        self.current = moved;
        self.observers.publish(&BoardEvent::MoveApplied);
        true
    }

    /// Moves the falling piece one column left.
    ///
    /// Fails if any cell is at the left wall or next to a frozen block.
    pub fn move_left(&mut self) -> bool {
        self.try_move(Piece::move_left)
    }

    /// Moves the falling piece one column right.
    ///
    /// Fails if any cell is at the right wall or next to a frozen block.
    pub fn move_right(&mut self) -> bool {
        self.try_move(Piece::move_right)
    }

    /// Moves the falling piece one row down.
    ///
    /// If any cell rests on the floor or on a frozen block, the piece freezes
    /// instead and `false` is returned.
    pub fn move_down(&mut self) -> bool {
        if self.try_move(Piece::move_down) {
            return true;
        }
        self.freeze();
        false
    }

    /// Rotates the falling piece a quarter turn counter-clockwise.
    ///
    /// The rotation is undone if any resulting cell is outside the walls or
    /// overlaps a frozen block.
    pub fn rotate(&mut self) -> bool {
        self.current.rotate();
        if !self.fits(&self.current) {
            self.current.rotate_back();
            return false;
        }
        self.observers.publish(&BoardEvent::MoveApplied);
        true
    }

    /// Drops the falling piece as far as it goes and freezes it.
    ///
    /// Returns the number of rows the piece fell.
    pub fn hard_drop(&mut self) -> usize {
        let mut rows = 0;
        while self.move_down() {
            rows += 1;
        }
        rows
    }

    /// Advances the game by one gravity tick.
    pub fn step(&mut self) -> bool {
        self.move_down()
    }

    /// Raises the level by one, up to the maximum.
    pub fn level_up(&mut self) {
        self.info.level_up();
        self.publish_info();
    }

    /// Starts over on the same board: empty grid, fresh tracker, and the
    /// predetermined sequence (if any) dealt again from the start.
    pub fn new_game(&mut self) {
        self.grid.clear();
        self.supply.restart();
        let spawn = spawn_position(self.width, self.height);
        self.current = Piece::new(self.supply.draw(), spawn);
        self.next = Piece::new(self.supply.draw(), spawn);
        self.info = GameInfo::new(self.next);
        self.publish_info();
    }

    fn publish_info(&mut self) {
        let event = BoardEvent::InfoChanged(self.info.clone());
        self.observers.publish(&event);
    }

    fn freeze(&mut self) {
        let piece = self.current;
        let cells = piece.board_coordinates();
        let height = to_coord(self.height);
        if cells.iter().any(|cell| cell.y > height) {
            self.info.end_game();
        }
        // Every committed position passed `fits`, so the cells are inside the walls.
        let filled = self.grid.fill_piece(&piece);
        debug_assert!(filled.is_ok(), "falling piece left the walls: {piece:?}");
        self.observers.publish(&BoardEvent::PieceFroze {
            kind: piece.kind(),
            cells,
        });

        for row in self.grid.clear_lines() {
            self.info.record_line_clear();
            let event = BoardEvent::LineCleared {
                row,
                info: self.info.clone(),
            };
            self.observers.publish(&event);
        }

        self.current = self.next;
        self.next = Piece::new(
            self.supply.draw(),
            spawn_position(self.width, self.height),
        );
        self.info.set_next_piece(self.next);
        self.publish_info();
    }
}

/// Diagnostic text view; see [`TextBoard`].
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TextBoard::new(&self.grid, &self.current, self.height).fmt(f)
    }
}
