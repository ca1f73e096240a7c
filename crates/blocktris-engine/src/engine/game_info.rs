use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::piece::Piece;

/// Points awarded for every cleared line.
pub const LINE_CLEAR_SCORE: usize = 100;

/// Lines to clear before the level advances.
pub const LINES_PER_LEVEL: usize = 10;

/// Highest reachable level; the tick interval bottoms out here.
pub const MAX_LEVEL: usize = 10;

/// Returns the gravity interval for a level.
///
/// Starts at one second on level 1 and shortens by 100ms per level, down to
/// 100ms at [`MAX_LEVEL`].
///
/// ```
/// use std::time::Duration;
/// use blocktris_engine::tick_interval;
///
/// assert_eq!(tick_interval(1), Duration::from_millis(1000));
/// assert_eq!(tick_interval(4), Duration::from_millis(700));
/// assert_eq!(tick_interval(10), Duration::from_millis(100));
/// ```
#[must_use]
pub fn tick_interval(level: usize) -> Duration {
    let level = level.clamp(1, MAX_LEVEL) as u64;
    let millis = 100 + u64::saturating_sub(900, (level - 1) * 100);
    Duration::from_millis(millis)
}

/// Progress of a game: score, level, line counter, game-over flag, and the
/// upcoming piece.
///
/// The board owns the live tracker and hands out clones in its events, so
/// holding a `GameInfo` never aliases engine state.
///
/// # Scoring
///
/// Every cleared line is worth [`LINE_CLEAR_SCORE`] points regardless of how
/// many lines a single freeze clears. The line counter runs from 0 to
/// `LINES_PER_LEVEL - 1`; each time it wraps back to 0 the level goes up by one
/// until [`MAX_LEVEL`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameInfo {
    score: usize,
    level: usize,
    line_count: usize,
    total_cleared_lines: usize,
    game_over: bool,
    next_piece: Piece,
}

impl GameInfo {
    /// Creates a fresh tracker at level 1 with nothing scored.
    #[must_use]
    pub const fn new(next_piece: Piece) -> Self {
        Self {
            score: 0,
            level: 1,
            line_count: 0,
            total_cleared_lines: 0,
            game_over: false,
            next_piece,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Lines cleared since the last level threshold (0 to 9).
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_count
    }

    #[must_use]
    pub const fn lines_until_next_level(&self) -> usize {
        LINES_PER_LEVEL - self.line_count
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Returns a copy of the piece that will spawn next.
    #[must_use]
    pub const fn next_piece(&self) -> Piece {
        self.next_piece
    }

    /// Gravity interval for the current level.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.level)
    }

    pub(crate) fn record_line_clear(&mut self) {
        self.score += LINE_CLEAR_SCORE;
        self.total_cleared_lines += 1;
        self.line_count = (self.line_count + 1) % LINES_PER_LEVEL;
        if self.line_count == 0 {
            self.level_up();
        }
    }

    pub(crate) fn level_up(&mut self) {
        self.level = usize::min(self.level + 1, MAX_LEVEL);
    }

    pub(crate) fn end_game(&mut self) {
        self.game_over = true;
    }

    pub(crate) fn set_next_piece(&mut self, piece: Piece) {
        self.next_piece = piece;
    }
}
