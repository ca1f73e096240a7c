//! Game engine logic and state management.
//!
//! This module builds the gameplay on top of the core data structures:
//!
//! - [`Board`] - The engine: grid, falling and next piece, commands
//! - [`GameInfo`] - Score, level, line counter, game-over flag, next piece
//! - [`PieceSupply`] - Predetermined sequence followed by random pieces
//! - [`PieceSeed`] - Seed for deterministic random pieces
//! - [`BoardEvent`] - Change notifications delivered to observers
//! - [`BoardConfig`] - Deserializable board settings
//!
//! # Game Flow
//!
//! 1. Create a [`Board`] (optionally with a predetermined piece sequence)
//! 2. Subscribe observers to its events
//! 3. A driver calls [`Board::step`] once per [`Board::tick_interval`] and
//!    forwards player commands (move, rotate, hard drop)
//! 4. When the falling piece can't move down it freezes, full rows are
//!    cleared, and the next piece spawns
//! 5. The game is over once a piece freezes above the visible rows
//!
//! # Example
//!
//! ```
//! use blocktris_engine::{Board, PieceKind};
//!
//! let mut board = Board::new(10, 20, [PieceKind::T]).unwrap();
//! board.subscribe(|event| {
//!     if let Some(info) = event.info() {
//!         println!("score: {}, level: {}", info.score(), info.level());
//!     }
//! });
//!
//! board.rotate();
//! board.move_left();
//! board.hard_drop();
//!
//! if board.is_game_over() {
//!     println!("Game over!");
//! }
//! ```

pub use self::{board::*, config::*, event::*, game_info::*, piece_supply::*};

mod board;
mod config;
mod event;
mod game_info;
mod piece_supply;
