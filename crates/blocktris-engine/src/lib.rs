pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "board must be between {min}x{min} and {max}x{max}, got {width}x{height}",
    min = MIN_SIZE,
    max = MAX_SIZE
)]
pub struct InvalidBoardSizeError {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("coordinate ({x}, {y}) is outside the board")]
pub struct InvalidCoordinateError {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("failed to parse board config: {_0}")]
    Parse(#[error(source)] serde_json::Error),
    #[display("invalid board config: {_0}")]
    Size(#[error(source)] InvalidBoardSizeError),
}
