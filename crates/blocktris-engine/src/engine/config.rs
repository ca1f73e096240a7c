use serde::{Deserialize, Serialize};

use crate::{ConfigError, InvalidBoardSizeError, PieceKind};

use super::piece_supply::PieceSeed;

/// Smallest allowed board width and height.
pub const MIN_SIZE: usize = 5;

/// Largest allowed board width and height.
pub const MAX_SIZE: usize = 1024;

pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 20;

/// Settings for a [`Board`](super::Board).
///
/// Every field is optional when deserializing; missing fields take their
/// default (a random 10×20 game).
///
/// # Example
///
/// ```
/// use blocktris_engine::{Board, BoardConfig, PieceKind};
///
/// let config = BoardConfig::from_json_str(
///     r#"{ "width": 8, "pieces": ["I", "O"], "seed": "000102030405060708090a0b0c0d0e0f" }"#,
/// )
/// .unwrap();
/// assert_eq!(config.height, 20);
///
/// let board = Board::from_config(&config).unwrap();
/// assert_eq!(board.width(), 8);
/// assert_eq!(board.current_piece().kind(), PieceKind::I);
/// assert_eq!(board.next_piece().kind(), PieceKind::O);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
    /// Predetermined piece sequence, dealt before random pieces.
    pub pieces: Vec<PieceKind>,
    /// Seed for the random stream; a fresh one is drawn when absent.
    pub seed: Option<PieceSeed>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pieces: Vec::new(),
            seed: None,
        }
    }
}

impl BoardConfig {
    /// Parses a JSON config and checks the board dimensions.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that both dimensions lie within [`MIN_SIZE`]..=[`MAX_SIZE`].
    pub fn validate(&self) -> Result<(), InvalidBoardSizeError> {
        validate_size(self.width, self.height)
    }
}

pub(crate) fn validate_size(width: usize, height: usize) -> Result<(), InvalidBoardSizeError> {
    let range = MIN_SIZE..=MAX_SIZE;
    if range.contains(&width) && range.contains(&height) {
        Ok(())
    } else {
        Err(InvalidBoardSizeError { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = BoardConfig::from_json_str("{}").unwrap();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = BoardConfig::from_json_str(
            r#"{
                "width": 6,
                "height": 12,
                "pieces": ["T", "S", "Z"],
                "seed": "ffffffffffffffffffffffffffffffff"
            }"#,
        )
        .unwrap();
        assert_eq!(config.width, 6);
        assert_eq!(config.height, 12);
        assert_eq!(config.pieces, [PieceKind::T, PieceKind::S, PieceKind::Z]);
        assert_eq!(config.seed, Some(PieceSeed::from_bytes([0xFF; 16])));
    }

    #[test]
    fn test_rejects_small_board() {
        let err = BoardConfig::from_json_str(r#"{ "width": 4 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Size(InvalidBoardSizeError {
                width: 4,
                height: 20
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_fields_and_bad_pieces() {
        assert!(matches!(
            BoardConfig::from_json_str(r#"{ "depth": 3 }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            BoardConfig::from_json_str(r#"{ "pieces": ["Q"] }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_size_bounds() {
        assert!(validate_size(MIN_SIZE, MIN_SIZE).is_ok());
        assert!(validate_size(MAX_SIZE, MAX_SIZE).is_ok());
        assert!(validate_size(MIN_SIZE - 1, 20).is_err());
        assert!(validate_size(10, MIN_SIZE - 1).is_err());
        assert!(validate_size(MAX_SIZE + 1, 20).is_err());
    }
}
