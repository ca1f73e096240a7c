use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Supplies the kinds of upcoming pieces.
///
/// # Supply Policy
///
/// 1. If a predetermined sequence was given, its kinds are handed out in
///    order, each exactly once
/// 2. Once the sequence is exhausted (or if none was given), every kind is
///    drawn independently and uniformly at random from the 7 shapes
///
/// [`restart`](Self::restart) rewinds the predetermined sequence to its first
/// element for a new game. The random stream is not rewound, so a restarted
/// random game deals a fresh sequence.
///
/// # Example
///
/// ```
/// use blocktris_engine::{PieceKind, PieceSupply};
///
/// let mut supply = PieceSupply::new([PieceKind::T, PieceKind::O]);
/// assert_eq!(supply.draw(), PieceKind::T);
/// assert_eq!(supply.draw(), PieceKind::O);
/// assert!(supply.is_exhausted());
///
/// // Random from here on.
/// let _ = supply.draw();
///
/// supply.restart();
/// assert_eq!(supply.draw(), PieceKind::T);
/// ```
#[derive(Debug, Clone)]
pub struct PieceSupply {
    rng: Pcg32,
    sequence: Vec<PieceKind>,
    cursor: usize,
}

impl Default for PieceSupply {
    fn default() -> Self {
        Self::new([])
    }
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed for the random stream that takes over
/// once the predetermined sequence is used up. The same seed and the same
/// sequence always produce the same pieces, which enables reproducible games
/// for debugging and deterministic tests.
///
/// Seeds serialize as 32-digit hexadecimal strings.
///
/// # Example
///
/// ```
/// use blocktris_engine::{PieceSeed, PieceSupply};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let mut supply1 = PieceSupply::with_seed([], seed);
/// let mut supply2 = PieceSupply::with_seed([], seed);
/// assert_eq!(supply1.draw(), supply2.draw());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        serializer.serialize_str(&format!("{num:032x}"))
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceSupply {
    /// Creates a supply with the given predetermined sequence and a random seed.
    ///
    /// Pass an empty sequence for a fully random game. For deterministic
    /// random pieces, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new<I>(sequence: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        Self::with_seed(sequence, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for the random stream.
    #[must_use]
    pub fn with_seed<I>(sequence: I, seed: PieceSeed) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        Self {
            rng: Pcg32::from_seed(seed.0),
            sequence: sequence.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Returns the kind of the next piece, consuming it.
    pub fn draw(&mut self) -> PieceKind {
        if let Some(&kind) = self.sequence.get(self.cursor) {
            self.cursor += 1;
            return kind;
        }
        self.rng.random()
    }

    /// Rewinds the predetermined sequence to its beginning.
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    /// The full predetermined sequence, including kinds already drawn.
    #[must_use]
    pub fn sequence(&self) -> &[PieceKind] {
        &self.sequence
    }

    /// Predetermined kinds not yet drawn.
    #[must_use]
    pub fn remaining(&self) -> &[PieceKind] {
        &self.sequence[self.cursor..]
    }

    /// Returns `true` once every predetermined kind has been drawn, at which
    /// point pieces come from the random stream.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.sequence.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    #[test]
    fn test_sequence_is_consumed_in_order() {
        let kinds = [PieceKind::Z, PieceKind::Z, PieceKind::I, PieceKind::L];
        let mut supply = PieceSupply::with_seed(kinds, SEED);
        for kind in kinds {
            assert!(!supply.is_exhausted());
            assert_eq!(supply.draw(), kind);
        }
        assert!(supply.is_exhausted());
        assert!(supply.remaining().is_empty());
        assert_eq!(supply.sequence(), kinds);
    }

    #[test]
    fn test_exhausted_sequence_falls_back_to_seeded_random() {
        let mut with_prefix = PieceSupply::with_seed([PieceKind::O], SEED);
        let mut random_only = PieceSupply::with_seed([], SEED);

        assert_eq!(with_prefix.draw(), PieceKind::O);
        for _ in 0..20 {
            assert_eq!(with_prefix.draw(), random_only.draw());
        }
    }

    #[test]
    fn test_restart_rewinds_sequence_only() {
        let mut supply = PieceSupply::with_seed([PieceKind::J, PieceKind::S], SEED);
        let mut reference = PieceSupply::with_seed([], SEED);

        assert_eq!(supply.draw(), PieceKind::J);
        assert_eq!(supply.draw(), PieceKind::S);
        assert_eq!(supply.draw(), reference.draw());

        supply.restart();
        assert_eq!(supply.remaining(), [PieceKind::J, PieceKind::S]);
        assert_eq!(supply.draw(), PieceKind::J);
        assert_eq!(supply.draw(), PieceKind::S);
        // The random stream picks up where it left off.
        assert_eq!(supply.draw(), reference.draw());
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let mut supply1 = PieceSupply::with_seed([], SEED);
        let mut supply2 = PieceSupply::with_seed([], SEED);
        for _ in 0..20 {
            assert_eq!(supply1.draw(), supply2.draw());
        }
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            // Big-endian: first byte appears first in the hex string.
            let seed = PieceSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_known_value_all_zeros() {
            let serialized = serde_json::to_string(&PieceSeed::from_bytes([0; 16])).unwrap();
            assert_eq!(serialized, "\"00000000000000000000000000000000\"");
        }

        #[test]
        fn test_deserialize_uppercase_hex() {
            let json = "\"0123456789ABCDEFFEDCBA9876543210\"";
            let deserialized: PieceSeed = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized.to_bytes()[..4], [0x01, 0x23, 0x45, 0x67]);
        }

        #[test]
        fn test_error_cases() {
            for json in [
                "\"ghijklmnopqrstuvwxyzghijklmnopqr\"",
                "\"0123456789abcdef0123456789abcde\"",
                "\"0123456789abcdef0123456789abcdef0\"",
                "\"\"",
            ] {
                let err = serde_json::from_str::<PieceSeed>(json).unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{json}: {err}");
            }
        }
    }
}
