use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ParseSeedError, PieceKind};

/// Seed for deterministic piece generation.
///
/// A 128-bit value that initializes the bag's generator. Two bags built from
/// the same seed hand out the same kinds in the same order. The text form is
/// 32 hexadecimal digits, which is also how the seed is serialized.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceBag, PieceSeed};
///
/// let seed: PieceSeed = "0000000000000000000000000000002a".parse().unwrap();
/// assert_eq!(seed, PieceSeed::from(42));
///
/// let mut a = PieceBag::with_seed(seed);
/// let mut b = PieceBag::with_seed(seed);
/// assert_eq!(a.next_kind(), b.next_kind());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    /// Raw seed bytes, big-endian.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl From<u64> for PieceSeed {
    fn from(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::InvalidLength { len: s.len() });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError::InvalidHex {
            text: s.to_owned(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// 7-bag piece randomizer.
///
/// The bag holds the kinds still to be handed out from the current set of
/// seven. When it runs empty it is refilled with all seven kinds in a fresh
/// shuffled order, so every bag-aligned window of seven draws contains each
/// kind exactly once and no kind is missing for more than 12 draws in a row.
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    bag: Vec<PieceKind>,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceBag {
    /// Creates a bag seeded from the thread-local generator.
    ///
    /// For reproducible sequences use [`Self::with_seed`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            bag: Vec::with_capacity(PieceKind::LEN),
        }
    }

    /// Draws the next kind, refilling the bag first if it is empty.
    pub fn next_kind(&mut self) -> PieceKind {
        loop {
            if let Some(kind) = self.bag.pop() {
                return kind;
            }
            self.refill();
        }
    }

    /// Kinds left in the current bag, in draw order.
    pub fn remaining(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().rev().copied()
    }

    /// Discards the rest of the current bag.
    ///
    /// The generator keeps its position, so a restarted game gets a new bag
    /// while the stream as a whole stays reproducible for a given seed.
    pub fn reset(&mut self) {
        self.bag.clear();
    }

    fn refill(&mut self) {
        self.bag.extend(PieceKind::ALL);
        self.bag.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_each_bag_is_a_permutation() {
        let mut bag = PieceBag::with_seed(PieceSeed::from(7));
        for _ in 0..50 {
            let draws: HashSet<_> = (0..PieceKind::LEN).map(|_| bag.next_kind()).collect();
            assert_eq!(draws.len(), PieceKind::LEN);
        }
    }

    #[test]
    fn test_no_kind_missing_for_more_than_twelve_draws() {
        let mut bag = PieceBag::with_seed(PieceSeed::from(1234));
        let mut last_seen = [0usize; PieceKind::LEN];
        for i in 1..=700 {
            let kind = bag.next_kind();
            assert!(i - last_seen[kind as usize] <= 13, "{kind:?} gap at {i}");
            last_seen[kind as usize] = i;
        }
    }

    #[test]
    fn test_remaining_matches_next_draws() {
        let mut bag = PieceBag::with_seed(PieceSeed::from(99));
        let _ = bag.next_kind();
        let remaining: Vec<_> = bag.remaining().collect();
        assert_eq!(remaining.len(), PieceKind::LEN - 1);

        let drawn: Vec<_> = (0..remaining.len()).map(|_| bag.next_kind()).collect();
        assert_eq!(drawn, remaining);
        assert_eq!(bag.remaining().count(), 0);
    }

    #[test]
    fn test_reset_starts_a_fresh_bag() {
        let mut bag = PieceBag::with_seed(PieceSeed::from(5));
        let _ = bag.next_kind();
        let _ = bag.next_kind();
        bag.reset();
        assert_eq!(bag.remaining().count(), 0);

        let draws: HashSet<_> = (0..PieceKind::LEN).map(|_| bag.next_kind()).collect();
        assert_eq!(draws.len(), PieceKind::LEN);
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let seed = PieceSeed([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ]);
        let mut bag1 = PieceBag::with_seed(seed);
        let mut bag2 = PieceBag::with_seed(seed);
        for _ in 0..30 {
            assert_eq!(bag1.next_kind(), bag2.next_kind());
        }
    }

    mod piece_seed_text {
        use super::*;

        #[test]
        fn test_display_is_32_char_hex() {
            let seed: PieceSeed = rand::rng().random();
            let text = seed.to_string();
            assert_eq!(text.len(), 32);
            assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
            assert_eq!(text.parse::<PieceSeed>().unwrap(), seed);
        }

        #[test]
        fn test_from_u64_is_big_endian() {
            assert_eq!(
                PieceSeed::from(0x0123_4567_89ab_cdef).to_string(),
                "00000000000000000123456789abcdef"
            );
        }

        #[test]
        fn test_serde_uses_hex_string() {
            let seed = PieceSeed([0xFF; 16]);
            let json = serde_json::to_string(&seed).unwrap();
            assert_eq!(json, "\"ffffffffffffffffffffffffffffffff\"");
            let back: PieceSeed = serde_json::from_str(&json).unwrap();
            assert_eq!(back, seed);
        }

        #[test]
        fn test_to_bytes_matches_text() {
            let seed = PieceSeed::from(0xABCD);
            let bytes = seed.to_bytes();
            assert_eq!(bytes[..14], [0; 14]);
            assert_eq!(bytes[14..], [0xAB, 0xCD]);
        }

        #[test]
        fn test_accepts_uppercase() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_rejects_bad_length() {
            assert_eq!(
                "abc".parse::<PieceSeed>(),
                Err(ParseSeedError::InvalidLength { len: 3 })
            );
            assert!(serde_json::from_str::<PieceSeed>("\"\"").is_err());
        }

        #[test]
        fn test_rejects_non_hex() {
            let text = "ghijklmnopqrstuvwxyzghijklmnopqr";
            let err = text.parse::<PieceSeed>().unwrap_err();
            assert!(err.to_string().contains("not hexadecimal"));
        }
    }
}
