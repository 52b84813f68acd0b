//! # Seeding
//!
//! Deterministic randomness for initial grids. Given the same [`GridSeed`],
//! a random grid of the same dimensions is **exactly** the same on every
//! platform.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

/// Seed for random grid generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSeed(u64);

impl GridSeed {
    /// Creates a new grid seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Derives a seed from the system clock.
    ///
    /// Used when no seed is configured, so every run differs.
    #[must_use]
    pub fn from_clock() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        // Fold the 128-bit timestamp into 64 bits.
        #[allow(clippy::cast_possible_truncation)]
        let folded = (nanos as u64) ^ ((nanos >> 64) as u64);
        Self(folded)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed, e.g. one per reseed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// Creates the random number generator for this seed.
    #[must_use]
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}

impl Default for GridSeed {
    fn default() -> Self {
        Self(0x00C0_FFEE_1970_1010)
    }
}

/// How a new grid is populated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    /// Every cell is independently alive with probability 1/3.
    #[default]
    Random,
    /// Still-life patterns from the pattern library.
    StillLife,
    /// Oscillator patterns from the pattern library.
    Oscillators,
    /// Spaceship patterns from the pattern library.
    Spaceships,
    /// Gosper-gun class patterns from the pattern library.
    GospersGuns,
}

impl SeedMode {
    /// All preset (non-random) modes.
    pub const PRESETS: [Self; 4] = [
        Self::StillLife,
        Self::Oscillators,
        Self::Spaceships,
        Self::GospersGuns,
    ];

    /// Returns the category key used in pattern library files.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::StillLife => "still_life",
            Self::Oscillators => "oscillators",
            Self::Spaceships => "spaceships",
            Self::GospersGuns => "gospers_guns",
        }
    }

    /// Looks a mode up by its category key.
    #[must_use]
    pub fn from_category(category: &str) -> Option<Self> {
        [Self::Random]
            .into_iter()
            .chain(Self::PRESETS)
            .find(|mode| mode.category() == category)
    }
}
