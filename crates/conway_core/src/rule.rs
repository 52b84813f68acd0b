//! # Birth / Survival Rules
//!
//! Life-like rules written in `B/S` notation. `B3/S23` is Conway's Life:
//! a dead cell with exactly three living neighbors is born, a living cell
//! with two or three living neighbors survives, every other cell is dead in
//! the next generation.

use std::fmt;
use std::str::FromStr;

use crate::error::{LifeError, LifeResult};

/// Largest possible neighbor count in a Moore neighborhood.
pub const MAX_NEIGHBORS: u8 = 8;

/// A life-like rule, stored as two bit sets over neighbor counts `0..=8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rule {
    born: u16,
    survive: u16,
}

impl Rule {
    /// Conway's Life, `B3/S23`.
    #[must_use]
    pub const fn conway() -> Self {
        Self {
            born: 1 << 3,
            survive: (1 << 2) | (1 << 3),
        }
    }

    /// Builds a rule from explicit neighbor counts.
    ///
    /// Counts above [`MAX_NEIGHBORS`] are ignored.
    #[must_use]
    pub fn from_counts(born: &[u8], survive: &[u8]) -> Self {
        let mask = |counts: &[u8]| {
            counts
                .iter()
                .filter(|&&n| n <= MAX_NEIGHBORS)
                .fold(0u16, |acc, &n| acc | (1 << n))
        };
        Self {
            born: mask(born),
            survive: mask(survive),
        }
    }

    /// Parses `B.../S...` notation (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::InvalidRule`] if either half is missing its
    /// prefix or contains anything other than digits `0..=8`.
    pub fn parse(notation: &str) -> LifeResult<Self> {
        let invalid = |reason: &str| LifeError::InvalidRule {
            rule: notation.to_string(),
            reason: reason.to_string(),
        };

        let upper = notation.trim().to_ascii_uppercase();
        let (b, s) = upper
            .split_once('/')
            .ok_or_else(|| invalid("expected B.../S..."))?;
        let b = b.strip_prefix('B').ok_or_else(|| invalid("birth part must start with B"))?;
        let s = s.strip_prefix('S').ok_or_else(|| invalid("survival part must start with S"))?;

        let digits = |part: &str| -> LifeResult<u16> {
            part.chars().try_fold(0u16, |acc, c| {
                match c.to_digit(10) {
                    Some(n) if n <= u32::from(MAX_NEIGHBORS) => Ok(acc | (1 << n)),
                    _ => Err(invalid(&format!("unexpected character {c:?}"))),
                }
            })
        };

        Ok(Self {
            born: digits(b)?,
            survive: digits(s)?,
        })
    }

    /// Returns whether a dead cell with `neighbors` living neighbors is born.
    #[inline]
    #[must_use]
    pub const fn is_born(self, neighbors: usize) -> bool {
        neighbors <= MAX_NEIGHBORS as usize && self.born & (1 << neighbors) != 0
    }

    /// Returns whether a living cell with `neighbors` living neighbors survives.
    #[inline]
    #[must_use]
    pub const fn survives(self, neighbors: usize) -> bool {
        neighbors <= MAX_NEIGHBORS as usize && self.survive & (1 << neighbors) != 0
    }

    /// Computes the next liveness of a cell.
    #[inline]
    #[must_use]
    pub const fn next_state(self, alive: bool, neighbors: usize) -> bool {
        if alive {
            self.survives(neighbors)
        } else {
            self.is_born(neighbors)
        }
    }

    /// Well-known life-like rules with their common titles.
    #[must_use]
    pub fn named() -> Vec<(&'static str, Self)> {
        [
            ("Conway's Life", "B3/S23"),
            ("HighLife", "B36/S23"),
            ("Replicator", "B1357/S1357"),
            ("Fredkin", "B1357/S02468"),
            ("Seeds", "B2/S"),
            ("Live Free or Die", "B2/S0"),
            ("Life Without Death", "B3/S012345678"),
            ("Flock", "B3/S12"),
            ("Mazectric", "B3/S1234"),
            ("Maze", "B3/S12345"),
            ("2x2", "B36/S125"),
            ("Move", "B368/S245"),
            ("Day & Night", "B3678/S34678"),
            ("DryLife", "B37/S23"),
            ("Pedestrian Life", "B38/S23"),
        ]
        .into_iter()
        .filter_map(|(title, notation)| Self::parse(notation).ok().map(|rule| (title, rule)))
        .collect()
    }

    /// Looks up a rule from [`Rule::named`] by title, ignoring case.
    #[must_use]
    pub fn from_title(title: &str) -> Option<Self> {
        let title = title.trim();
        Self::named()
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(title))
            .map(|(_, rule)| rule)
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::conway()
    }
}

impl FromStr for Rule {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_set = |f: &mut fmt::Formatter<'_>, set: u16| -> fmt::Result {
            for n in 0..=MAX_NEIGHBORS {
                if set & (1 << n) != 0 {
                    write!(f, "{n}")?;
                }
            }
            Ok(())
        };
        f.write_str("B")?;
        write_set(f, self.born)?;
        f.write_str("/S")?;
        write_set(f, self.survive)
    }
}
