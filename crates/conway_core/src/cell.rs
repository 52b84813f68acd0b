//! # Cell
//!
//! The smallest unit of the simulation: a liveness flag and an age.

/// A single grid cell.
///
/// A dead cell always has age zero. The age counts consecutive generations
/// a cell has stayed alive and saturates at `u64::MAX`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    alive: bool,
    age: u64,
}

impl Cell {
    /// A dead cell.
    pub const DEAD: Self = Self { alive: false, age: 0 };

    /// A newly born cell.
    pub const BORN: Self = Self { alive: true, age: 0 };

    /// Returns whether the cell is alive.
    #[inline]
    #[must_use]
    pub const fn is_alive(self) -> bool {
        self.alive
    }

    /// Returns the number of consecutive generations the cell has survived.
    #[inline]
    #[must_use]
    pub const fn age(self) -> u64 {
        self.age
    }

    /// Sets the liveness flag. Killing a cell resets its age.
    #[inline]
    pub fn set_alive(&mut self, alive: bool) {
        if !alive {
            self.age = 0;
        }
        self.alive = alive;
    }

    /// Advances the age of a surviving cell by one generation.
    ///
    /// Dead cells are left untouched.
    #[inline]
    pub fn grow_older(&mut self) {
        if self.alive {
            self.age = self.age.saturating_add(1);
        }
    }

    /// Builds a live cell with an explicit age.
    #[inline]
    #[must_use]
    pub const fn with_age(age: u64) -> Self {
        Self { alive: true, age }
    }
}
