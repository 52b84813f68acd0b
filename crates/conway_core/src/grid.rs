//! # Grid
//!
//! A bounded 2-D array of [`Cell`]s and the generation-advance algorithm.
//!
//! ## Edges
//!
//! The grid does not wrap. A coordinate outside `[0, width) x [0, height)`
//! is simply "no cell": corner cells have three candidate neighbors, other
//! border cells five, interior cells eight.
//!
//! ## Generations
//!
//! ```text
//!   generation n (read only) ──count neighbors──┐
//!                                               ▼
//!   copy of generation n ──apply rule per cell──> generation n+1 ──install
//! ```
//!
//! Neighbor counts are always taken from the complete previous generation,
//! never from a partially updated one.

use std::sync::Arc;

use rand::Rng;

use crate::cell::Cell;
use crate::pattern::{Pattern, PatternLibrary};
use crate::rule::Rule;
use crate::seed::{GridSeed, SeedMode};

/// Relative positions of the eight Moore neighbors, as `(dx, dy)`.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// How the grid was populated, kept so a resize can re-seed the same way.
#[derive(Clone, Debug)]
struct Seeding {
    mode: SeedMode,
    seed: GridSeed,
    library: Arc<PatternLibrary>,
}

/// A bounded Game of Life grid.
///
/// Cells are indexed `[row][col]`, i.e. `(x, y)` lives at `cells[y][x]`.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Cell>>,
    turns: u64,
    colors: bool,
    rule: Rule,
    seeding: Seeding,
}

impl Grid {
    /// Creates a grid and populates it according to `mode`.
    ///
    /// Random mode makes every cell alive with probability 1/3, drawn from
    /// `seed`. Preset modes lay out the library's patterns for that mode on
    /// an otherwise dead grid.
    #[must_use]
    pub fn create(
        width: usize,
        height: usize,
        mode: SeedMode,
        library: &Arc<PatternLibrary>,
        seed: GridSeed,
    ) -> Self {
        let mut grid = Self::blank(
            width,
            height,
            Seeding {
                mode,
                seed,
                library: Arc::clone(library),
            },
        );
        grid.populate();
        grid
    }

    /// Creates a randomly seeded grid.
    #[must_use]
    pub fn random(width: usize, height: usize, seed: GridSeed) -> Self {
        Self::create(width, height, SeedMode::Random, &Arc::default(), seed)
    }

    /// Creates an all-dead grid.
    #[must_use]
    pub fn empty(width: usize, height: usize) -> Self {
        Self::blank(
            width,
            height,
            Seeding {
                mode: SeedMode::Random,
                seed: GridSeed::default(),
                library: Arc::default(),
            },
        )
    }

    /// Creates a dead grid with the given `(x, y)` cells alive.
    ///
    /// Out-of-bounds coordinates are ignored.
    #[must_use]
    pub fn from_cells(width: usize, height: usize, live: &[(usize, usize)]) -> Self {
        let mut grid = Self::empty(width, height);
        for &(x, y) in live {
            grid.set_alive(x, y, true);
        }
        grid
    }

    fn blank(width: usize, height: usize, seeding: Seeding) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![Cell::DEAD; width]; height],
            turns: 0,
            colors: true,
            rule: Rule::conway(),
            seeding,
        }
    }

    fn populate(&mut self) {
        match self.seeding.mode {
            SeedMode::Random => {
                let mut rng = self.seeding.seed.rng();
                for cell in self.cells.iter_mut().flatten() {
                    cell.set_alive(rng.gen_ratio(1, 3));
                }
            }
            mode => {
                let library = Arc::clone(&self.seeding.library);
                let placements = library.layout(mode, self.width, self.height);
                if placements.is_empty() {
                    tracing::warn!(
                        "No {} patterns fit a {}x{} grid",
                        mode.category(),
                        self.width,
                        self.height
                    );
                }
                for (x, y, pattern) in placements {
                    self.stamp(pattern, x, y);
                }
            }
        }
    }

    /// Returns the grid width.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of generations computed so far.
    #[inline]
    #[must_use]
    pub const fn turns(&self) -> u64 {
        self.turns
    }

    /// Returns the number of living cells.
    #[must_use]
    pub fn population(&self) -> u64 {
        self.cells.iter().flatten().filter(|c| c.is_alive()).count() as u64
    }

    /// Display hint: whether renderers should color cells by age.
    ///
    /// Has no effect on the simulation.
    #[inline]
    #[must_use]
    pub const fn colors(&self) -> bool {
        self.colors
    }

    /// Sets the color display hint.
    #[inline]
    pub fn set_colors(&mut self, colors: bool) {
        self.colors = colors;
    }

    /// Returns the active rule.
    #[inline]
    #[must_use]
    pub const fn rule(&self) -> Rule {
        self.rule
    }

    /// Replaces the active rule. Takes effect on the next generation.
    #[inline]
    pub fn set_rule(&mut self, rule: Rule) {
        self.rule = rule;
    }

    /// Returns how this grid was seeded.
    #[inline]
    #[must_use]
    pub const fn seed_mode(&self) -> SeedMode {
        self.seeding.mode
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn cell_at(&self, x: usize, y: usize) -> Option<&Cell> {
        self.cells.get(y)?.get(x)
    }

    /// Returns the cell at offset `(dx, dy)` from `(x, y)`, if it exists.
    #[inline]
    fn neighbor(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<&Cell> {
        self.cell_at(x.checked_add_signed(dx)?, y.checked_add_signed(dy)?)
    }

    /// Iterates over the in-bounds neighbors of `(x, y)`.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = &Cell> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |&(dx, dy)| self.neighbor(x, y, dx, dy))
    }

    /// Counts the living neighbors of `(x, y)`.
    #[must_use]
    pub fn living_neighbors(&self, x: usize, y: usize) -> usize {
        self.neighbors(x, y).filter(|c| c.is_alive()).count()
    }

    /// Iterates over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Computes the next generation and installs it.
    ///
    /// Every neighbor count reads the current generation; results go into
    /// a copy that replaces the cell matrix once complete. Surviving cells
    /// age by one, dying cells reset to age zero, newborn cells start at
    /// zero. The turn counter saturates at `u64::MAX`.
    pub fn next(&mut self) {
        let mut cells = self.cells.clone();

        for (y, row) in cells.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                let alive = cell.is_alive();
                let count = self.living_neighbors(x, y);

                cell.set_alive(self.rule.next_state(alive, count));
                if alive {
                    cell.grow_older();
                }
            }
        }

        self.cells = cells;
        self.turns = self.turns.saturating_add(1);
    }

    /// Consumes the grid and returns its successor.
    #[must_use]
    pub fn advanced(mut self) -> Self {
        self.next();
        self
    }

    /// Replaces the grid with a freshly seeded one of the new dimensions.
    ///
    /// This is a full re-seed with the grid's seed mode, not a crop or pad
    /// of the existing cells. Rule and color hint carry over; the turn
    /// counter restarts at zero.
    pub fn resize(&mut self, width: usize, height: usize) {
        let purpose = ((width as u64) << 32) ^ height as u64;
        let seeding = Seeding {
            seed: self.seeding.seed.derive(purpose),
            ..self.seeding.clone()
        };

        let mut grid = Self::blank(width, height, seeding);
        grid.colors = self.colors;
        grid.rule = self.rule;
        grid.populate();
        *self = grid;
    }

    /// Sets the liveness of the cell at `(x, y)`.
    ///
    /// Returns false if the coordinate is outside the grid.
    pub fn set_alive(&mut self, x: usize, y: usize, alive: bool) -> bool {
        match self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            Some(cell) => {
                cell.set_alive(alive);
                true
            }
            None => false,
        }
    }

    /// Flips the cell at `(x, y)`. Returns false outside the grid.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let alive = match self.cell_at(x, y) {
            Some(cell) => cell.is_alive(),
            None => return false,
        };
        self.set_alive(x, y, !alive)
    }

    /// Kills every cell and restarts the turn counter.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            *cell = Cell::DEAD;
        }
        self.turns = 0;
    }

    /// Draws a pattern's live cells with its origin at `(x, y)`.
    ///
    /// Returns false, leaving the grid untouched, if the pattern does not
    /// fit entirely.
    pub fn stamp(&mut self, pattern: &Pattern, x: usize, y: usize) -> bool {
        let fits = |origin: usize, extent: usize, limit: usize| {
            origin.checked_add(extent).is_some_and(|end| end <= limit)
        };
        if !fits(x, pattern.width(), self.width) || !fits(y, pattern.height(), self.height) {
            return false;
        }
        for &(px, py) in pattern.cells() {
            self.cells[y + py][x + px].set_alive(true);
        }
        true
    }
}

/// Two grids are equal when they show the same generation: same
/// dimensions, cells, turn count, rule and color hint.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.turns == other.turns
            && self.colors == other.colors
            && self.rule == other.rule
            && self.cells == other.cells
    }
}

impl Eq for Grid {}
