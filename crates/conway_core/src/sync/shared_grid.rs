//! # Shared Grid Handle
//!
//! A [`Grid`] behind a single mutex, shared between the ticking loop, the
//! renderer and input handlers.
//!
//! ## Thread Safety
//!
//! - `read` / `snapshot`: observe one complete generation
//! - `mutate` / `update` / `replace`: install a complete generation
//! - `exchange`: swap two handles' grids, deadlock-free in either order

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::grid::Grid;

/// Source of handle identities. Lock ordering in `exchange` follows them.
static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Thread-safe owner of one [`Grid`].
///
/// ## Usage
///
/// ```rust,ignore
/// let shared = Arc::new(SharedGrid::new(Grid::random(80, 24, seed)));
///
/// // Ticker thread
/// shared.advance();
///
/// // Render callback
/// shared.read(|grid| renderer.draw(grid));
///
/// // Input handler
/// shared.replace(Grid::random(80, 24, seed.derive(1)));
/// ```
pub struct SharedGrid {
    /// Unique identity, fixes the lock order between two handles.
    id: u64,
    /// The protected grid.
    grid: Mutex<Grid>,
}

impl SharedGrid {
    /// Wraps a grid in a new handle.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            grid: Mutex::new(grid),
        }
    }

    /// Returns the handle identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Runs `f` against the current grid while holding the lock.
    pub fn read<R>(&self, f: impl FnOnce(&Grid) -> R) -> R {
        let guard = self.grid.lock();
        f(&guard)
    }

    /// Replaces the grid with `f(current)` while holding the lock.
    ///
    /// `f` receives a value copy of the current grid. If `f` panics the
    /// installed grid is left as it was.
    pub fn mutate(&self, f: impl FnOnce(Grid) -> Grid) {
        let mut guard = self.grid.lock();
        let next = f(guard.clone());
        *guard = next;
    }

    /// Runs `f` with mutable access to the grid while holding the lock.
    ///
    /// Intended for operations that already install their result as a
    /// whole, such as [`Grid::next`] and [`Grid::resize`].
    pub fn update<R>(&self, f: impl FnOnce(&mut Grid) -> R) -> R {
        let mut guard = self.grid.lock();
        f(&mut guard)
    }

    /// Advances the grid by one generation.
    pub fn advance(&self) {
        self.update(Grid::next);
    }

    /// Installs `grid` wholesale, discarding the current one.
    pub fn replace(&self, grid: Grid) {
        let (width, height) = (grid.width(), grid.height());
        let previous = std::mem::replace(&mut *self.grid.lock(), grid);
        tracing::debug!(
            "Grid {} replaced: {}x{} -> {}x{}",
            self.id,
            previous.width(),
            previous.height(),
            width,
            height
        );
    }

    /// Returns a copy of the current grid.
    ///
    /// The copy always reflects one complete generation.
    #[must_use]
    pub fn snapshot(&self) -> Grid {
        self.grid.lock().clone()
    }

    /// Swaps the grids owned by `self` and `other`.
    ///
    /// Both locks are taken in ascending handle-id order, so two threads
    /// exchanging the same pair in opposite directions cannot deadlock.
    /// Exchanging a handle with itself does nothing.
    pub fn exchange(&self, other: &Self) {
        if self.id == other.id {
            return;
        }
        let (first, second) = if self.id < other.id {
            (self, other)
        } else {
            (other, self)
        };

        let mut first_grid = first.grid.lock();
        let mut second_grid = second.grid.lock();
        std::mem::swap(&mut *first_grid, &mut *second_grid);
        tracing::debug!("Exchanged grids {} <-> {}", first.id, second.id);
    }

    /// Returns the number of living cells.
    #[must_use]
    pub fn population(&self) -> u64 {
        self.read(Grid::population)
    }

    /// Returns the number of generations computed so far.
    #[must_use]
    pub fn turns(&self) -> u64 {
        self.read(Grid::turns)
    }

    /// Returns `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        self.read(|grid| (grid.width(), grid.height()))
    }
}

/// Cloning copies a consistent snapshot into a new, independent handle.
impl Clone for SharedGrid {
    fn clone(&self) -> Self {
        Self::new(self.snapshot())
    }
}

impl From<Grid> for SharedGrid {
    fn from(grid: Grid) -> Self {
        Self::new(grid)
    }
}

impl fmt::Debug for SharedGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        f.debug_struct("SharedGrid")
            .field("id", &self.id)
            .field("width", &width)
            .field("height", &height)
            .finish()
    }
}
