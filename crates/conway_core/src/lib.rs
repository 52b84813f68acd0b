//! # Conway Core Engine
//!
//! Concurrent Game of Life simulation:
//! - Bounded (non-wrapping) grids of aging cells
//! - Configurable birth/survival rules in `B.../S...` notation
//! - Random or preset seeding from an external pattern library
//! - A shared grid handle that is safe to advance, read and replace from
//!   any thread
//! - A gated background tick scheduler
//!
//! ## Architecture Rules
//!
//! 1. **Whole generations only** - readers never observe a half-applied step
//! 2. **Deterministic** - the same seed yields the same grid
//! 3. **No terminal code** - drawing and input belong to the application
//!
//! ## Example
//!
//! ```rust,ignore
//! use conway_core::{Grid, GridSeed, SharedGrid, TickScheduler};
//!
//! let shared = Arc::new(SharedGrid::new(Grid::random(80, 24, GridSeed::new(42))));
//! let scheduler = TickScheduler::default();
//! let grid = Arc::clone(&shared);
//! scheduler.on_tick(move || grid.advance());
//! scheduler.start();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod pattern;
pub mod rule;
pub mod scheduler;
pub mod seed;
pub mod sync;

pub use cell::Cell;
pub use config::SimulationConfig;
pub use error::{LifeError, LifeResult};
pub use grid::Grid;
pub use pattern::{Pattern, PatternLibrary};
pub use rule::Rule;
pub use scheduler::{Key, SchedulerState, TickScheduler, DEFAULT_TICK_INTERVAL};
pub use seed::{GridSeed, SeedMode};
pub use sync::SharedGrid;
