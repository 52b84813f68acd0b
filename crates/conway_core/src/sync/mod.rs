//! # Synchronization for the Shared Grid
//!
//! ## The Problem
//!
//! ```text
//! Ticker thread:   ADVANCE the grid every tick
//! Render callback: READ the grid every tick
//! Input handlers:  REPLACE the grid on reseed / resize / preset keys
//!
//! Without synchronization: torn frames, half-applied generations
//! ```
//!
//! ## The Solution: One Lock, No Leaked References
//!
//! ```text
//!   read(f)      ──┐
//!   mutate(f)    ──┼──> [ Mutex<Grid> ] ──> closure runs under the lock
//!   replace(g)   ──┤
//!   snapshot()   ──┘                         owned copy leaves the lock
//!
//!   exchange(a, b): lock the lower id first, then the higher id
//! ```
//!
//! Nothing hands out a live reference into the protected grid, so no caller
//! can re-enter the lock and a plain (non-recursive) mutex is enough.

mod shared_grid;

pub use shared_grid::SharedGrid;
