//! # Conway
//!
//! The application crate: terminal-facing glue around `conway_core`.
//!
//! ```text
//! ┌──────────────┐   InputEvent   ┌───────────┐   render / advance   ┌────────────┐
//! │ input thread │───────────────>│  Session  │─────────────────────>│ SharedGrid │
//! └──────────────┘   (bounded)    │ scheduler │                      └────────────┘
//!                                 └─────┬─────┘
//!                                       │ frames
//!                                       ▼
//!                                 TextRenderer ──> stdout
//! ```
//!
//! ## Modules
//!
//! - `events`: input events and their bounded queue
//! - `render`: plain-text frames with age colors
//! - `session`: wiring and key bindings

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod events;
pub mod render;
pub mod session;

pub use conway_core as core;

pub use events::{InputEvent, InputQueue, InputReceiver, InputSender, Received};
pub use render::{Status, TextRenderer};
pub use session::Session;
