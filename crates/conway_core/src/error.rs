//! # Engine Error Types
//!
//! The simulation itself is total: neighbor lookups outside the grid are
//! absent cells and counters saturate. Errors only come from the edges that
//! parse external data (rules, patterns, configuration files).

use thiserror::Error;

/// Errors that can occur while loading rules, patterns or configuration.
#[derive(Error, Debug)]
pub enum LifeError {
    /// A rule string is not valid `B.../S...` notation.
    #[error("invalid rule {rule:?}: {reason}")]
    InvalidRule {
        /// The rejected rule string.
        rule: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Pattern data could not be decoded.
    #[error("invalid pattern {name:?}: {reason}")]
    InvalidPattern {
        /// Name of the pattern being decoded.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A decoded pattern exceeds the allowed extent.
    #[error("pattern {name:?} is too large: {width}x{height}")]
    PatternTooLarge {
        /// Name of the pattern.
        name: String,
        /// Decoded width.
        width: usize,
        /// Decoded height.
        height: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading a configuration or pattern file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for engine operations that parse external data.
pub type LifeResult<T> = Result<T, LifeError>;
