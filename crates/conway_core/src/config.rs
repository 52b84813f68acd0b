//! # Simulation Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file is a valid configuration.
//!
//! ```toml
//! width = 80
//! height = 24
//! tick_interval_ms = 10
//! seed = 42                 # omit for a clock-derived seed
//! seed_mode = "oscillators" # random | still_life | oscillators | spaceships | gospers_guns
//! rule = "B3/S23"
//! colors = true
//! start_running = false
//! patterns = "data/patterns.toml"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{LifeError, LifeResult};
use crate::rule::Rule;
use crate::seed::{GridSeed, SeedMode};

/// Shortest accepted tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 1;

/// Longest accepted tick interval in milliseconds.
pub const MAX_TICK_INTERVAL_MS: u64 = 10_000;

/// Startup parameters for a simulation session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Pause between two ticks.
    pub tick_interval_ms: u64,
    /// Fixed seed. `None` derives one from the clock.
    pub seed: Option<u64>,
    /// How the initial grid is populated.
    pub seed_mode: SeedMode,
    /// Birth/survival rule in `B.../S...` notation.
    pub rule: String,
    /// Whether live cells are drawn by age.
    pub colors: bool,
    /// Whether the scheduler starts running instead of paused.
    pub start_running: bool,
    /// Path to the pattern library used by preset seed modes.
    pub patterns: Option<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            tick_interval_ms: 10,
            seed: None,
            seed_mode: SeedMode::Random,
            rule: "B3/S23".to_string(),
            colors: true,
            start_running: false,
            patterns: None,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or fails [`Self::validate`].
    pub fn from_toml_str(source: &str) -> LifeResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| LifeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> LifeResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LifeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(
            "Loaded config {}: {}x{} {} {:?}",
            path.display(),
            config.width,
            config.height,
            config.rule,
            config.seed_mode
        );
        Ok(config)
    }

    /// Checks the interval range and the rule notation.
    ///
    /// Zero-sized grids are allowed; they simply have no cells.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::InvalidConfig`] for an out-of-range interval and
    /// [`LifeError::InvalidRule`] for an unparseable rule.
    pub fn validate(&self) -> LifeResult<()> {
        if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&self.tick_interval_ms) {
            return Err(LifeError::InvalidConfig(format!(
                "tick_interval_ms must be within {MIN_TICK_INTERVAL_MS}..={MAX_TICK_INTERVAL_MS}, got {}",
                self.tick_interval_ms
            )));
        }
        Rule::parse(&self.rule)?;
        Ok(())
    }

    /// Returns the parsed rule.
    ///
    /// # Errors
    ///
    /// Returns [`LifeError::InvalidRule`] if the rule string is invalid.
    pub fn parsed_rule(&self) -> LifeResult<Rule> {
        Rule::parse(&self.rule)
    }

    /// Returns the configured seed, or a clock-derived one.
    #[must_use]
    pub fn grid_seed(&self) -> GridSeed {
        self.seed.map_or_else(GridSeed::from_clock, GridSeed::new)
    }

    /// Returns the tick interval as a [`Duration`].
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.parsed_rule().unwrap(), Rule::conway());
        assert_eq!(config.tick_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_full_file() {
        let config = SimulationConfig::from_toml_str(
            r#"
            width = 120
            height = 40
            tick_interval_ms = 50
            seed = 7
            seed_mode = "gospers_guns"
            rule = "b36/s23"
            colors = false
            start_running = true
            patterns = "data/patterns.toml"
            "#,
        )
        .unwrap();

        assert_eq!((config.width, config.height), (120, 40));
        assert_eq!(config.seed_mode, SeedMode::GospersGuns);
        assert_eq!(config.grid_seed(), GridSeed::new(7));
        assert_eq!(config.parsed_rule().unwrap().to_string(), "B36/S23");
        assert!(!config.colors);
        assert!(config.start_running);
        assert_eq!(config.patterns.as_deref(), Some("data/patterns.toml"));
    }

    #[test]
    fn test_rejects_bad_interval() {
        let err = SimulationConfig::from_toml_str("tick_interval_ms = 0").unwrap_err();
        assert!(matches!(err, LifeError::InvalidConfig(_)));
        assert!(SimulationConfig::from_toml_str("tick_interval_ms = 10001").is_err());
    }

    #[test]
    fn test_rejects_bad_rule() {
        let err = SimulationConfig::from_toml_str(r#"rule = "B9/S23""#).unwrap_err();
        assert!(matches!(err, LifeError::InvalidRule { .. }));
    }

    #[test]
    fn test_rejects_unknown_fields_and_modes() {
        assert!(SimulationConfig::from_toml_str("wrap_edges = true").is_err());
        assert!(SimulationConfig::from_toml_str(r#"seed_mode = "puffers""#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SimulationConfig::load("/nonexistent/conway.toml").unwrap_err();
        assert!(matches!(err, LifeError::Io { .. }));
    }
}
