//! MCTS configuration.
//!
//! Passed explicitly to every search; nothing here is process-wide. Every
//! field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! enabled = true
//! iterations = 200
//! simulation = "weighted_playout"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a newly expanded node is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationPolicy {
    /// One static evaluation of the node's position.
    #[default]
    StaticEval,
    /// A short seeded random playout, weighted toward forcing moves, bounded
    /// by the style's simulation depth, then a static evaluation.
    WeightedPlayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MctsConfig {
    /// Master switch; when false the search always abstains.
    pub enabled: bool,

    /// Requested iterations per search, clamped to `max_iterations`.
    pub iterations: u32,

    /// Hard cap on iterations, bounding worst-case latency.
    pub max_iterations: u32,

    /// Exploration constant for unclassified positions. Classified
    /// positions use their style's constant.
    pub exploration: f64,

    /// Children allowed per node grow as `expansion_factor * sqrt(visits)`.
    pub expansion_factor: f64,

    /// Weight of the `sqrt(visits) / 10` confidence term in root selection.
    pub robustness_weight: f64,

    /// Flat bonus for root moves visited more than
    /// `iterations / robustness_divisor` times.
    pub robustness_bonus: f64,

    pub robustness_divisor: u32,

    pub simulation: SimulationPolicy,

    /// Seed for the playout RNG, so searches are reproducible.
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            iterations: 1000,
            max_iterations: 300,
            exploration: 1.414,
            expansion_factor: 1.8,
            robustness_weight: 0.15,
            robustness_bonus: 0.05,
            robustness_divisor: 5,
            simulation: SimulationPolicy::StaticEval,
            seed: 0x5EED,
        }
    }
}

impl MctsConfig {
    /// Enabled, with a small budget.
    pub fn for_testing() -> Self {
        Self {
            enabled: true,
            iterations: 100,
            ..Self::default()
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_simulation(mut self, simulation: SimulationPolicy) -> Self {
        self.simulation = simulation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Apply the two values a front-end controls. At least one iteration is
    /// always requested.
    pub fn sync_options(&mut self, enabled: bool, iterations: u32) {
        self.enabled = enabled;
        self.iterations = iterations.max(1);
    }

    /// Iterations a search will actually run.
    pub fn iteration_budget(&self) -> u32 {
        self.iterations.min(self.max_iterations)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("exploration", self.exploration),
            ("expansion_factor", self.expansion_factor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("robustness_weight", self.robustness_weight),
            ("robustness_bonus", self.robustness_bonus),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.robustness_divisor == 0 {
            return Err(ConfigError::Invalid(
                "robustness_divisor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
