//! Immutable engine configuration and request normalisation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CORE_FRACTION_DENOMINATOR, CORE_FRACTION_NUMERATOR, DEFAULT_THREAD_COUNT,
    DEFAULT_TRIAL_COUNT, MAX_TRIAL_COUNT, MAX_TRIALS_PER_LOOP,
};

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be at least 1 (got 0)")]
    ZeroValue { field: &'static str },
    #[error("default trial count {default} exceeds maximum {max}")]
    DefaultAboveMax { default: u64, max: u64 },
    #[error("core fraction {numerator}/{denominator} must lie in (0, 1]")]
    CoreFraction {
        numerator: usize,
        denominator: usize,
    },
    #[error("config document is not valid JSON: {0}")]
    Parse(String),
}

/// Defaults and limits captured by a [`SimulationEngine`](crate::SimulationEngine)
/// at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default = "SimulatorConfig::default_trial_count")]
    pub default_trial_count: u64,
    #[serde(default = "SimulatorConfig::default_thread_count")]
    pub default_thread_count: usize,
    #[serde(default = "SimulatorConfig::default_max_trial_count")]
    pub max_trial_count: u64,
    #[serde(default = "SimulatorConfig::default_max_trials_per_loop")]
    pub max_trials_per_loop: u64,
    #[serde(default = "SimulatorConfig::default_core_numerator")]
    pub core_fraction_numerator: usize,
    #[serde(default = "SimulatorConfig::default_core_denominator")]
    pub core_fraction_denominator: usize,
    #[serde(default = "SimulatorConfig::detect_logical_cores")]
    pub logical_cores: usize,
    /// Fixed generator seed. Worker generators are derived from the wall
    /// clock when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulatorConfig {
    const fn default_trial_count() -> u64 {
        DEFAULT_TRIAL_COUNT
    }

    const fn default_thread_count() -> usize {
        DEFAULT_THREAD_COUNT
    }

    const fn default_max_trial_count() -> u64 {
        MAX_TRIAL_COUNT
    }

    const fn default_max_trials_per_loop() -> u64 {
        MAX_TRIALS_PER_LOOP
    }

    const fn default_core_numerator() -> usize {
        CORE_FRACTION_NUMERATOR
    }

    const fn default_core_denominator() -> usize {
        CORE_FRACTION_DENOMINATOR
    }

    fn detect_logical_cores() -> usize {
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }

    /// Parse a (possibly partial) JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or the resulting
    /// configuration fails [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[must_use]
    pub const fn with_max_trials_per_loop(mut self, per_loop: u64) -> Self {
        self.max_trials_per_loop = per_loop;
        self
    }

    #[must_use]
    pub const fn with_logical_cores(mut self, cores: usize) -> Self {
        self.logical_cores = cores;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.default_trial_count == 0 {
            return Err(ConfigError::ZeroValue {
                field: "default_trial_count",
            });
        }
        if self.default_thread_count == 0 {
            return Err(ConfigError::ZeroValue {
                field: "default_thread_count",
            });
        }
        if self.max_trial_count == 0 {
            return Err(ConfigError::ZeroValue {
                field: "max_trial_count",
            });
        }
        if self.max_trials_per_loop == 0 {
            return Err(ConfigError::ZeroValue {
                field: "max_trials_per_loop",
            });
        }
        if self.default_trial_count > self.max_trial_count {
            return Err(ConfigError::DefaultAboveMax {
                default: self.default_trial_count,
                max: self.max_trial_count,
            });
        }
        if self.core_fraction_numerator == 0
            || self.core_fraction_denominator == 0
            || self.core_fraction_numerator > self.core_fraction_denominator
        {
            return Err(ConfigError::CoreFraction {
                numerator: self.core_fraction_numerator,
                denominator: self.core_fraction_denominator,
            });
        }
        Ok(())
    }

    /// Highest thread count a run may use. Never below one.
    #[must_use]
    pub fn thread_ceiling(&self) -> usize {
        let scaled = self.logical_cores.saturating_mul(self.core_fraction_numerator)
            / self.core_fraction_denominator.max(1);
        scaled.max(1)
    }

    /// Normalise caller input into a runnable request.
    ///
    /// Zero counts are replaced by the configured defaults and counts above
    /// the limits are clamped. Neither case is reported as an error.
    #[must_use]
    pub fn resolve(&self, trials: u64, threads: usize) -> SimulationRequest {
        let total_trials = if trials == 0 {
            log::debug!(
                "trial count 0 replaced by default {}",
                self.default_trial_count
            );
            self.default_trial_count
        } else if trials > self.max_trial_count {
            log::debug!(
                "trial count {trials} clamped to maximum {}",
                self.max_trial_count
            );
            self.max_trial_count
        } else {
            trials
        };

        let ceiling = self.thread_ceiling();
        let requested_threads = if threads == 0 {
            log::debug!(
                "thread count 0 replaced by default {}",
                self.default_thread_count
            );
            self.default_thread_count
        } else {
            threads
        };
        let thread_count = if requested_threads > ceiling {
            log::debug!("thread count {requested_threads} clamped to ceiling {ceiling}");
            ceiling
        } else {
            requested_threads
        };

        SimulationRequest {
            total_trials,
            thread_count,
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            default_trial_count: Self::default_trial_count(),
            default_thread_count: Self::default_thread_count(),
            max_trial_count: Self::default_max_trial_count(),
            max_trials_per_loop: Self::default_max_trials_per_loop(),
            core_fraction_numerator: Self::default_core_numerator(),
            core_fraction_denominator: Self::default_core_denominator(),
            logical_cores: Self::detect_logical_cores(),
            seed: None,
        }
    }
}

/// Trial and thread counts for one run.
///
/// After [`SimulatorConfig::resolve`] both counts are at least one and within
/// the configured limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationRequest {
    pub total_trials: u64,
    pub thread_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eight_core() -> SimulatorConfig {
        SimulatorConfig::default().with_logical_cores(8)
    }

    #[test]
    fn zero_inputs_take_defaults() {
        let request = eight_core().resolve(0, 0);
        assert_eq!(request.total_trials, DEFAULT_TRIAL_COUNT);
        assert_eq!(request.thread_count, DEFAULT_THREAD_COUNT);
    }

    #[test]
    fn oversized_inputs_are_clamped() {
        let cfg = eight_core();
        let request = cfg.resolve(u64::MAX, 64);
        assert_eq!(request.total_trials, MAX_TRIAL_COUNT);
        assert_eq!(request.thread_count, 6);
    }

    #[test]
    fn thread_ceiling_never_drops_below_one() {
        assert_eq!(SimulatorConfig::default().with_logical_cores(1).thread_ceiling(), 1);
        assert_eq!(SimulatorConfig::default().with_logical_cores(0).thread_ceiling(), 1);
        assert_eq!(SimulatorConfig::default().with_logical_cores(3).thread_ceiling(), 2);
        assert_eq!(SimulatorConfig::default().with_logical_cores(16).thread_ceiling(), 12);
    }

    #[test]
    fn default_thread_count_is_clamped_on_small_hosts() {
        let mut cfg = SimulatorConfig::default().with_logical_cores(2);
        cfg.default_thread_count = 4;
        assert_eq!(cfg.resolve(10, 0).thread_count, 1);
    }

    #[test]
    fn in_range_inputs_pass_through() {
        let request = eight_core().resolve(12_345, 3);
        assert_eq!(
            request,
            SimulationRequest {
                total_trials: 12_345,
                thread_count: 3
            }
        );
    }

    #[test]
    fn validate_rejects_zero_chunk_size() {
        let cfg = SimulatorConfig::default().with_max_trials_per_loop(0);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroValue {
                field: "max_trials_per_loop"
            })
        );
    }

    #[test]
    fn validate_rejects_bad_core_fraction() {
        let mut cfg = SimulatorConfig::default();
        cfg.core_fraction_numerator = 5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::CoreFraction { numerator: 5, .. })
        ));
        cfg.core_fraction_numerator = 1;
        cfg.core_fraction_denominator = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_default_above_max() {
        let mut cfg = SimulatorConfig::default();
        cfg.max_trial_count = 10;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::DefaultAboveMax {
                default: DEFAULT_TRIAL_COUNT,
                max: 10
            })
        );
    }

    #[test]
    fn partial_json_overrides_named_fields_only() {
        let cfg = SimulatorConfig::from_json_str(r#"{"max_trials_per_loop": 500, "seed": 7}"#)
            .unwrap();
        assert_eq!(cfg.max_trials_per_loop, 500);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.default_trial_count, DEFAULT_TRIAL_COUNT);
        assert_eq!(cfg.max_trial_count, MAX_TRIAL_COUNT);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            SimulatorConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimulatorConfig::from_json_str(r#"{"default_thread_count": 0}"#),
            Err(ConfigError::ZeroValue { .. })
        ));
    }
}
