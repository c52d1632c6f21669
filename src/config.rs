//! Configuration for staged benchmark execution
//!
//! The skip cutoffs (25/50) and the adaptive trial thresholds are empirical
//! policy values carried over from the original benchmark runs; they are
//! exposed as configuration defaults rather than re-derived.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{BenchError, Result};

/// One ordered stage: a name and the explicit inputs it covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub name: String,
    pub inputs: Vec<u64>,
}

impl StageConfig {
    pub fn new(name: impl Into<String>, inputs: Vec<u64>) -> Self {
        Self {
            name: name.into(),
            inputs,
        }
    }
}

/// Configuration for a staged benchmark run
///
/// # Example
/// ```
/// use eulerbench::config::StagedBenchmarkConfig;
///
/// let config = StagedBenchmarkConfig::default();
/// assert_eq!(config.timeout_seconds, 10.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedBenchmarkConfig {
    /// Ordered stages; each stage lists the exact input values to measure
    pub stages: Vec<StageConfig>,

    /// Hard wall-clock ceiling for a single candidate invocation
    pub timeout_seconds: f32,

    /// Global elapsed-time budget for the whole run, in minutes
    pub max_total_time_minutes: f32,

    /// A probe slower than this (seconds) stops measurement for the pair
    /// after that single sample, protecting the global budget
    pub early_skip_threshold: f32,

    /// Trial count when the probe is fast (<= 0.1s)
    pub default_runs: u32,

    /// Naive candidates are skipped once a stage's max input reaches this
    pub naive_skip_cutoff: u64,

    /// Naive/optimized/builtin candidates are skipped once a stage's max
    /// input reaches this, leaving only mathematical candidates
    pub efficient_skip_cutoff: u64,

    /// Record answers as an opaque hidden marker instead of their value
    pub hide_answers: bool,
}

impl Default for StagedBenchmarkConfig {
    fn default() -> Self {
        Self {
            stages: vec![
                StageConfig::new("basic", vec![1, 2, 5, 10, 15, 20]),
                StageConfig::new("extended", vec![25, 30, 35, 40]),
                StageConfig::new("scalability", vec![50, 100]),
            ],
            timeout_seconds: 10.0,
            max_total_time_minutes: 5.0,
            early_skip_threshold: 5.0,
            default_runs: 5,
            naive_skip_cutoff: 25,
            efficient_skip_cutoff: 50,
            hide_answers: false,
        }
    }
}

impl StagedBenchmarkConfig {
    /// Validate configuration; the only fatal error path in the harness
    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(BenchError::ConfigInvalid(
                "at least one stage is required".to_string(),
            ));
        }
        for stage in &self.stages {
            if stage.name.is_empty() {
                return Err(BenchError::ConfigInvalid(
                    "stage names must not be empty".to_string(),
                ));
            }
            if stage.inputs.is_empty() {
                return Err(BenchError::ConfigInvalid(format!(
                    "stage '{}' has no input values",
                    stage.name
                )));
            }
        }
        if !(self.timeout_seconds > 0.0) {
            return Err(BenchError::ConfigInvalid(format!(
                "timeout_seconds must be positive, got {}",
                self.timeout_seconds
            )));
        }
        if !(self.max_total_time_minutes > 0.0) {
            return Err(BenchError::ConfigInvalid(format!(
                "max_total_time_minutes must be positive, got {}",
                self.max_total_time_minutes
            )));
        }
        if !(self.early_skip_threshold > 0.0) {
            return Err(BenchError::ConfigInvalid(format!(
                "early_skip_threshold must be positive, got {}",
                self.early_skip_threshold
            )));
        }
        if self.default_runs == 0 {
            return Err(BenchError::ConfigInvalid(
                "default_runs must be at least 1".to_string(),
            ));
        }
        if self.naive_skip_cutoff > self.efficient_skip_cutoff {
            return Err(BenchError::ConfigInvalid(format!(
                "naive_skip_cutoff ({}) must not exceed efficient_skip_cutoff ({})",
                self.naive_skip_cutoff, self.efficient_skip_cutoff
            )));
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| BenchError::ConfigInvalid(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Per-invocation timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f32(self.timeout_seconds)
    }
}
