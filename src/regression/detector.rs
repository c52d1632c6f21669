// Regression classification and analysis assembly

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{BenchError, Result};
use crate::snapshot::{self, RunSnapshot};
use crate::stats;

/// Thresholds driving regression classification
///
/// `regression_threshold`/`improvement_threshold` are fractions (0.20 =
/// 20%); `lookback_days` bounds baseline auto-discovery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionThresholds {
    pub regression_threshold: f32,
    pub improvement_threshold: f32,
    pub lookback_days: i64,
}

impl Default for RegressionThresholds {
    fn default() -> Self {
        Self {
            regression_threshold: 0.20,
            improvement_threshold: 0.20,
            lookback_days: 7,
        }
    }
}

impl RegressionThresholds {
    pub fn validate(&self) -> Result<()> {
        if !(self.regression_threshold > 0.0) {
            return Err(BenchError::ConfigInvalid(format!(
                "regression_threshold must be positive, got {}",
                self.regression_threshold
            )));
        }
        if !(self.improvement_threshold > 0.0) {
            return Err(BenchError::ConfigInvalid(format!(
                "improvement_threshold must be positive, got {}",
                self.improvement_threshold
            )));
        }
        if self.lookback_days < 1 {
            return Err(BenchError::ConfigInvalid(format!(
                "lookback_days must be at least 1, got {}",
                self.lookback_days
            )));
        }
        Ok(())
    }
}

/// Severity tier of a classified delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 20-50% slowdown
    Minor,
    /// 50-100% slowdown
    Major,
    /// More than 100% slowdown
    Critical,
    /// Speedup beyond the improvement threshold
    Improvement,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
            Severity::Improvement => "improvement",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified performance delta; immutable after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionAlert {
    pub problem_number: String,
    pub candidate_name: String,
    pub input_value: u64,
    pub current_time: f32,
    pub baseline_time: f32,
    /// Signed percentage change; positive is a slowdown
    pub regression_percent: f32,
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
}

/// Regressions counted per severity tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
}

/// Mean/median/max over a set of delta percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactStats {
    pub mean: f32,
    pub median: f32,
    pub max: f32,
}

/// Summary block of a regression analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary {
    pub total_regressions: usize,
    pub total_improvements: usize,
    pub unchanged: usize,
    pub regression_rate: f32,
    pub improvement_rate: f32,
    pub severity_breakdown: SeverityBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regression_stats: Option<ImpactStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvement_stats: Option<ImpactStats>,
}

/// Complete regression analysis of one snapshot pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionAnalysis {
    pub analysis_timestamp: DateTime<Local>,
    pub baseline_file: String,
    pub current_file: String,
    pub total_comparisons: usize,
    /// Sorted worst-first by percentage
    pub regressions: Vec<RegressionAlert>,
    /// Sorted best-first by percentage
    pub improvements: Vec<RegressionAlert>,
    pub unchanged: usize,
    pub summary: RegressionSummary,
}

impl RegressionAnalysis {
    pub fn has_critical(&self) -> bool {
        self.regressions
            .iter()
            .any(|r| r.severity == Severity::Critical)
    }

    /// Process exit-code convention consumed by CI: 0 = clean, 1 =
    /// non-critical regressions, 2 = at least one critical regression
    pub fn exit_code(&self) -> i32 {
        if self.has_critical() {
            2
        } else if !self.regressions.is_empty() {
            1
        } else {
            0
        }
    }

    /// Write the analysis as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Where one flattened mean time came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MetricKey {
    problem: String,
    candidate: String,
    input: u64,
}

/// Detects performance regressions between two finalized run snapshots
pub struct RegressionDetector {
    thresholds: RegressionThresholds,
}

impl RegressionDetector {
    pub fn new(thresholds: RegressionThresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    pub fn with_defaults() -> Self {
        Self {
            thresholds: RegressionThresholds::default(),
        }
    }

    pub fn thresholds(&self) -> &RegressionThresholds {
        &self.thresholds
    }

    /// Classify a fractional delta; `None` means unchanged
    pub fn classify(&self, percent_change: f32) -> Option<Severity> {
        if percent_change > self.thresholds.regression_threshold {
            Some(if percent_change > 1.0 {
                Severity::Critical
            } else if percent_change > 0.5 {
                Severity::Major
            } else {
                Severity::Minor
            })
        } else if percent_change < -self.thresholds.improvement_threshold {
            Some(Severity::Improvement)
        } else {
            None
        }
    }

    /// Compare two finalized snapshots
    ///
    /// Only keys present in both snapshots are compared; a baseline mean of
    /// zero or below is skipped rather than divided by.
    pub fn analyze(
        &self,
        current: &RunSnapshot,
        baseline: &RunSnapshot,
        current_file: &str,
        baseline_file: &str,
    ) -> RegressionAnalysis {
        let current_metrics = flatten_mean_times(current);
        let baseline_metrics = flatten_mean_times(baseline);
        let timestamp = Local::now();

        let mut regressions: Vec<RegressionAlert> = Vec::new();
        let mut improvements: Vec<RegressionAlert> = Vec::new();
        let mut unchanged = 0usize;

        for (key, &current_time) in &current_metrics {
            let Some(&baseline_time) = baseline_metrics.get(key) else {
                continue;
            };
            if baseline_time <= 0.0 {
                continue;
            }

            let percent_change = (current_time - baseline_time) / baseline_time;
            match self.classify(percent_change) {
                Some(Severity::Improvement) => improvements.push(RegressionAlert {
                    problem_number: key.problem.clone(),
                    candidate_name: key.candidate.clone(),
                    input_value: key.input,
                    current_time,
                    baseline_time,
                    regression_percent: percent_change * 100.0,
                    severity: Severity::Improvement,
                    timestamp,
                }),
                Some(severity) => regressions.push(RegressionAlert {
                    problem_number: key.problem.clone(),
                    candidate_name: key.candidate.clone(),
                    input_value: key.input,
                    current_time,
                    baseline_time,
                    regression_percent: percent_change * 100.0,
                    severity,
                    timestamp,
                }),
                None => unchanged += 1,
            }
        }

        // Worst regressions first, best improvements first.
        regressions.sort_by(|a, b| {
            b.regression_percent
                .partial_cmp(&a.regression_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        improvements.sort_by(|a, b| {
            a.regression_percent
                .partial_cmp(&b.regression_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let summary = build_summary(&regressions, &improvements, unchanged);
        let total_comparisons = regressions.len() + improvements.len() + unchanged;

        RegressionAnalysis {
            analysis_timestamp: timestamp,
            baseline_file: baseline_file.to_string(),
            current_file: current_file.to_string(),
            total_comparisons,
            regressions,
            improvements,
            unchanged,
            summary,
        }
    }

    /// Compare a stored snapshot against a baseline, auto-discovering the
    /// baseline in `snapshot_dir` when none is given
    ///
    /// Returns `Ok(None)` when no analysis is possible: missing or
    /// unreadable current snapshot, no baseline within the lookback window,
    /// or an unreadable baseline. The enclosing run is never failed by a
    /// missing baseline.
    pub fn compare_to_baseline(
        &self,
        current_path: &Path,
        baseline_path: Option<&Path>,
        snapshot_dir: &Path,
    ) -> Result<Option<RegressionAnalysis>> {
        let discovered;
        let baseline_path = match baseline_path {
            Some(path) => path,
            None => match snapshot::find_baseline(snapshot_dir, self.thresholds.lookback_days) {
                Some(path) => {
                    discovered = path;
                    &discovered
                }
                None => {
                    warn!(
                        "no baseline snapshot within {} days under {}",
                        self.thresholds.lookback_days,
                        snapshot_dir.display()
                    );
                    return Ok(None);
                }
            },
        };

        let current = match snapshot::load(current_path) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("current snapshot unreadable: {e}");
                return Ok(None);
            }
        };
        let baseline = match snapshot::load(baseline_path) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("baseline snapshot unreadable: {e}");
                return Ok(None);
            }
        };

        Ok(Some(self.analyze(
            &current,
            &baseline,
            &current_path.display().to_string(),
            &baseline_path.display().to_string(),
        )))
    }
}

/// Flatten a snapshot into (problem, candidate, input) -> mean time,
/// skipping timed-out and errored measurements
fn flatten_mean_times(snapshot: &RunSnapshot) -> HashMap<MetricKey, f32> {
    let mut metrics = HashMap::new();
    for stage in snapshot.stages.values() {
        for (&input, group) in stage {
            for result in group {
                if let Some(mean) = result.mean_time() {
                    metrics.insert(
                        MetricKey {
                            problem: snapshot.problem_number.clone(),
                            candidate: result.candidate.name.clone(),
                            input,
                        },
                        mean,
                    );
                }
            }
        }
    }
    metrics
}

fn build_summary(
    regressions: &[RegressionAlert],
    improvements: &[RegressionAlert],
    unchanged: usize,
) -> RegressionSummary {
    let total = regressions.len() + improvements.len() + unchanged;

    let mut breakdown = SeverityBreakdown::default();
    for alert in regressions {
        match alert.severity {
            Severity::Critical => breakdown.critical += 1,
            Severity::Major => breakdown.major += 1,
            Severity::Minor => breakdown.minor += 1,
            Severity::Improvement => {}
        }
    }

    let regression_percentages: Vec<f32> =
        regressions.iter().map(|r| r.regression_percent).collect();
    let improvement_percentages: Vec<f32> = improvements
        .iter()
        .map(|i| i.regression_percent.abs())
        .collect();

    RegressionSummary {
        total_regressions: regressions.len(),
        total_improvements: improvements.len(),
        unchanged,
        regression_rate: rate(regressions.len(), total),
        improvement_rate: rate(improvements.len(), total),
        severity_breakdown: breakdown,
        regression_stats: impact_stats(&regression_percentages),
        improvement_stats: impact_stats(&improvement_percentages),
    }
}

fn rate(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32
    } else {
        0.0
    }
}

fn impact_stats(percentages: &[f32]) -> Option<ImpactStats> {
    if percentages.is_empty() {
        return None;
    }
    let v = trueno::Vector::from_slice(percentages);
    let mean = v.mean().unwrap_or(0.0);
    Some(ImpactStats {
        mean,
        median: stats::median(percentages).unwrap_or(mean),
        max: v.max().unwrap_or(0.0),
    })
}
