//! Measurement result data model, run snapshots, and snapshot persistence
//!
//! A `RunSnapshot` is the unit of persistence and of regression comparison:
//! `{problem_number, problem_title, timestamp, benchmark_config, stages:
//! {stage_name: {input_value: [MeasurementResult...]}}, summary,
//! total_benchmark_time}`. Snapshots are immutable once serialized.
//!
//! Measurement outcomes are a tagged union (completed | timed_out | errored)
//! rather than infinity sentinels, so a timed-out result carries no timing
//! fields at all and can never be mistaken for a fast one.

use chrono::{DateTime, Duration as ChronoDuration, Local, LocalResult, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::candidate::CandidateDescriptor;
use crate::config::StagedBenchmarkConfig;
use crate::error::{BenchError, Result};
use crate::stats::TimingStats;

/// Filename stamp for persisted snapshots (e.g. `2026-08-23_14-05-31.json`)
pub const SNAPSHOT_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Candidate answer, optionally replaced by an opaque marker
///
/// Answers can be withheld from stored snapshots (answer-hiding policy)
/// without affecting any timing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Value(String),
    Hidden,
}

/// Timing data for a measurement that ran to completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedMeasurement {
    #[serde(flatten)]
    pub stats: TimingStats,
    /// Raw per-trial durations in seconds
    pub execution_times: Vec<f32>,
    /// Number of timed trials actually performed
    pub adaptive_runs: u32,
    /// Mean time divided by the fastest mean in the (stage, input) group;
    /// set by ranking, 1.0 for the fastest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_speed: Option<f32>,
    pub answer: Answer,
}

/// How one (candidate, input) measurement ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MeasurementOutcome {
    Completed(CompletedMeasurement),
    TimedOut,
    Errored { message: String },
}

/// One candidate measured at one input value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    #[serde(flatten)]
    pub candidate: CandidateDescriptor,
    pub input_value: u64,
    #[serde(flatten)]
    pub outcome: MeasurementOutcome,
}

impl MeasurementResult {
    /// Mean trial duration, present only for completed measurements
    pub fn mean_time(&self) -> Option<f32> {
        match &self.outcome {
            MeasurementOutcome::Completed(c) => Some(c.stats.mean_time),
            _ => None,
        }
    }

    pub fn relative_speed(&self) -> Option<f32> {
        match &self.outcome {
            MeasurementOutcome::Completed(c) => c.relative_speed,
            _ => None,
        }
    }

    pub fn timeout_occurred(&self) -> bool {
        matches!(self.outcome, MeasurementOutcome::TimedOut)
    }

    /// Whether this measurement produced usable timing data
    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, MeasurementOutcome::Completed(_))
    }
}

/// Ordered mapping of input value to the measurements taken at that input
pub type StageResult = BTreeMap<u64, Vec<MeasurementResult>>;

/// Timeout statistics across a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeoutStatistics {
    pub total_measurements: usize,
    pub timeouts_by_class: BTreeMap<String, usize>,
    pub timeout_rate: f32,
}

/// Summary statistics assembled when a run finishes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Stage names in execution order (including partially completed ones)
    pub stages_completed: Vec<String>,
    pub total_input_values_tested: usize,
    pub algorithm_classes_tested: Vec<String>,
    pub timeout_statistics: TimeoutStatistics,
    /// stage -> input value (as string) -> fastest candidate name
    pub fastest_by_stage: BTreeMap<String, BTreeMap<String, String>>,
}

/// Complete, persisted record of one benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub problem_number: String,
    pub problem_title: String,
    pub timestamp: DateTime<Local>,
    pub benchmark_config: StagedBenchmarkConfig,
    pub stages: BTreeMap<String, StageResult>,
    pub summary: RunSummary,
    /// Total wall time of the run, in seconds
    pub total_benchmark_time: f32,
}

/// Canonical filename for a snapshot taken at `timestamp`
pub fn snapshot_filename(timestamp: &DateTime<Local>) -> String {
    format!("{}.json", timestamp.format(SNAPSHOT_STAMP_FORMAT))
}

/// Write a snapshot as pretty-printed JSON, creating parent directories
pub fn save(path: &Path, snapshot: &RunSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a snapshot back; any failure is `SnapshotUnavailable`
pub fn load(path: &Path) -> Result<RunSnapshot> {
    let data = fs::read_to_string(path).map_err(|e| BenchError::SnapshotUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&data).map_err(|e| BenchError::SnapshotUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Snapshot files under `dir` whose filename stamp falls within the last
/// `days_back` days, most recent first
///
/// Files whose names do not parse as a snapshot stamp are ignored rather
/// than treated as errors.
pub fn list_by_recency(dir: &Path, days_back: i64) -> Vec<PathBuf> {
    let cutoff = Local::now() - ChronoDuration::days(days_back);
    let mut stamped: Vec<(DateTime<Local>, PathBuf)> = Vec::new();

    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Ok(naive) = NaiveDateTime::parse_from_str(stem, SNAPSHOT_STAMP_FORMAT) else {
            continue;
        };
        let LocalResult::Single(stamp) = Local.from_local_datetime(&naive) else {
            continue;
        };
        if stamp >= cutoff {
            stamped.push((stamp, path));
        }
    }

    stamped.sort_by(|a, b| b.0.cmp(&a.0));
    stamped.into_iter().map(|(_, path)| path).collect()
}

/// Most recent snapshot within the lookback window, if any
pub fn find_baseline(dir: &Path, days_back: i64) -> Option<PathBuf> {
    list_by_recency(dir, days_back).into_iter().next()
}
