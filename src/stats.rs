//! Descriptive statistics and relative-speed ranking
//!
//! Uses trueno's SIMD-optimized `Vector` for mean/stddev/min/max and
//! aprender's `DescriptiveStats` for medians. No custom numeric
//! implementations - leverage existing, well-tested libraries.

use aprender::stats::DescriptiveStats;
use serde::{Deserialize, Serialize};
use trueno::Vector;

use crate::snapshot::{MeasurementOutcome, MeasurementResult};

/// Descriptive statistics over one measurement's trial durations (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingStats {
    pub mean_time: f32,
    pub median_time: f32,
    pub std_deviation: f32,
    pub min_time: f32,
    pub max_time: f32,
}

/// Reduce raw trial durations to descriptive statistics
///
/// The standard deviation is 0 when fewer than two samples exist, never an
/// error. An empty slice yields all-zero statistics; callers only aggregate
/// after at least one completed trial.
pub fn aggregate(samples: &[f32]) -> TimingStats {
    if samples.is_empty() {
        return TimingStats {
            mean_time: 0.0,
            median_time: 0.0,
            std_deviation: 0.0,
            min_time: 0.0,
            max_time: 0.0,
        };
    }

    let v = Vector::from_slice(samples);
    let mean = v.mean().unwrap_or(0.0);
    let std_deviation = if samples.len() < 2 {
        0.0
    } else {
        v.stddev().unwrap_or(0.0)
    };

    TimingStats {
        mean_time: mean,
        median_time: median(samples).unwrap_or(mean),
        std_deviation,
        min_time: v.min().unwrap_or(0.0),
        max_time: v.max().unwrap_or(0.0),
    }
}

/// Median via aprender's quantile(0.5)
///
/// More robust to outliers than the mean, which matters for wall-clock
/// timings that may carry scheduling spikes.
pub fn median(samples: &[f32]) -> Option<f32> {
    if samples.is_empty() {
        return None;
    }
    let v = Vector::from_slice(samples);
    DescriptiveStats::new(&v).quantile(0.5).ok()
}

/// Fill in relative speeds within one (stage, input) group, in place
///
/// A result's relative speed is its mean time divided by the fastest mean
/// time among the completed results in the group; the fastest result gets
/// exactly 1.0 (ties included). Timed-out and errored results never carry a
/// relative speed and never influence the fastest selection. If no result
/// in the group completed, every relative speed stays unset.
pub fn rank_relative_speeds(results: &mut [MeasurementResult]) {
    let fastest = results
        .iter()
        .filter_map(MeasurementResult::mean_time)
        .fold(f32::INFINITY, f32::min);

    if !fastest.is_finite() {
        return;
    }

    for result in results.iter_mut() {
        if let MeasurementOutcome::Completed(completed) = &mut result.outcome {
            // Ties at the minimum are exactly 1.0; a zero fastest time
            // (timer resolution) must not produce NaN or a ratio below 1.
            let ratio = if completed.stats.mean_time <= fastest {
                1.0
            } else {
                completed.stats.mean_time / fastest.max(f32::MIN_POSITIVE)
            };
            completed.relative_speed = Some(ratio);
        }
    }
}
