//! Staged benchmark scheduling with a global elapsed-time budget
//!
//! Candidates are never measured concurrently: simultaneous execution would
//! contend for CPU and invalidate wall-clock comparisons. The only
//! concurrency in the harness lives inside `TimeoutGuard`.

use chrono::Local;
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::candidate::{AlgorithmClass, Candidate};
use crate::config::{StageConfig, StagedBenchmarkConfig};
use crate::error::Result;
use crate::measure::AdaptiveMeasurer;
use crate::snapshot::{
    MeasurementOutcome, MeasurementResult, RunSnapshot, RunSummary, StageResult,
    TimeoutStatistics,
};
use crate::stats;

/// Explicit elapsed-time budget for one run, threaded through the scheduler
/// and measurer instead of ambient global state
#[derive(Debug, Clone)]
pub struct TimeBudget {
    started: Instant,
    limit: Duration,
}

impl TimeBudget {
    /// Start the budget clock with a limit given in minutes
    pub fn start(minutes: f32) -> Self {
        Self {
            started: Instant::now(),
            limit: Duration::from_secs_f32(minutes * 60.0),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn exhausted(&self) -> bool {
        self.started.elapsed() >= self.limit
    }
}

/// Partitions the configured input ranges into ordered stages, applies the
/// candidate-eligibility skip policy, and assembles the run's snapshot
pub struct StagedScheduler {
    config: StagedBenchmarkConfig,
}

impl StagedScheduler {
    /// Validates the configuration up front; the only fatal error path
    pub fn new(config: StagedBenchmarkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StagedBenchmarkConfig {
        &self.config
    }

    /// Whether a candidate class is ineligible for the given inputs
    ///
    /// Naive candidates are skipped entirely once the maximum input reaches
    /// the first cutoff (default 25); naive, optimized, and builtin
    /// candidates are all skipped at the second cutoff (default 50), leaving
    /// only mathematical candidates for the largest inputs.
    pub fn should_skip(&self, class: AlgorithmClass, inputs: &[u64]) -> bool {
        let Some(&max_input) = inputs.iter().max() else {
            return false;
        };

        if class == AlgorithmClass::Naive && max_input >= self.config.naive_skip_cutoff {
            return true;
        }

        matches!(
            class,
            AlgorithmClass::Naive | AlgorithmClass::Optimized | AlgorithmClass::Builtin
        ) && max_input >= self.config.efficient_skip_cutoff
    }

    /// Run every stage in order and assemble the snapshot
    ///
    /// The global budget is sampled before each input value; once exhausted,
    /// the current stage halts (keeping its partial results) and no further
    /// stages run. Per-pair failures never abort the stage or the run.
    pub fn run(
        &self,
        problem_number: &str,
        problem_title: &str,
        candidates: &[Candidate],
    ) -> RunSnapshot {
        let budget = TimeBudget::start(self.config.max_total_time_minutes);
        let measurer = AdaptiveMeasurer::new(&self.config);

        let mut stages: BTreeMap<String, StageResult> = BTreeMap::new();
        let mut stage_order: Vec<String> = Vec::new();

        for stage in &self.config.stages {
            if budget.exhausted() {
                warn!(
                    "global time budget exhausted before stage '{}', stopping",
                    stage.name
                );
                break;
            }
            info!(
                "stage '{}': inputs {:?}",
                stage.name, stage.inputs
            );
            let results = self.run_stage(stage, candidates, &measurer, &budget);
            stage_order.push(stage.name.clone());
            stages.insert(stage.name.clone(), results);
        }

        let summary = build_summary(&stage_order, &stages);

        RunSnapshot {
            problem_number: problem_number.to_string(),
            problem_title: problem_title.to_string(),
            timestamp: Local::now(),
            benchmark_config: self.config.clone(),
            stages,
            summary,
            total_benchmark_time: budget.elapsed().as_secs_f32(),
        }
    }

    fn run_stage(
        &self,
        stage: &StageConfig,
        candidates: &[Candidate],
        measurer: &AdaptiveMeasurer<'_>,
        budget: &TimeBudget,
    ) -> StageResult {
        let mut results: StageResult = BTreeMap::new();

        for &input in &stage.inputs {
            if budget.exhausted() {
                warn!(
                    "global time budget exhausted, halting stage '{}' at n={input} \
                     (partial results kept)",
                    stage.name
                );
                break;
            }

            let mut group: Vec<MeasurementResult> = Vec::new();
            for candidate in candidates {
                let class = candidate.descriptor.algorithm_class;
                if self.should_skip(class, &[input]) {
                    debug!(
                        "skipping {} ({class}) at n={input}: too slow for this range",
                        candidate.descriptor.name
                    );
                    continue;
                }

                debug!("measuring {} at n={input}", candidate.descriptor.name);
                let result = measurer.measure(candidate, input, budget);
                match &result.outcome {
                    MeasurementOutcome::Completed(c) => info!(
                        "{}: {:.6}s ({} runs) at n={input}",
                        candidate.descriptor.name, c.stats.mean_time, c.adaptive_runs
                    ),
                    MeasurementOutcome::TimedOut => {
                        info!("{}: TIMEOUT at n={input}", candidate.descriptor.name)
                    }
                    MeasurementOutcome::Errored { message } => info!(
                        "{}: ERROR at n={input}: {message}",
                        candidate.descriptor.name
                    ),
                }
                group.push(result);
            }

            if group.is_empty() {
                continue;
            }
            stats::rank_relative_speeds(&mut group);
            results.insert(input, group);
        }

        results
    }
}

/// Summary statistics mirroring what the dashboard consumes: stage list,
/// coverage counts, timeout rates, and the fastest candidate per input
fn build_summary(stage_order: &[String], stages: &BTreeMap<String, StageResult>) -> RunSummary {
    let mut total_inputs = 0;
    let mut classes: BTreeSet<String> = BTreeSet::new();
    let mut total_measurements = 0;
    let mut timeouts = 0;
    let mut timeouts_by_class: BTreeMap<String, usize> = BTreeMap::new();
    let mut fastest_by_stage: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();

    for (stage_name, stage) in stages {
        total_inputs += stage.len();
        let mut stage_fastest: BTreeMap<String, String> = BTreeMap::new();

        for (input, group) in stage {
            let mut fastest: Option<(&MeasurementResult, f32)> = None;
            for result in group {
                classes.insert(result.candidate.algorithm_class.to_string());
                total_measurements += 1;
                if result.timeout_occurred() {
                    timeouts += 1;
                    *timeouts_by_class
                        .entry(result.candidate.algorithm_class.to_string())
                        .or_insert(0) += 1;
                }
                if let Some(mean) = result.mean_time() {
                    if fastest.map_or(true, |(_, best)| mean < best) {
                        fastest = Some((result, mean));
                    }
                }
            }
            if let Some((result, _)) = fastest {
                stage_fastest.insert(input.to_string(), result.candidate.name.clone());
            }
        }

        fastest_by_stage.insert(stage_name.clone(), stage_fastest);
    }

    let timeout_rate = if total_measurements > 0 {
        timeouts as f32 / total_measurements as f32
    } else {
        0.0
    };

    RunSummary {
        stages_completed: stage_order.to_vec(),
        total_input_values_tested: total_inputs,
        algorithm_classes_tested: classes.into_iter().collect(),
        timeout_statistics: TimeoutStatistics {
            total_measurements,
            timeouts_by_class,
            timeout_rate,
        },
        fastest_by_stage,
    }
}
