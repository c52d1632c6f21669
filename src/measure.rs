//! Adaptive measurement of one (candidate, input) pair
//!
//! Strategy, in order:
//!
//! 1. Warmup: one untimed invocation under the guard to prime caches. A
//!    warmup timeout or error ends the measurement with zero trials.
//! 2. Probe: one timed invocation. A probe slower than the early-skip
//!    threshold becomes the measurement's single sample, protecting the
//!    global budget from pathologically slow candidates.
//! 3. Trial count scales inversely with observed cost: probe > 1.0s runs 2
//!    trials, probe > 0.1s runs 3, otherwise the configured default.
//! 4. Scaled trials run under the guard, stopping early if the run's global
//!    budget is exhausted mid-loop. A timeout or error during the trials
//!    ends the measurement as timed-out/errored; partial samples are not
//!    reported as a completed measurement.
//!
//! Every failure is folded into the returned `MeasurementResult`; nothing
//! propagates to the stage or the run.

use tracing::{debug, warn};

use crate::candidate::Candidate;
use crate::config::StagedBenchmarkConfig;
use crate::scheduler::TimeBudget;
use crate::snapshot::{Answer, CompletedMeasurement, MeasurementOutcome, MeasurementResult};
use crate::stats;
use crate::timeout::{TimeoutGuard, TrialOutcome};

/// Runs warmup, probe, and scaled trials for one candidate/input pair
pub struct AdaptiveMeasurer<'a> {
    config: &'a StagedBenchmarkConfig,
}

impl<'a> AdaptiveMeasurer<'a> {
    pub fn new(config: &'a StagedBenchmarkConfig) -> Self {
        Self { config }
    }

    /// Measure one pair; never fails, never exceeds the pair's share of the
    /// budget by more than the single in-flight trial
    pub fn measure(
        &self,
        candidate: &Candidate,
        input: u64,
        budget: &TimeBudget,
    ) -> MeasurementResult {
        let mut guard = TimeoutGuard::new(self.config.timeout());
        let func = candidate.func;
        let name = candidate.descriptor.name.clone();

        // Warmup primes caches; the timing is discarded.
        match guard.run(move || func(input)) {
            TrialOutcome::TimedOut => {
                warn!("{name} timed out during warmup at n={input}");
                return self.finish(candidate, input, MeasurementOutcome::TimedOut);
            }
            TrialOutcome::Errored { message } => {
                warn!("{name} failed during warmup at n={input}: {message}");
                return self.finish(candidate, input, MeasurementOutcome::Errored { message });
            }
            TrialOutcome::Completed { .. } => {}
        }

        // Probe: a single timed run decides whether to continue at all.
        let (value, probe_secs) = match guard.run(move || func(input)) {
            TrialOutcome::Completed { value, elapsed } => (value, elapsed.as_secs_f32()),
            TrialOutcome::TimedOut => {
                warn!("{name} timed out during probe at n={input}");
                return self.finish(candidate, input, MeasurementOutcome::TimedOut);
            }
            TrialOutcome::Errored { message } => {
                warn!("{name} failed during probe at n={input}: {message}");
                return self.finish(candidate, input, MeasurementOutcome::Errored { message });
            }
        };
        let answer = self.answer(value);

        if probe_secs > self.config.early_skip_threshold {
            debug!(
                "{name} probe took {probe_secs:.3}s at n={input}, skipping further trials"
            );
            return self.completed(candidate, input, vec![probe_secs], answer);
        }

        let target_runs = target_runs(probe_secs, self.config.default_runs);
        let mut samples = Vec::with_capacity(target_runs as usize);
        for _ in 0..target_runs {
            if budget.exhausted() {
                debug!("global time budget exhausted mid-measurement for {name} at n={input}");
                break;
            }
            match guard.run(move || func(input)) {
                TrialOutcome::Completed { elapsed, .. } => samples.push(elapsed.as_secs_f32()),
                TrialOutcome::TimedOut => {
                    warn!("{name} timed out during trials at n={input}");
                    return self.finish(candidate, input, MeasurementOutcome::TimedOut);
                }
                TrialOutcome::Errored { message } => {
                    warn!("{name} failed during trials at n={input}: {message}");
                    return self.finish(
                        candidate,
                        input,
                        MeasurementOutcome::Errored { message },
                    );
                }
            }
        }

        // Budget ran out before any scaled trial; the probe already gave us
        // one valid sample.
        if samples.is_empty() {
            samples.push(probe_secs);
        }

        self.completed(candidate, input, samples, answer)
    }

    fn answer(&self, value: u128) -> Answer {
        if self.config.hide_answers {
            Answer::Hidden
        } else {
            Answer::Value(value.to_string())
        }
    }

    fn completed(
        &self,
        candidate: &Candidate,
        input: u64,
        samples: Vec<f32>,
        answer: Answer,
    ) -> MeasurementResult {
        let stats = stats::aggregate(&samples);
        let adaptive_runs = samples.len() as u32;
        self.finish(
            candidate,
            input,
            MeasurementOutcome::Completed(CompletedMeasurement {
                stats,
                execution_times: samples,
                adaptive_runs,
                relative_speed: None,
                answer,
            }),
        )
    }

    fn finish(
        &self,
        candidate: &Candidate,
        input: u64,
        outcome: MeasurementOutcome,
    ) -> MeasurementResult {
        MeasurementResult {
            candidate: candidate.descriptor.clone(),
            input_value: input,
            outcome,
        }
    }
}

/// Trial count scales inversely with the probe's observed cost
fn target_runs(probe_secs: f32, default_runs: u32) -> u32 {
    if probe_secs > 1.0 {
        2
    } else if probe_secs > 0.1 {
        3
    } else {
        default_runs
    }
}
