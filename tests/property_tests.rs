//! Property-based tests for aggregation, ranking, and classification

use eulerbench::candidate::{AlgorithmClass, CandidateDescriptor};
use eulerbench::config::StagedBenchmarkConfig;
use eulerbench::regression::{RegressionDetector, Severity};
use eulerbench::snapshot::{
    Answer, CompletedMeasurement, MeasurementOutcome, MeasurementResult,
};
use eulerbench::stats;
use proptest::prelude::*;

fn completed(name: &str, mean: f32) -> MeasurementResult {
    MeasurementResult {
        candidate: CandidateDescriptor {
            name: name.to_string(),
            function_name: name.to_string(),
            algorithm_class: AlgorithmClass::Optimized,
            complexity_class: "O(n)".to_string(),
        },
        input_value: 1,
        outcome: MeasurementOutcome::Completed(CompletedMeasurement {
            stats: stats::aggregate(&[mean]),
            execution_times: vec![mean],
            adaptive_runs: 1,
            relative_speed: None,
            answer: Answer::Hidden,
        }),
    }
}

proptest! {
    #[test]
    fn prop_aggregate_orders_min_mean_max(
        samples in prop::collection::vec(1e-6f32..10.0, 1..50),
    ) {
        let stats = stats::aggregate(&samples);
        prop_assert!(stats.min_time <= stats.mean_time + 1e-4);
        prop_assert!(stats.mean_time <= stats.max_time + 1e-4);
        prop_assert!(stats.min_time <= stats.median_time + 1e-4);
        prop_assert!(stats.median_time <= stats.max_time + 1e-4);
        prop_assert!(stats.std_deviation >= 0.0);
    }
}

proptest! {
    #[test]
    fn prop_single_sample_has_zero_deviation(sample in 1e-6f32..10.0) {
        let stats = stats::aggregate(&[sample]);
        prop_assert_eq!(stats.std_deviation, 0.0);
        prop_assert_eq!(stats.mean_time, sample);
        prop_assert_eq!(stats.min_time, sample);
        prop_assert_eq!(stats.max_time, sample);
    }
}

proptest! {
    #[test]
    fn prop_ranking_always_yields_one_unit_speed(
        means in prop::collection::vec(1e-6f32..10.0, 1..10),
    ) {
        let mut group: Vec<MeasurementResult> = means
            .iter()
            .enumerate()
            .map(|(i, &mean)| completed(&format!("candidate_{i}"), mean))
            .collect();
        stats::rank_relative_speeds(&mut group);

        let speeds: Vec<f32> = group.iter().filter_map(|r| r.relative_speed()).collect();
        prop_assert_eq!(speeds.len(), group.len());
        prop_assert!(speeds.iter().any(|&s| s == 1.0));
        prop_assert!(speeds.iter().all(|&s| s >= 1.0 && s.is_finite()));
    }
}

proptest! {
    #[test]
    fn prop_ranking_ignores_invalid_results(
        means in prop::collection::vec(1e-6f32..10.0, 1..5),
    ) {
        let mut group: Vec<MeasurementResult> = means
            .iter()
            .enumerate()
            .map(|(i, &mean)| completed(&format!("candidate_{i}"), mean))
            .collect();
        group.push(MeasurementResult {
            candidate: CandidateDescriptor {
                name: "stuck".to_string(),
                function_name: "stuck".to_string(),
                algorithm_class: AlgorithmClass::Naive,
                complexity_class: "O(n!)".to_string(),
            },
            input_value: 1,
            outcome: MeasurementOutcome::TimedOut,
        });
        stats::rank_relative_speeds(&mut group);

        let last = group.last().unwrap();
        prop_assert!(last.relative_speed().is_none());
        prop_assert!(group
            .iter()
            .filter(|r| r.is_valid())
            .all(|r| r.relative_speed().is_some()));
    }
}

proptest! {
    #[test]
    fn prop_classification_is_monotone(change in -0.99f32..5.0) {
        let detector = RegressionDetector::with_defaults();
        match detector.classify(change) {
            Some(Severity::Critical) => prop_assert!(change > 1.0),
            Some(Severity::Major) => prop_assert!(change > 0.5 && change <= 1.0),
            Some(Severity::Minor) => prop_assert!(change > 0.20 && change <= 0.5),
            Some(Severity::Improvement) => prop_assert!(change < -0.20),
            None => prop_assert!(change >= -0.20 && change <= 0.20),
        }
    }
}

proptest! {
    #[test]
    fn prop_config_validation_never_panics(
        timeout in -10.0f32..100.0,
        budget in -10.0f32..100.0,
        runs in 0u32..20,
        naive_cutoff in 0u64..200,
        efficient_cutoff in 0u64..200,
    ) {
        let config = StagedBenchmarkConfig {
            timeout_seconds: timeout,
            max_total_time_minutes: budget,
            default_runs: runs,
            naive_skip_cutoff: naive_cutoff,
            efficient_skip_cutoff: efficient_cutoff,
            ..Default::default()
        };
        let _ = config.validate();
    }
}
