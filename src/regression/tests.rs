use super::*;
use crate::candidate::{AlgorithmClass, CandidateDescriptor};
use crate::config::StagedBenchmarkConfig;
use crate::snapshot::{
    Answer, CompletedMeasurement, MeasurementOutcome, MeasurementResult, RunSnapshot, RunSummary,
    StageResult,
};
use crate::stats::TimingStats;
use chrono::Local;
use std::collections::BTreeMap;

fn completed_result(name: &str, input: u64, mean: f32) -> MeasurementResult {
    MeasurementResult {
        candidate: CandidateDescriptor {
            name: name.to_string(),
            function_name: format!("solve_{}", name.to_lowercase()),
            algorithm_class: AlgorithmClass::Optimized,
            complexity_class: "O(n)".to_string(),
        },
        input_value: input,
        outcome: MeasurementOutcome::Completed(CompletedMeasurement {
            stats: TimingStats {
                mean_time: mean,
                median_time: mean,
                std_deviation: 0.0,
                min_time: mean,
                max_time: mean,
            },
            execution_times: vec![mean],
            adaptive_runs: 1,
            relative_speed: None,
            answer: Answer::Value("42".to_string()),
        }),
    }
}

fn timed_out_result(name: &str, input: u64) -> MeasurementResult {
    MeasurementResult {
        candidate: CandidateDescriptor {
            name: name.to_string(),
            function_name: format!("solve_{}", name.to_lowercase()),
            algorithm_class: AlgorithmClass::Naive,
            complexity_class: "O(n!)".to_string(),
        },
        input_value: input,
        outcome: MeasurementOutcome::TimedOut,
    }
}

/// Snapshot with one stage holding the given results, keyed by input value
fn snapshot_with(results: Vec<MeasurementResult>) -> RunSnapshot {
    let mut stage: StageResult = BTreeMap::new();
    for result in results {
        stage.entry(result.input_value).or_default().push(result);
    }
    let mut stages = BTreeMap::new();
    stages.insert("basic".to_string(), stage);
    RunSnapshot {
        problem_number: "005".to_string(),
        problem_title: "Smallest multiple".to_string(),
        timestamp: Local::now(),
        benchmark_config: StagedBenchmarkConfig::default(),
        stages,
        summary: RunSummary::default(),
        total_benchmark_time: 0.5,
    }
}

fn analyze_pair(current: Vec<MeasurementResult>, baseline: Vec<MeasurementResult>) -> RegressionAnalysis {
    RegressionDetector::with_defaults().analyze(
        &snapshot_with(current),
        &snapshot_with(baseline),
        "current.json",
        "baseline.json",
    )
}

#[test]
fn test_classify_boundaries() {
    let detector = RegressionDetector::with_defaults();
    assert_eq!(detector.classify(0.19), None);
    assert_eq!(detector.classify(0.20), None);
    assert_eq!(detector.classify(0.21), Some(Severity::Minor));
    assert_eq!(detector.classify(0.51), Some(Severity::Major));
    assert_eq!(detector.classify(1.01), Some(Severity::Critical));
    assert_eq!(detector.classify(-0.19), None);
    assert_eq!(detector.classify(-0.21), Some(Severity::Improvement));
}

#[test]
fn test_analyze_unchanged_within_threshold() {
    // 19% slower stays within the 20% threshold.
    let analysis = analyze_pair(
        vec![completed_result("Optimized", 20, 0.119)],
        vec![completed_result("Optimized", 20, 0.100)],
    );
    assert_eq!(analysis.total_comparisons, 1);
    assert!(analysis.regressions.is_empty());
    assert!(analysis.improvements.is_empty());
    assert_eq!(analysis.unchanged, 1);
    assert_eq!(analysis.exit_code(), 0);
}

#[test]
fn test_analyze_minor_regression() {
    let analysis = analyze_pair(
        vec![completed_result("Optimized", 20, 0.121)],
        vec![completed_result("Optimized", 20, 0.100)],
    );
    assert_eq!(analysis.regressions.len(), 1);
    assert_eq!(analysis.regressions[0].severity, Severity::Minor);
    assert_eq!(analysis.exit_code(), 1);
}

#[test]
fn test_analyze_major_regression() {
    let analysis = analyze_pair(
        vec![completed_result("Optimized", 20, 0.151)],
        vec![completed_result("Optimized", 20, 0.100)],
    );
    assert_eq!(analysis.regressions[0].severity, Severity::Major);
    assert_eq!(analysis.exit_code(), 1);
}

#[test]
fn test_analyze_critical_regression() {
    let analysis = analyze_pair(
        vec![completed_result("Optimized", 20, 0.201)],
        vec![completed_result("Optimized", 20, 0.100)],
    );
    assert_eq!(analysis.regressions[0].severity, Severity::Critical);
    assert!(analysis.has_critical());
    assert_eq!(analysis.exit_code(), 2);
}

#[test]
fn test_analyze_improvement() {
    let analysis = analyze_pair(
        vec![completed_result("Optimized", 20, 0.070)],
        vec![completed_result("Optimized", 20, 0.100)],
    );
    assert!(analysis.regressions.is_empty());
    assert_eq!(analysis.improvements.len(), 1);
    assert_eq!(analysis.improvements[0].severity, Severity::Improvement);
    assert!(analysis.improvements[0].regression_percent < 0.0);
    assert_eq!(analysis.exit_code(), 0);
}

#[test]
fn test_zero_baseline_is_skipped() {
    let analysis = analyze_pair(
        vec![completed_result("Optimized", 20, 0.5)],
        vec![completed_result("Optimized", 20, 0.0)],
    );
    assert_eq!(analysis.total_comparisons, 0);
}

#[test]
fn test_timed_out_results_are_not_compared() {
    let analysis = analyze_pair(
        vec![timed_out_result("Naive", 50)],
        vec![completed_result("Naive", 50, 0.1)],
    );
    assert_eq!(analysis.total_comparisons, 0);
}

#[test]
fn test_keys_missing_from_baseline_are_ignored() {
    let analysis = analyze_pair(
        vec![
            completed_result("Optimized", 20, 0.1),
            completed_result("Mathematical", 20, 0.1),
        ],
        vec![completed_result("Optimized", 20, 0.1)],
    );
    assert_eq!(analysis.total_comparisons, 1);
    assert_eq!(analysis.unchanged, 1);
}

#[test]
fn test_regressions_sorted_worst_first() {
    let analysis = analyze_pair(
        vec![
            completed_result("Optimized", 10, 0.13),
            completed_result("Optimized", 20, 0.25),
            completed_result("Optimized", 50, 0.16),
        ],
        vec![
            completed_result("Optimized", 10, 0.10),
            completed_result("Optimized", 20, 0.10),
            completed_result("Optimized", 50, 0.10),
        ],
    );
    assert_eq!(analysis.regressions.len(), 3);
    let percents: Vec<f32> = analysis
        .regressions
        .iter()
        .map(|r| r.regression_percent)
        .collect();
    assert!(percents[0] > percents[1]);
    assert!(percents[1] > percents[2]);
    assert_eq!(analysis.regressions[0].input_value, 20);
}

#[test]
fn test_summary_breakdown_and_rates() {
    let analysis = analyze_pair(
        vec![
            completed_result("Optimized", 10, 0.30), // critical
            completed_result("Optimized", 20, 0.16), // major
            completed_result("Optimized", 50, 0.10), // unchanged
            completed_result("Optimized", 100, 0.05), // improvement
        ],
        vec![
            completed_result("Optimized", 10, 0.10),
            completed_result("Optimized", 20, 0.10),
            completed_result("Optimized", 50, 0.10),
            completed_result("Optimized", 100, 0.10),
        ],
    );
    let summary = &analysis.summary;
    assert_eq!(summary.total_regressions, 2);
    assert_eq!(summary.total_improvements, 1);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.severity_breakdown.critical, 1);
    assert_eq!(summary.severity_breakdown.major, 1);
    assert_eq!(summary.severity_breakdown.minor, 0);
    assert!((summary.regression_rate - 0.5).abs() < 1e-6);
    assert!((summary.improvement_rate - 0.25).abs() < 1e-6);
    assert!(summary.regression_stats.is_some());
    assert!(summary.improvement_stats.is_some());
}

#[test]
fn test_impact_stats_absent_without_alerts() {
    let analysis = analyze_pair(
        vec![completed_result("Optimized", 20, 0.1)],
        vec![completed_result("Optimized", 20, 0.1)],
    );
    assert!(analysis.summary.regression_stats.is_none());
    assert!(analysis.summary.improvement_stats.is_none());
}

#[test]
fn test_invalid_thresholds_rejected() {
    let bad = RegressionThresholds {
        regression_threshold: 0.0,
        ..Default::default()
    };
    assert!(RegressionDetector::new(bad).is_err());
    let bad = RegressionThresholds {
        lookback_days: 0,
        ..Default::default()
    };
    assert!(RegressionDetector::new(bad).is_err());
}

#[test]
fn test_compare_to_baseline_auto_discovery() {
    let dir = tempfile::tempdir().unwrap();
    let baseline = snapshot_with(vec![completed_result("Optimized", 20, 0.100)]);
    let baseline_path = dir
        .path()
        .join(crate::snapshot::snapshot_filename(&baseline.timestamp));
    crate::snapshot::save(&baseline_path, &baseline).unwrap();

    let current = snapshot_with(vec![completed_result("Optimized", 20, 0.250)]);
    let current_path = dir.path().join("current.json");
    crate::snapshot::save(&current_path, &current).unwrap();

    let detector = RegressionDetector::with_defaults();
    let analysis = detector
        .compare_to_baseline(&current_path, None, dir.path())
        .unwrap()
        .expect("baseline should be discovered");
    assert_eq!(analysis.regressions.len(), 1);
    assert_eq!(analysis.regressions[0].severity, Severity::Critical);
}

#[test]
fn test_compare_to_baseline_none_when_empty() {
    let dir = tempfile::tempdir().unwrap();
    let current = snapshot_with(vec![completed_result("Optimized", 20, 0.1)]);
    let current_path = dir.path().join("current.json");
    crate::snapshot::save(&current_path, &current).unwrap();

    let empty = tempfile::tempdir().unwrap();
    let detector = RegressionDetector::with_defaults();
    let analysis = detector
        .compare_to_baseline(&current_path, None, empty.path())
        .unwrap();
    assert!(analysis.is_none());
}

#[test]
fn test_compare_to_baseline_none_when_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let baseline_path = dir.path().join("baseline.json");
    std::fs::write(&baseline_path, "not json").unwrap();
    let current_path = dir.path().join("current.json");
    let current = snapshot_with(vec![completed_result("Optimized", 20, 0.1)]);
    crate::snapshot::save(&current_path, &current).unwrap();

    let detector = RegressionDetector::with_defaults();
    let analysis = detector
        .compare_to_baseline(&current_path, Some(&baseline_path), dir.path())
        .unwrap();
    assert!(analysis.is_none());
}

#[test]
fn test_analysis_save_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let analysis = analyze_pair(
        vec![completed_result("Optimized", 20, 0.201)],
        vec![completed_result("Optimized", 20, 0.100)],
    );
    let path = dir.path().join("reports").join("analysis.json");
    analysis.save(&path).unwrap();
    let back: RegressionAnalysis =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, analysis);
}

#[test]
fn test_report_lists_regressions_and_improvements() {
    let analysis = analyze_pair(
        vec![
            completed_result("Optimized", 10, 0.30),
            completed_result("Mathematical", 20, 0.05),
        ],
        vec![
            completed_result("Optimized", 10, 0.10),
            completed_result("Mathematical", 20, 0.10),
        ],
    );
    let report = analysis.to_report_string();
    assert!(report.contains("PERFORMANCE REGRESSION ANALYSIS REPORT"));
    assert!(report.contains("DETAILED REGRESSIONS"));
    assert!(report.contains("Optimized"));
    assert!(report.contains("critical"));
    assert!(report.contains("PERFORMANCE IMPROVEMENTS"));
    assert!(report.contains("Mathematical"));
}

#[test]
fn test_report_clean_run_message() {
    let analysis = analyze_pair(
        vec![completed_result("Optimized", 20, 0.1)],
        vec![completed_result("Optimized", 20, 0.1)],
    );
    let report = analysis.to_report_string();
    assert!(report.contains("No performance regressions detected"));
}
