//! CLI argument parsing for eulerbench

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "eulerbench")]
#[command(version)]
#[command(about = "Adaptive staged benchmarking with regression detection", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the staged benchmark for one problem and persist a snapshot
    Run {
        /// Problem number (e.g. 5 or 005)
        #[arg(value_name = "PROBLEM")]
        problem: String,

        /// Directory where run snapshots are stored
        #[arg(long = "out-dir", value_name = "DIR", default_value = "benchmarks/historical")]
        out_dir: PathBuf,

        /// Benchmark configuration file (JSON); defaults apply when omitted
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Override the per-trial timeout in seconds
        #[arg(long = "timeout-seconds", value_name = "SECS")]
        timeout_seconds: Option<f32>,

        /// Override the global time budget in minutes
        #[arg(long = "max-total-time-minutes", value_name = "MINS")]
        max_total_time_minutes: Option<f32>,

        /// Withhold candidate answers from the stored snapshot
        #[arg(long = "hide-answers")]
        hide_answers: bool,
    },

    /// Compare a run snapshot against a baseline and report regressions
    Compare {
        /// Snapshot to analyze
        #[arg(long, value_name = "FILE")]
        current: PathBuf,

        /// Baseline snapshot; auto-discovered from the snapshot directory
        /// when omitted
        #[arg(long, value_name = "FILE")]
        baseline: Option<PathBuf>,

        /// Directory searched for a baseline snapshot
        #[arg(
            long = "snapshot-dir",
            value_name = "DIR",
            default_value = "benchmarks/historical"
        )]
        snapshot_dir: PathBuf,

        /// Baseline auto-discovery window in days
        #[arg(long = "lookback-days", value_name = "DAYS", default_value = "7")]
        lookback_days: i64,

        /// Slowdown fraction above which a comparison is a regression
        #[arg(long = "regression-threshold", value_name = "FRAC", default_value = "0.20")]
        regression_threshold: f32,

        /// Speedup fraction above which a comparison is an improvement
        #[arg(long = "improvement-threshold", value_name = "FRAC", default_value = "0.20")]
        improvement_threshold: f32,

        /// Write the analysis as JSON to this path
        #[arg(long = "analysis-out", value_name = "FILE")]
        analysis_out: Option<PathBuf>,

        /// Write the plain-text report to this path
        #[arg(long = "report-out", value_name = "FILE")]
        report_out: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::parse_from(["eulerbench", "run", "005"]);
        match cli.command {
            Command::Run {
                problem,
                out_dir,
                config,
                timeout_seconds,
                hide_answers,
                ..
            } => {
                assert_eq!(problem, "005");
                assert_eq!(out_dir, PathBuf::from("benchmarks/historical"));
                assert!(config.is_none());
                assert!(timeout_seconds.is_none());
                assert!(!hide_answers);
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::parse_from([
            "eulerbench",
            "run",
            "5",
            "--timeout-seconds",
            "2.5",
            "--max-total-time-minutes",
            "1.0",
            "--hide-answers",
        ]);
        match cli.command {
            Command::Run {
                timeout_seconds,
                max_total_time_minutes,
                hide_answers,
                ..
            } => {
                assert_eq!(timeout_seconds, Some(2.5));
                assert_eq!(max_total_time_minutes, Some(1.0));
                assert!(hide_answers);
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn test_compare_defaults() {
        let cli = Cli::parse_from(["eulerbench", "compare", "--current", "snap.json"]);
        match cli.command {
            Command::Compare {
                current,
                baseline,
                lookback_days,
                regression_threshold,
                improvement_threshold,
                ..
            } => {
                assert_eq!(current, PathBuf::from("snap.json"));
                assert!(baseline.is_none());
                assert_eq!(lookback_days, 7);
                assert_eq!(regression_threshold, 0.20);
                assert_eq!(improvement_threshold, 0.20);
            }
            other => panic!("expected Compare, got {other:?}"),
        }
    }

    #[test]
    fn test_global_debug_flag() {
        let cli = Cli::parse_from(["eulerbench", "--debug", "run", "001"]);
        assert!(cli.debug);
    }
}
