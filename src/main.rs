use anyhow::{bail, Result};
use clap::Parser;
use eulerbench::cli::{Cli, Command};
use eulerbench::config::StagedBenchmarkConfig;
use eulerbench::regression::{RegressionDetector, RegressionThresholds};
use eulerbench::scheduler::StagedScheduler;
use eulerbench::{problems, snapshot};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("eulerbench: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Run {
            problem,
            out_dir,
            config,
            timeout_seconds,
            max_total_time_minutes,
            hide_answers,
        } => run_benchmark(
            &problem,
            out_dir,
            config,
            timeout_seconds,
            max_total_time_minutes,
            hide_answers,
        ),
        Command::Compare {
            current,
            baseline,
            snapshot_dir,
            lookback_days,
            regression_threshold,
            improvement_threshold,
            analysis_out,
            report_out,
        } => compare_snapshots(
            current,
            baseline,
            snapshot_dir,
            RegressionThresholds {
                regression_threshold,
                improvement_threshold,
                lookback_days,
            },
            analysis_out,
            report_out,
        ),
    }
}

fn run_benchmark(
    problem: &str,
    out_dir: PathBuf,
    config_path: Option<PathBuf>,
    timeout_seconds: Option<f32>,
    max_total_time_minutes: Option<f32>,
    hide_answers: bool,
) -> Result<i32> {
    let mut config = match config_path {
        Some(path) => StagedBenchmarkConfig::from_json_file(&path)?,
        None => StagedBenchmarkConfig::default(),
    };
    if let Some(secs) = timeout_seconds {
        config.timeout_seconds = secs;
    }
    if let Some(mins) = max_total_time_minutes {
        config.max_total_time_minutes = mins;
    }
    if hide_answers {
        config.hide_answers = true;
    }

    let Some((number, title, candidates)) = problems::candidates_for(problem) else {
        bail!(
            "unknown problem {problem:?}; available: {}",
            problems::available().join(", ")
        );
    };

    let scheduler = StagedScheduler::new(config)?;
    let result = scheduler.run(number, title, &candidates);

    let path = out_dir.join(snapshot::snapshot_filename(&result.timestamp));
    snapshot::save(&path, &result)?;

    println!("Benchmark complete: problem {number} ({title})");
    println!(
        "Stages completed: {}",
        result.summary.stages_completed.join(", ")
    );
    println!("Total benchmark time: {:.2}s", result.total_benchmark_time);
    println!("Snapshot saved to {}", path.display());
    Ok(0)
}

fn compare_snapshots(
    current: PathBuf,
    baseline: Option<PathBuf>,
    snapshot_dir: PathBuf,
    thresholds: RegressionThresholds,
    analysis_out: Option<PathBuf>,
    report_out: Option<PathBuf>,
) -> Result<i32> {
    let detector = RegressionDetector::new(thresholds)?;
    let analysis = detector.compare_to_baseline(&current, baseline.as_deref(), &snapshot_dir)?;

    let Some(analysis) = analysis else {
        println!("Regression analysis not possible: no usable baseline snapshot");
        return Ok(0);
    };

    if let Some(path) = analysis_out {
        analysis.save(&path)?;
        println!("Analysis saved to {}", path.display());
    }

    let report = analysis.to_report_string();
    print!("{report}");
    if let Some(path) = report_out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &report)?;
        println!("Report saved to {}", path.display());
    }

    Ok(analysis.exit_code())
}
