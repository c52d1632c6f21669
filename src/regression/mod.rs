// Performance regression detection against historical baselines
//
// Compares a current run snapshot with a baseline snapshot, computes
// per-candidate percentage deltas, and classifies each into
// regression/improvement/unchanged with severity tiers. The severity
// boundaries (20/50/100%) and the 7-day baseline lookback are empirical
// policy values preserved as configuration defaults.
//
// Baseline auto-discovery selects the most recent snapshot within the
// lookback window; a missing or unreadable baseline means "no analysis
// possible", never a failed run.

mod detector;
mod report;

pub use detector::{
    ImpactStats, RegressionAlert, RegressionAnalysis, RegressionDetector, RegressionSummary,
    RegressionThresholds, Severity, SeverityBreakdown,
};

#[cfg(test)]
mod tests;
