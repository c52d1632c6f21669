// Human-readable regression report rendering

use super::detector::RegressionAnalysis;

impl RegressionAnalysis {
    /// Generate the plain-text report consumed by CI logs and humans
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        report.push_str("PERFORMANCE REGRESSION ANALYSIS REPORT\n");
        report.push_str(&"=".repeat(50));
        report.push('\n');
        report.push_str(&format!("Generated: {}\n", self.analysis_timestamp));
        report.push_str(&format!("Baseline: {}\n", self.baseline_file));
        report.push_str(&format!("Current: {}\n\n", self.current_file));

        report.push_str("SUMMARY\n");
        report.push_str(&"-".repeat(20));
        report.push('\n');
        report.push_str(&format!("Total Comparisons: {}\n", self.total_comparisons));
        report.push_str(&format!("Regressions: {}\n", self.summary.total_regressions));
        report.push_str(&format!(
            "Improvements: {}\n",
            self.summary.total_improvements
        ));
        report.push_str(&format!("Unchanged: {}\n", self.unchanged));
        report.push_str(&format!(
            "Regression Rate: {:.1}%\n\n",
            self.summary.regression_rate * 100.0
        ));

        if !self.regressions.is_empty() {
            let breakdown = &self.summary.severity_breakdown;
            report.push_str("REGRESSIONS BY SEVERITY\n");
            report.push_str(&"-".repeat(30));
            report.push('\n');
            report.push_str(&format!("Critical: {}\n", breakdown.critical));
            report.push_str(&format!("Major: {}\n", breakdown.major));
            report.push_str(&format!("Minor: {}\n\n", breakdown.minor));

            report.push_str("DETAILED REGRESSIONS\n");
            report.push_str(&"-".repeat(25));
            report.push('\n');
            for alert in &self.regressions {
                report.push_str(&format!(
                    "Problem {} - {} (n={}): {:+.1}% ({})\n",
                    alert.problem_number,
                    alert.candidate_name,
                    alert.input_value,
                    alert.regression_percent,
                    alert.severity
                ));
                report.push_str(&format!(
                    "  {:.6}s -> {:.6}s\n",
                    alert.baseline_time, alert.current_time
                ));
            }
            report.push('\n');
        }

        if !self.improvements.is_empty() {
            report.push_str("PERFORMANCE IMPROVEMENTS\n");
            report.push_str(&"-".repeat(30));
            report.push('\n');
            for alert in &self.improvements {
                report.push_str(&format!(
                    "Problem {} - {} (n={}): {:+.1}%\n",
                    alert.problem_number,
                    alert.candidate_name,
                    alert.input_value,
                    alert.regression_percent
                ));
                report.push_str(&format!(
                    "  {:.6}s -> {:.6}s\n",
                    alert.baseline_time, alert.current_time
                ));
            }
        }

        if self.regressions.is_empty() && self.improvements.is_empty() {
            report.push_str("✅ No performance regressions detected\n");
        }

        report
    }
}
