//! Threshold checking across requested paths
//!
//! Each path is resolved, reported and compared against the threshold.
//! Failures never abort the run; they are summed into the exit code.

use std::path::PathBuf;

use crate::coverage::{CoverageNode, Metric, MetricSet};
use crate::resolve::{resolve, PathMatch};

/// Minimum percentage, clamped to [0, 100]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Threshold(0.0);
        }
        Threshold(value.clamp(0.0, 100.0))
    }

    /// Parse user input leniently: the leading numeric part counts, anything
    /// else reads as 0. Decimal exponents are accepted (`1e2` is 100).
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let bytes = input.as_bytes();
        let digits_from = |start: usize| {
            start
                + bytes[start..]
                    .iter()
                    .take_while(|b| b.is_ascii_digit())
                    .count()
        };

        let mut end = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
        end = digits_from(end);
        if bytes.get(end) == Some(&b'.') {
            end = digits_from(end + 1);
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'-' | b'+')) {
                exp += 1;
            }
            let exp_end = digits_from(exp);
            // A dangling exponent marker is not part of the number ("5e")
            if exp_end > exp {
                end = exp_end;
            }
        }

        let value = input[..end].parse::<f64>().unwrap_or(0.0);
        Threshold::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Running line totals over all resolved paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub total_executable_lines: u64,
    pub total_covered_lines: u64,
}

impl RunTotals {
    pub fn add(&mut self, node: &CoverageNode) {
        self.total_executable_lines += u64::from(node.executable_lines());
        self.total_covered_lines += u64::from(node.executed_lines());
    }

    /// Aggregate line coverage; no executable lines reads as 100%
    pub fn percentage(&self) -> f64 {
        if self.total_executable_lines == 0 {
            return 100.0;
        }
        self.total_covered_lines as f64 / self.total_executable_lines as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    Passed,
    BelowThreshold,
    NotFound,
    UnsupportedMetric,
}

/// Verdict for one requested path
#[derive(Debug, Clone, PartialEq)]
pub struct PathCheckResult {
    pub path: String,
    pub metric: String,
    /// Measured percentage of the requested metric, when it could be computed
    pub percentage: Option<f64>,
    pub threshold: f64,
    pub outcome: PathOutcome,
}

impl PathCheckResult {
    pub fn passed(&self) -> bool {
        self.outcome == PathOutcome::Passed
    }

    /// Contribution to the exit code
    pub fn failures(&self) -> u32 {
        u32::from(!self.passed())
    }
}

/// Receives everything the checker wants shown to the user
pub trait Reporter {
    fn path_report(&mut self, node: &CoverageNode, metrics: &MetricSet);
    fn path_not_found(&mut self, path: &str);
    fn unsupported_metric(&mut self, metric: &str);
    fn threshold_result(&mut self, result: &PathCheckResult);
    fn summary(&mut self, totals: &RunTotals);
}

#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Metric name as given by the user; validated per path
    pub metric: String,
    pub threshold: Threshold,
    pub working_dir: PathBuf,
    pub match_mode: PathMatch,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default)]
pub struct CheckSummary {
    pub results: Vec<PathCheckResult>,
    pub totals: RunTotals,
}

impl CheckSummary {
    /// Number of failing paths
    pub fn failures(&self) -> u32 {
        self.results.iter().map(PathCheckResult::failures).sum()
    }

    /// Process exit code: the failure count, saturated to fit an i32.
    ///
    /// Unix truncates exit statuses to 8 bits, so callers checking 256 or more
    /// paths must not rely on the status alone.
    pub fn exit_code(&self) -> i32 {
        i32::try_from(self.failures()).unwrap_or(i32::MAX)
    }
}

/// Check every path in order, then report the aggregate line
pub fn check_paths(
    root: &CoverageNode,
    paths: &[String],
    options: &CheckOptions,
    reporter: &mut dyn Reporter,
) -> CheckSummary {
    let mut summary = CheckSummary::default();

    for path in paths {
        let result = check_path(root, path, options, &mut summary.totals, reporter);
        tracing::debug!("{}: {:?}", path, result.outcome);
        summary.results.push(result);
    }

    reporter.summary(&summary.totals);
    summary
}

/// Check a single path, adding its line counts to `totals` when it resolves
pub fn check_path(
    root: &CoverageNode,
    path: &str,
    options: &CheckOptions,
    totals: &mut RunTotals,
    reporter: &mut dyn Reporter,
) -> PathCheckResult {
    let mut result = PathCheckResult {
        path: path.to_string(),
        metric: options.metric.clone(),
        percentage: None,
        threshold: options.threshold.value(),
        outcome: PathOutcome::NotFound,
    };

    let Some(node) = resolve(root, path, &options.working_dir, options.match_mode) else {
        reporter.path_not_found(path);
        return result;
    };

    let metrics = MetricSet::of(node);
    reporter.path_report(node, &metrics);
    totals.add(node);

    let metric = match options.metric.parse::<Metric>() {
        Ok(metric) => metric,
        Err(_) => {
            reporter.unsupported_metric(&options.metric);
            result.outcome = PathOutcome::UnsupportedMetric;
            return result;
        }
    };

    let percentage = metric.extract(node).percentage;
    result.percentage = Some(percentage);
    result.outcome = if percentage < options.threshold.value() {
        PathOutcome::BelowThreshold
    } else {
        PathOutcome::Passed
    };

    reporter.threshold_result(&result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{build_tree, CoverageStats, FileStats};
    use std::path::Path;

    /// Reporter that records what would have been shown
    #[derive(Default)]
    struct Recording {
        reports: Vec<String>,
        not_found: Vec<String>,
        unsupported: Vec<String>,
        verdicts: Vec<PathCheckResult>,
        summary: Option<RunTotals>,
    }

    impl Reporter for Recording {
        fn path_report(&mut self, node: &CoverageNode, _metrics: &MetricSet) {
            self.reports.push(node.path().to_string());
        }

        fn path_not_found(&mut self, path: &str) {
            self.not_found.push(path.to_string());
        }

        fn unsupported_metric(&mut self, metric: &str) {
            self.unsupported.push(metric.to_string());
        }

        fn threshold_result(&mut self, result: &PathCheckResult) {
            self.verdicts.push(result.clone());
        }

        fn summary(&mut self, totals: &RunTotals) {
            self.summary = Some(*totals);
        }
    }

    fn file(path: &str, executable: u32, executed: u32) -> FileStats {
        FileStats {
            path: path.to_string(),
            stats: CoverageStats {
                executable_lines: executable,
                executed_lines: executed,
                methods: 4,
                tested_methods: 3,
                classes: 1,
                tested_classes: 0,
            },
        }
    }

    fn src_only() -> CoverageNode {
        build_tree(vec![file("/proj/src/a.php", 100, 80)], Path::new("/proj"))
    }

    fn options(metric: &str, threshold: f64) -> CheckOptions {
        CheckOptions {
            metric: metric.to_string(),
            threshold: Threshold::new(threshold),
            working_dir: PathBuf::from("/proj"),
            match_mode: PathMatch::Prefix,
        }
    }

    fn paths(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_threshold_clamped() {
        assert_eq!(Threshold::new(-10.0).value(), 0.0);
        assert_eq!(Threshold::new(150.0).value(), 100.0);
        assert_eq!(Threshold::new(f64::NAN).value(), 0.0);
        assert_eq!(Threshold::new(42.5).value(), 42.5);
    }

    #[test]
    fn test_threshold_parse_lenient() {
        assert_eq!(Threshold::parse("75").value(), 75.0);
        assert_eq!(Threshold::parse("-10").value(), 0.0);
        assert_eq!(Threshold::parse("150").value(), 100.0);
        assert_eq!(Threshold::parse("80.5%").value(), 80.5);
        assert_eq!(Threshold::parse("1.2.3").value(), 1.2);
        assert_eq!(Threshold::parse("abc").value(), 0.0);
        assert_eq!(Threshold::parse("").value(), 0.0);
    }

    #[test]
    fn test_threshold_parse_exponent() {
        assert_eq!(Threshold::parse("1e2").value(), 100.0);
        assert_eq!(Threshold::parse("2.5E1").value(), 25.0);
        assert_eq!(Threshold::parse("5e-1").value(), 0.5);
        assert_eq!(Threshold::parse("5e").value(), 5.0);
        assert_eq!(Threshold::parse("7e+").value(), 7.0);
        assert_eq!(Threshold::parse("1e3").value(), 100.0);
    }

    #[test]
    fn test_path_above_threshold_passes() {
        let root = src_only();
        let mut reporter = Recording::default();

        let summary = check_paths(&root, &paths(&["src"]), &options("line", 75.0), &mut reporter);

        assert_eq!(summary.exit_code(), 0);
        assert!(summary.results[0].passed());
        assert_eq!(summary.results[0].percentage, Some(80.0));
        assert_eq!(reporter.reports, vec!["/proj/src"]);
        assert_eq!(reporter.verdicts.len(), 1);
    }

    #[test]
    fn test_path_below_threshold_fails() {
        let root = src_only();
        let mut reporter = Recording::default();

        let summary = check_paths(&root, &paths(&["src"]), &options("line", 85.0), &mut reporter);

        assert_eq!(summary.exit_code(), 1);
        assert_eq!(summary.results[0].outcome, PathOutcome::BelowThreshold);
        let totals = reporter.summary.unwrap();
        assert_eq!(totals.total_covered_lines, 80);
        assert_eq!(totals.total_executable_lines, 100);
    }

    #[test]
    fn test_equal_to_threshold_passes() {
        let root = src_only();
        let mut reporter = Recording::default();

        let summary = check_paths(&root, &paths(&["src"]), &options("line", 80.0), &mut reporter);
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_missing_path_does_not_touch_totals() {
        let root = src_only();
        let mut reporter = Recording::default();

        let summary = check_paths(
            &root,
            &paths(&["missing-dir"]),
            &options("line", 0.0),
            &mut reporter,
        );

        assert_eq!(summary.exit_code(), 1);
        assert_eq!(summary.results[0].outcome, PathOutcome::NotFound);
        assert_eq!(reporter.not_found, vec!["missing-dir"]);
        assert!(reporter.reports.is_empty());
        assert_eq!(summary.totals, RunTotals::default());
    }

    #[test]
    fn test_unsupported_metric_fails_per_path() {
        let root = src_only();
        let mut reporter = Recording::default();

        let summary = check_paths(&root, &paths(&["src"]), &options("function", 0.0), &mut reporter);

        assert_eq!(summary.exit_code(), 1);
        assert_eq!(summary.results[0].outcome, PathOutcome::UnsupportedMetric);
        assert_eq!(reporter.unsupported, vec!["function"]);
        // The table is still shown and line totals still count
        assert_eq!(reporter.reports.len(), 1);
        assert_eq!(summary.totals.total_executable_lines, 100);
    }

    #[test]
    fn test_exit_code_counts_failing_paths() {
        let root = build_tree(
            vec![
                file("/proj/src/a.php", 100, 90),
                file("/proj/lib/b.php", 100, 10),
            ],
            Path::new("/proj"),
        );
        let mut reporter = Recording::default();

        let summary = check_paths(
            &root,
            &paths(&["src", "lib", "missing"]),
            &options("line", 50.0),
            &mut reporter,
        );

        assert_eq!(summary.failures(), 2);
        assert_eq!(summary.exit_code(), 2);
        assert_eq!(summary.totals.total_executable_lines, 200);
        assert_eq!(summary.totals.total_covered_lines, 100);
    }

    #[test]
    fn test_method_metric_uses_method_counts() {
        let root = src_only();
        let mut reporter = Recording::default();

        // 3 of 4 methods tested: 75%
        let summary = check_paths(&root, &paths(&["src"]), &options("method", 76.0), &mut reporter);
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(summary.results[0].percentage, Some(75.0));
    }

    #[test]
    fn test_totals_without_executable_lines_read_full() {
        let totals = RunTotals::default();
        assert_eq!(totals.percentage(), 100.0);

        let root = build_tree(vec![file("/proj/src/a.php", 0, 0)], Path::new("/proj"));
        let mut reporter = Recording::default();
        let summary = check_paths(&root, &paths(&["src"]), &options("line", 100.0), &mut reporter);
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(summary.totals.percentage(), 100.0);
    }

    #[test]
    fn test_no_paths_still_reports_summary() {
        let root = src_only();
        let mut reporter = Recording::default();

        let summary = check_paths(&root, &[], &options("line", 50.0), &mut reporter);
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(reporter.summary, Some(RunTotals::default()));
    }
}
