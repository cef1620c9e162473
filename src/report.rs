//! Console report output
//!
//! Per-path coverage tables, status blocks and the final aggregate line.

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::check::{PathCheckResult, PathOutcome, Reporter, RunTotals};
use crate::coverage::{CoverageNode, MetricResult, MetricSet};

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Coverage Metric")]
    metric: String,
    #[tabled(rename = "Relative Coverage")]
    relative: String,
    #[tabled(rename = "Absolute Coverage")]
    absolute: String,
}

impl From<&MetricResult> for MetricRow {
    fn from(result: &MetricResult) -> Self {
        Self {
            metric: format!("{:<20}", result.metric.label()),
            relative: format!("{:.2}%", result.percentage),
            absolute: format!("{}/{}", result.covered, result.total),
        }
    }
}

/// Render the three-metric table with right-aligned numeric columns
pub fn render_table(metrics: &MetricSet) -> String {
    let rows: Vec<MetricRow> = metrics.iter().map(MetricRow::from).collect();

    let mut table = Table::new(rows);
    table
        .with(Style::ascii())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    table.to_string()
}

/// Title line naming the resolved node, underlined
pub fn render_title(path: &str) -> String {
    let title = format!("Code coverage report for directory \"{}\"", path);
    let underline = "=".repeat(title.chars().count());
    format!("{}\n{}", title, underline)
}

pub fn threshold_message(result: &PathCheckResult) -> String {
    let relation = match result.outcome {
        PathOutcome::Passed => "above",
        _ => "below",
    };
    format!(
        "Code Coverage for metric \"{}\" and path \"{}\" is {} threshold of {:.2}%.",
        result.metric, result.path, relation, result.threshold
    )
}

pub fn not_found_message(path: &str) -> String {
    format!("Coverage report for path \"{}\" not found.", path)
}

pub fn summary_message(totals: &RunTotals) -> String {
    format!(
        "Line Coverage for all included files: {:.2}% ({}/{}).",
        totals.percentage(),
        totals.total_covered_lines,
        totals.total_executable_lines
    )
}

/// Prints the report to stdout
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    fn error(&self, message: &str) {
        println!("{}", format!(" [ERROR] {} ", message).white().on_red());
        println!();
    }

    fn success(&self, message: &str) {
        println!("{}", format!(" [OK] {} ", message).black().on_green());
        println!();
    }

    fn info(&self, message: &str) {
        println!("{}", format!(" [INFO] {} ", message).black().on_white());
        println!();
    }
}

impl Reporter for ConsoleReporter {
    fn path_report(&mut self, node: &CoverageNode, metrics: &MetricSet) {
        println!();
        println!("{}", render_title(node.path()).yellow().bold());
        println!();
        println!("{}", render_table(metrics));
        println!();
    }

    fn path_not_found(&mut self, path: &str) {
        self.error(&not_found_message(path));
    }

    fn unsupported_metric(&mut self, metric: &str) {
        let err = crate::Error::UnsupportedMetric(metric.to_string());
        self.error(&err.to_string());
    }

    fn threshold_result(&mut self, result: &PathCheckResult) {
        let message = threshold_message(result);
        if result.passed() {
            self.success(&message);
        } else {
            self.error(&message);
        }
    }

    fn summary(&mut self, totals: &RunTotals) {
        self.info(&summary_message(totals));
    }
}
