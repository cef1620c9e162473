//! Coverage metrics (line, method, class)

use std::fmt;
use std::str::FromStr;

use super::node::CoverageNode;
use crate::error::Error;

/// A coverage metric that can be checked against a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Line,
    Method,
    Class,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Line, Metric::Method, Metric::Class];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Line => "line",
            Metric::Method => "method",
            Metric::Class => "class",
        }
    }

    /// Row label used in the coverage table
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Line => "Line Coverage",
            Metric::Method => "Method Coverage",
            Metric::Class => "Class Coverage",
        }
    }

    /// Compute this metric for a report node
    pub fn extract(&self, node: &CoverageNode) -> MetricResult {
        let (covered, total, percentage) = match self {
            Metric::Line => (
                node.executed_lines(),
                node.executable_lines(),
                node.percent_of_lines(),
            ),
            Metric::Method => (
                node.tested_methods(),
                node.methods(),
                node.percent_of_methods(),
            ),
            Metric::Class => (
                node.tested_classes(),
                node.classes(),
                node.percent_of_classes(),
            ),
        };
        MetricResult {
            metric: *self,
            covered,
            total,
            percentage,
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(Metric::Line),
            "method" => Ok(Metric::Method),
            "class" => Ok(Metric::Class),
            other => Err(Error::UnsupportedMetric(other.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One metric measured on one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricResult {
    pub metric: Metric,
    pub covered: u32,
    pub total: u32,
    pub percentage: f64,
}

/// All three metrics for a node, in table order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSet {
    pub line: MetricResult,
    pub method: MetricResult,
    pub class: MetricResult,
}

impl MetricSet {
    pub fn of(node: &CoverageNode) -> Self {
        Self {
            line: Metric::Line.extract(node),
            method: Metric::Method.extract(node),
            class: Metric::Class.extract(node),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricResult> {
        [&self.line, &self.method, &self.class].into_iter()
    }
}
