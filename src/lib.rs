//! Coverage Checker
//!
//! Audits an existing code coverage report:
//! - Clover XML, Cobertura XML and LCOV reports, detected from content
//! - Report tree of directories and files with aggregated statistics
//! - Per-path threshold checks on line, method or class coverage
//! - Console tables and an exit code equal to the number of failing paths

pub mod check;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod error;
pub mod report;
pub mod resolve;

pub use check::{
    check_paths, CheckOptions, CheckSummary, PathCheckResult, PathOutcome, Reporter, RunTotals,
    Threshold,
};
pub use coverage::{load_report, CoverageNode, Metric, MetricResult, MetricSet, ReportFormat};
pub use error::{Error, Result};
pub use resolve::{discover_paths, resolve, PathMatch};
