//! Coverage module
//!
//! Provides:
//! - Report tree model
//! - Clover XML, Cobertura XML and LCOV parsing
//! - Format detection
//! - Line, method and class metrics

mod builder;
mod clover;
mod cobertura;
mod lcov;
mod metric;
mod node;

pub use builder::*;
pub use clover::*;
pub use cobertura::*;
pub use lcov::*;
pub use metric::*;
pub use node::*;

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Detect from the report content
    #[default]
    Auto,
    Clover,
    Cobertura,
    Lcov,
}

impl ReportFormat {
    /// Guess the format of report content
    pub fn detect(content: &str) -> Option<ReportFormat> {
        let trimmed = content.trim_start_matches('\u{feff}').trim_start();

        if trimmed.starts_with('<') {
            if trimmed.contains("<project") {
                return Some(ReportFormat::Clover);
            }
            if trimmed.contains("<packages") || trimmed.contains("line-rate=") {
                return Some(ReportFormat::Cobertura);
            }
            return None;
        }

        let is_lcov = trimmed
            .lines()
            .map(str::trim)
            .any(|line| line.starts_with("SF:") || line.starts_with("TN:"));
        is_lcov.then_some(ReportFormat::Lcov)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportFormat::Auto => "auto",
            ReportFormat::Clover => "clover",
            ReportFormat::Cobertura => "cobertura",
            ReportFormat::Lcov => "lcov",
        }
    }
}

/// Parse report content in the given format into per-file statistics
pub fn parse_report_string(content: &str, format: ReportFormat) -> Result<Vec<FileStats>> {
    match format {
        ReportFormat::Clover => parse_clover_string(content),
        ReportFormat::Cobertura => parse_cobertura_string(content),
        ReportFormat::Lcov => Ok(parse_lcov_string(content)),
        ReportFormat::Auto => Err(Error::Parse {
            format: "auto",
            message: "format must be resolved before parsing".to_string(),
        }),
    }
}

/// Load a coverage report file and build its report tree.
///
/// `working_dir` anchors relative file paths found in the report.
pub fn load_report(path: &Path, format: ReportFormat, working_dir: &Path) -> Result<CoverageNode> {
    let bytes = fs::read(path).map_err(|source| Error::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|source| Error::Encoding {
        path: path.to_path_buf(),
        source,
    })?;

    let format = match format {
        ReportFormat::Auto => ReportFormat::detect(&content).ok_or_else(|| Error::UnknownFormat {
            path: path.to_path_buf(),
        })?,
        forced => forced,
    };
    tracing::debug!("reading {} as {} report", path.display(), format.name());

    let files = parse_report_string(&content, format)?;
    tracing::debug!("parsed {} file records", files.len());

    Ok(build_tree(files, working_dir))
}
