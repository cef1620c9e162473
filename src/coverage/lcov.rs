//! LCOV format parser

use super::{CoverageStats, FileStats};

/// Parse LCOV content into per-file statistics.
///
/// Lines come from `LF`/`LH` when present, otherwise from `DA` records.
/// Functions count as methods (`FNF`/`FNH`, falling back to `FN`/`FNDA`).
/// LCOV has no notion of classes.
pub fn parse_lcov_string(content: &str) -> Vec<FileStats> {
    let mut files: Vec<FileStats> = Vec::new();
    let mut current: Option<LcovRecord> = None;

    for line in content.lines() {
        let line = line.trim();

        if let Some(path) = line.strip_prefix("SF:") {
            current = Some(LcovRecord::new(path));
            continue;
        }

        let Some(record) = current.as_mut() else {
            continue;
        };

        if line == "end_of_record" {
            if let Some(record) = current.take() {
                files.push(record.finish());
            }
        } else if let Some(rest) = line.strip_prefix("DA:") {
            // DA:<line>,<hits>[,<checksum>]
            let hits = rest.split(',').nth(1).and_then(|h| h.parse::<u64>().ok());
            if let Some(hits) = hits {
                record.da_found += 1;
                if hits > 0 {
                    record.da_hit += 1;
                }
            }
        } else if let Some(count) = line.strip_prefix("LF:") {
            record.lines_found = count.parse().ok();
        } else if let Some(count) = line.strip_prefix("LH:") {
            record.lines_hit = count.parse().ok();
        } else if line.starts_with("FN:") {
            record.fn_declared += 1;
        } else if let Some(rest) = line.strip_prefix("FNDA:") {
            let hits = rest.split(',').next().and_then(|h| h.parse::<u64>().ok());
            if hits.is_some_and(|h| h > 0) {
                record.fn_hit += 1;
            }
        } else if let Some(count) = line.strip_prefix("FNF:") {
            record.functions_found = count.parse().ok();
        } else if let Some(count) = line.strip_prefix("FNH:") {
            record.functions_hit = count.parse().ok();
        }
    }

    // Tolerate a missing trailing end_of_record
    if let Some(record) = current.take() {
        files.push(record.finish());
    }

    files
}

/// Counters for one `SF:` ... `end_of_record` block
struct LcovRecord {
    path: String,
    lines_found: Option<u32>,
    lines_hit: Option<u32>,
    da_found: u32,
    da_hit: u32,
    functions_found: Option<u32>,
    functions_hit: Option<u32>,
    fn_declared: u32,
    fn_hit: u32,
}

impl LcovRecord {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            lines_found: None,
            lines_hit: None,
            da_found: 0,
            da_hit: 0,
            functions_found: None,
            functions_hit: None,
            fn_declared: 0,
            fn_hit: 0,
        }
    }

    fn finish(self) -> FileStats {
        let executable_lines = self.lines_found.unwrap_or(self.da_found);
        let executed_lines = self.lines_hit.unwrap_or(self.da_hit).min(executable_lines);
        let methods = self.functions_found.unwrap_or(self.fn_declared);
        let tested_methods = self.functions_hit.unwrap_or(self.fn_hit).min(methods);

        FileStats {
            path: self.path,
            stats: CoverageStats {
                executable_lines,
                executed_lines,
                methods,
                tested_methods,
                classes: 0,
                tested_classes: 0,
            },
        }
    }
}
