//! Clover XML format parser (PHPUnit `--coverage-clover`)

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{CoverageStats, FileStats};
use crate::error::{Error, Result};

/// Parse Clover XML content into per-file statistics.
///
/// File-level `<metrics>` supply line and method counts. A class counts as
/// tested when every statement in it was covered.
pub fn parse_clover_string(content: &str) -> Result<Vec<FileStats>> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut files: Vec<FileStats> = Vec::new();
    let mut current_file: Option<FileState> = None;
    let mut in_class = false;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"file" => {
                    let name = attr_string(e, b"name").unwrap_or_default();
                    current_file = Some(FileState::new(name));
                }
                b"class" => {
                    in_class = true;
                    if let Some(file) = current_file.as_mut() {
                        file.classes_seen += 1;
                    }
                }
                b"metrics" => apply_metrics(e, current_file.as_mut(), in_class),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"metrics" => apply_metrics(e, current_file.as_mut(), in_class),
                b"file" => {
                    let name = attr_string(e, b"name").unwrap_or_default();
                    if !name.is_empty() {
                        files.push(FileStats::new(name));
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"class" => in_class = false,
                b"file" => {
                    if let Some(file) = current_file.take().map(FileState::finish) {
                        if !file.path.is_empty() {
                            files.push(file);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Parse {
                    format: "clover",
                    message: e.to_string(),
                })
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(files)
}

/// A `<file>` element being read
struct FileState {
    file: FileStats,
    classes_seen: u32,
    /// `classes` attribute of the file-level metrics, if present
    classes: Option<u32>,
}

impl FileState {
    fn new(path: String) -> Self {
        Self {
            file: FileStats::new(path),
            classes_seen: 0,
            classes: None,
        }
    }

    /// Settle the class total; tested classes never exceed it
    fn finish(self) -> FileStats {
        let mut file = self.file;
        let classes = self.classes.unwrap_or(self.classes_seen);
        file.stats.classes = classes;
        file.stats.tested_classes = file.stats.tested_classes.min(classes);
        file
    }
}

/// Fold a `<metrics>` element into the enclosing file.
///
/// Project- and package-level metrics (outside any file) are ignored.
fn apply_metrics(e: &BytesStart, state: Option<&mut FileState>, in_class: bool) {
    let Some(state) = state else {
        return;
    };

    let statements = attr_u32(e, b"statements");
    let covered_statements = attr_u32(e, b"coveredstatements");

    if in_class {
        state.file.stats.tested_classes += u32::from(covered_statements >= statements);
        return;
    }

    let methods = attr_u32(e, b"methods");
    state.classes = attr_string(e, b"classes").and_then(|v| v.parse().ok());
    state.file.stats = CoverageStats {
        executable_lines: statements,
        executed_lines: covered_statements.min(statements),
        methods,
        tested_methods: attr_u32(e, b"coveredmethods").min(methods),
        classes: 0,
        tested_classes: state.file.stats.tested_classes,
    };
}

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

fn attr_u32(e: &BytesStart, key: &[u8]) -> u32 {
    attr_string(e, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
