//! Cobertura XML format parser

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{CoverageStats, FileStats};
use crate::error::{Error, Result};

/// Parse Cobertura XML content into per-file statistics.
///
/// Classes sharing a `filename` are merged into one file. Relative
/// filenames are joined onto the first `<source>` element when present.
pub fn parse_cobertura_string(content: &str) -> Result<Vec<FileStats>> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut files: Vec<FileStats> = Vec::new();
    let mut source: Option<String> = None;
    let mut in_source = false;

    let mut current_class: Option<ClassState> = None;
    let mut current_method: Option<MethodState> = None;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"source" => in_source = source.is_none(),
                b"class" => current_class = Some(ClassState::from_element(e)),
                b"method" => {
                    if current_class.is_some() {
                        current_method = Some(MethodState::from_element(e));
                    }
                }
                b"line" => record_line(e, &mut current_class, &mut current_method),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"line" => record_line(e, &mut current_class, &mut current_method),
                b"method" => {
                    // A method without lines: fall back to its line-rate
                    if let Some(class) = current_class.as_mut() {
                        class.add_method(MethodState::from_element(e));
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_source {
                    let text = e.unescape().map_err(parse_error)?;
                    source = Some(text.trim().to_string());
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"source" => in_source = false,
                b"method" => {
                    if let (Some(class), Some(method)) =
                        (current_class.as_mut(), current_method.take())
                    {
                        class.add_method(method);
                    }
                }
                b"class" => {
                    if let Some(class) = current_class.take() {
                        merge_class(&mut files, class, source.as_deref());
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_error(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(files)
}

fn parse_error(e: quick_xml::Error) -> Error {
    Error::Parse {
        format: "cobertura",
        message: e.to_string(),
    }
}

/// Count a `<line>` against the enclosing method, or the class otherwise
fn record_line(
    e: &BytesStart,
    class: &mut Option<ClassState>,
    method: &mut Option<MethodState>,
) {
    let hits = attr_u64(e, b"hits").unwrap_or(0);

    if let Some(method) = method.as_mut() {
        method.lines += 1;
        if hits > 0 {
            method.lines_hit += 1;
        }
    } else if let Some(class) = class.as_mut() {
        class.lines += 1;
        if hits > 0 {
            class.lines_hit += 1;
        }
    }
}

fn merge_class(files: &mut Vec<FileStats>, class: ClassState, source: Option<&str>) {
    if class.filename.is_empty() {
        return;
    }

    let path = match source {
        Some(root) if !Path::new(&class.filename).is_absolute() => Path::new(root)
            .join(&class.filename)
            .to_string_lossy()
            .into_owned(),
        _ => class.filename.clone(),
    };

    let stats = class.stats();
    match files.iter_mut().find(|f| f.path == path) {
        Some(file) => {
            file.stats.executable_lines += stats.executable_lines;
            file.stats.executed_lines += stats.executed_lines;
            file.stats.methods += stats.methods;
            file.stats.tested_methods += stats.tested_methods;
            file.stats.classes += stats.classes;
            file.stats.tested_classes += stats.tested_classes;
        }
        None => files.push(FileStats { path, stats }),
    }
}

struct ClassState {
    filename: String,
    lines: u32,
    lines_hit: u32,
    methods: u32,
    tested_methods: u32,
}

impl ClassState {
    fn from_element(e: &BytesStart) -> Self {
        Self {
            filename: attr_string(e, b"filename").unwrap_or_default(),
            lines: 0,
            lines_hit: 0,
            methods: 0,
            tested_methods: 0,
        }
    }

    fn add_method(&mut self, method: MethodState) {
        self.methods += 1;
        if method.is_tested() {
            self.tested_methods += 1;
        }
    }

    fn stats(&self) -> CoverageStats {
        CoverageStats {
            executable_lines: self.lines,
            executed_lines: self.lines_hit,
            methods: self.methods,
            tested_methods: self.tested_methods,
            classes: 1,
            tested_classes: u32::from(self.lines_hit == self.lines),
        }
    }
}

struct MethodState {
    line_rate: f64,
    lines: u32,
    lines_hit: u32,
}

impl MethodState {
    fn from_element(e: &BytesStart) -> Self {
        Self {
            line_rate: attr_string(e, b"line-rate")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.0),
            lines: 0,
            lines_hit: 0,
        }
    }

    fn is_tested(&self) -> bool {
        if self.lines == 0 {
            return self.line_rate >= 1.0;
        }
        self.lines_hit == self.lines
    }
}

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

fn attr_u64(e: &BytesStart, key: &[u8]) -> Option<u64> {
    attr_string(e, key).and_then(|v| v.parse().ok())
}
