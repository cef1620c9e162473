//! Report tree model
//!
//! A coverage report is a tree of directory and file nodes keyed by
//! absolute path. Directory statistics are the sum of their descendants.

use std::path::Path;

/// Raw counts for one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageStats {
    pub executable_lines: u32,
    pub executed_lines: u32,
    pub methods: u32,
    pub tested_methods: u32,
    pub classes: u32,
    pub tested_classes: u32,
}

impl CoverageStats {
    fn add(&mut self, other: &CoverageStats) {
        self.executable_lines += other.executable_lines;
        self.executed_lines += other.executed_lines;
        self.methods += other.methods;
        self.tested_methods += other.tested_methods;
        self.classes += other.classes;
        self.tested_classes += other.tested_classes;
    }
}

/// Coverage statistics for one source file, as read from a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub path: String,
    pub stats: CoverageStats,
}

impl FileStats {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            stats: CoverageStats::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Directory,
    File,
}

/// A node in the report tree (directory or file)
#[derive(Debug, Clone)]
pub struct CoverageNode {
    path: String,
    kind: NodeKind,
    stats: CoverageStats,
    children: Vec<CoverageNode>,
}

impl CoverageNode {
    /// Create an empty directory node
    pub fn new_directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::Directory,
            stats: CoverageStats::default(),
            children: Vec::new(),
        }
    }

    /// Create a file node (leaf)
    pub fn new_file(file: FileStats) -> Self {
        Self {
            path: file.path,
            kind: NodeKind::File,
            stats: file.stats,
            children: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn children(&self) -> &[CoverageNode] {
        &self.children
    }

    pub fn executable_lines(&self) -> u32 {
        self.stats.executable_lines
    }

    pub fn executed_lines(&self) -> u32 {
        self.stats.executed_lines
    }

    pub fn methods(&self) -> u32 {
        self.stats.methods
    }

    pub fn tested_methods(&self) -> u32 {
        self.stats.tested_methods
    }

    pub fn classes(&self) -> u32 {
        self.stats.classes
    }

    pub fn tested_classes(&self) -> u32 {
        self.stats.tested_classes
    }

    pub fn percent_of_lines(&self) -> f64 {
        percent(self.stats.executed_lines, self.stats.executable_lines)
    }

    pub fn percent_of_methods(&self) -> f64 {
        percent(self.stats.tested_methods, self.stats.methods)
    }

    pub fn percent_of_classes(&self) -> f64 {
        percent(self.stats.tested_classes, self.stats.classes)
    }

    /// Parent directory of this node's path, if any
    pub fn parent_path(&self) -> Option<&Path> {
        Path::new(&self.path).parent()
    }

    /// Last path component
    pub fn base_name(&self) -> Option<String> {
        Path::new(&self.path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Find or create a child directory node
    pub(crate) fn get_or_create_dir(&mut self, path: &str) -> &mut CoverageNode {
        let idx = match self.children.iter().position(|c| c.path == path) {
            Some(idx) => idx,
            None => {
                self.children.push(CoverageNode::new_directory(path));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// Add a file child, merging into an existing file node with the same path
    pub(crate) fn add_file(&mut self, file: FileStats) {
        let existing = self
            .children
            .iter_mut()
            .find(|c| c.kind == NodeKind::File && c.path == file.path);

        match existing {
            Some(node) => node.stats.add(&file.stats),
            None => self.children.push(CoverageNode::new_file(file)),
        }
    }

    /// Recompute directory statistics from children
    pub(crate) fn update_counts(&mut self) {
        if self.kind == NodeKind::File {
            return;
        }

        let mut stats = CoverageStats::default();
        for child in &mut self.children {
            child.update_counts();
            stats.add(&child.stats);
        }
        self.stats = stats;
    }

    /// Pre-order walk over this node and all descendants
    pub fn iter(&self) -> impl Iterator<Item = &CoverageNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Percentage of `covered` in `total`; an empty total counts as fully covered
pub fn percent(covered: u32, total: u32) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (covered as f64 / total as f64) * 100.0
}
