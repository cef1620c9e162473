//! Path resolution against the report tree
//!
//! Requested paths are relative to the working directory. Only the report
//! root and its direct children are considered; the resolver never descends
//! further.

use serde::Deserialize;
use std::path::{Path, MAIN_SEPARATOR};

use crate::coverage::CoverageNode;

/// How a requested path is compared with node paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMatch {
    /// Node path starts with the requested path (`src` also matches `src-other`)
    #[default]
    Prefix,
    /// Node path equals the requested path
    Exact,
}

impl PathMatch {
    fn matches(&self, node_path: &str, target: &str) -> bool {
        match self {
            PathMatch::Prefix => node_path.starts_with(target),
            PathMatch::Exact => trim_separators(node_path) == trim_separators(target),
        }
    }
}

fn trim_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', MAIN_SEPARATOR]);
    if trimmed.is_empty() {
        path
    } else {
        trimmed
    }
}

/// Find the report node for `relative_path`
pub fn resolve<'a>(
    root: &'a CoverageNode,
    relative_path: &str,
    working_dir: &Path,
    mode: PathMatch,
) -> Option<&'a CoverageNode> {
    let target = format!("{}{}{}", working_dir.display(), MAIN_SEPARATOR, relative_path);

    if mode.matches(root.path(), &target) {
        tracing::trace!("{} resolved to report root", relative_path);
        return Some(root);
    }

    let found = root
        .children()
        .iter()
        .find(|child| mode.matches(child.path(), &target));

    match found {
        Some(node) => tracing::debug!("{} resolved to {}", relative_path, node.path()),
        None => tracing::debug!("no report node for {}", target),
    }

    found
}

/// Base names of all report directories that sit directly in `working_dir`
pub fn discover_paths(root: &CoverageNode, working_dir: &Path) -> Vec<String> {
    root.iter()
        .filter(|node| node.is_directory() && node.parent_path() == Some(working_dir))
        .filter_map(|node| node.base_name())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{build_tree, CoverageStats, FileStats};

    fn file(path: &str, executable: u32, executed: u32) -> FileStats {
        FileStats {
            path: path.to_string(),
            stats: CoverageStats {
                executable_lines: executable,
                executed_lines: executed,
                ..Default::default()
            },
        }
    }

    fn project() -> CoverageNode {
        build_tree(
            vec![
                file("/proj/src-other/x.php", 10, 0),
                file("/proj/src/a.php", 10, 8),
                file("/proj/src/Nested/b.php", 10, 10),
                file("/proj/lib/c.php", 4, 4),
                file("/proj/index.php", 2, 1),
            ],
            Path::new("/proj"),
        )
    }

    #[test]
    fn test_resolve_direct_child() {
        let root = project();
        let node = resolve(&root, "lib", Path::new("/proj"), PathMatch::Prefix).unwrap();
        assert_eq!(node.path(), "/proj/lib");
        assert_eq!(node.executable_lines(), 4);
    }

    #[test]
    fn test_prefix_match_takes_first_in_report_order() {
        // src-other appears first in the report and also starts with /proj/src
        let root = project();
        let node = resolve(&root, "src", Path::new("/proj"), PathMatch::Prefix).unwrap();
        assert_eq!(node.path(), "/proj/src-other");
    }

    #[test]
    fn test_exact_match() {
        let root = project();
        let node = resolve(&root, "src", Path::new("/proj"), PathMatch::Exact).unwrap();
        assert_eq!(node.path(), "/proj/src");
        let node = resolve(&root, "src/", Path::new("/proj"), PathMatch::Exact).unwrap();
        assert_eq!(node.path(), "/proj/src");
    }

    #[test]
    fn test_resolve_report_root() {
        let root = build_tree(vec![file("/proj/src/a.php", 100, 80)], Path::new("/proj"));
        assert_eq!(root.path(), "/proj/src");

        let node = resolve(&root, "src", Path::new("/proj"), PathMatch::Prefix).unwrap();
        assert_eq!(node.path(), "/proj/src");
    }

    #[test]
    fn test_resolve_missing() {
        let root = project();
        assert!(resolve(&root, "missing-dir", Path::new("/proj"), PathMatch::Prefix).is_none());
    }

    #[test]
    fn test_resolve_does_not_descend() {
        let root = project();
        assert!(resolve(&root, "src/Nested", Path::new("/proj"), PathMatch::Exact).is_none());
    }

    #[test]
    fn test_resolve_file_child() {
        let root = project();
        let node = resolve(&root, "index.php", Path::new("/proj"), PathMatch::Prefix).unwrap();
        assert!(!node.is_directory());
    }

    #[test]
    fn test_discover_top_level_directories() {
        let root = project();
        let paths = discover_paths(&root, Path::new("/proj"));
        assert_eq!(paths, vec!["src-other", "src", "lib"]);
    }

    #[test]
    fn test_discover_includes_root_directory() {
        let root = build_tree(
            vec![file("/proj/src/a.php", 1, 1), file("/proj/src/Deep/b.php", 1, 1)],
            Path::new("/proj"),
        );
        assert_eq!(discover_paths(&root, Path::new("/proj")), vec!["src"]);
    }

    #[test]
    fn test_discover_outside_working_dir() {
        let root = project();
        assert!(discover_paths(&root, Path::new("/elsewhere")).is_empty());
    }
}
