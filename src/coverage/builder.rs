//! Builds the report tree from per-file statistics

use std::path::{Component, Path, PathBuf};

use super::{CoverageNode, FileStats};

/// Build a report tree rooted at the deepest directory shared by all files.
///
/// Relative file paths are resolved against `working_dir`. Directories keep
/// the order in which their first file appeared in the report.
pub fn build_tree(files: Vec<FileStats>, working_dir: &Path) -> CoverageNode {
    let files: Vec<(PathBuf, FileStats)> = files
        .into_iter()
        .map(|file| {
            let path = normalize(working_dir, Path::new(&file.path));
            (path, file)
        })
        .collect();

    let root_path = common_dir(files.iter().map(|(path, _)| path.as_path()))
        .unwrap_or_else(|| normalize(working_dir, Path::new("")));

    let mut root = CoverageNode::new_directory(display(&root_path));

    for (path, mut file) in files {
        file.path = display(&path);

        let Ok(relative) = path.strip_prefix(&root_path) else {
            continue;
        };
        let dirs: Vec<Component> = match relative.parent() {
            Some(parent) => parent.components().collect(),
            None => Vec::new(),
        };

        let mut current = &mut root;
        let mut current_path = root_path.clone();
        for dir in dirs {
            current_path.push(dir);
            current = current.get_or_create_dir(&display(&current_path));
        }

        current.add_file(file);
    }

    root.update_counts();
    tracing::debug!(
        "built report tree at {} ({} lines)",
        root.path(),
        root.executable_lines()
    );
    root
}

/// Lexically normalize `path` against `base`, dropping `.` and folding `..`
fn normalize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Deepest directory containing every path
fn common_dir<'a>(paths: impl Iterator<Item = &'a Path>) -> Option<PathBuf> {
    let mut common: Option<Vec<Component<'a>>> = None;

    for path in paths {
        let parent: Vec<Component> = path.parent().map(|p| p.components().collect())?;
        common = Some(match common {
            None => parent,
            Some(prefix) => prefix
                .into_iter()
                .zip(parent)
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a)
                .collect(),
        });
    }

    common.map(|components| components.into_iter().collect())
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
