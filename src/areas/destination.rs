use anyhow::Context;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_DIRS: [&str; 3] = [".git", ".gradle", "build"];

/// Read-only view of the destination codebase
#[derive(Debug, Clone)]
pub struct Destination {
    path: Box<Path>,
}

impl Destination {
    pub fn new(path: Box<Path>) -> Self {
        Destination { path }
    }

    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn read_text(&self, file_path: &Path) -> anyhow::Result<String> {
        let full_path = self.path.join(file_path);
        std::fs::read_to_string(&full_path)
            .with_context(|| format!("unable to read destination file {}", full_path.display()))
    }

    /// First file named `file_name` below `dir_path`, depth-first in lexicographic
    /// order and at most `max_depth` levels down
    ///
    /// The returned path is relative to the destination root.
    pub fn find_file(&self, dir_path: &Path, file_name: &str, max_depth: usize) -> Option<PathBuf> {
        let root = self.path.join(dir_path);
        if !root.is_dir() {
            return None;
        }

        WalkDir::new(&root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .find(|entry| entry.file_name().to_str() == Some(file_name))
            .and_then(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .map(PathBuf::from)
                    .ok()
            })
    }

    fn is_ignored(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
    }
}
