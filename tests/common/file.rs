use derive_new::new;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct FileSpec {
    pub path: PathBuf,
    pub content: String,
}

pub fn write_file(file_spec: FileSpec) {
    // make sure the parent directory exists
    if let Some(parent) = file_spec.path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("Failed to create directory {:?}: {}", parent, e));
    }

    std::fs::write(&file_spec.path, &file_spec.content)
        .unwrap_or_else(|e| panic!("Failed to write file {:?}: {}", file_spec.path, e));
}

pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        write_file(FileSpec::new(root.join(path), content.to_string()));
    }
}

pub fn remove_file(root: &Path, path: &str) {
    let path = root.join(path);
    std::fs::remove_file(&path)
        .unwrap_or_else(|e| panic!("Failed to remove file {:?}: {}", path, e));
}

/// Swift source declaring `Widget` with three stored properties
pub fn widget_swift() -> String {
    r#"import Foundation

struct Widget {
    let id: String
    var title: String
    var count: Int
}
"#
    .to_string()
}

/// Kotlin counterpart of [`widget_swift`]
pub fn widget_kotlin() -> String {
    r#"package io.reachu.reachucore

data class Widget(
    val id: String,
    var title: String,
    var count: Int,
)
"#
    .to_string()
}

/// `count` lines of Swift statements without any portable keyword
pub fn plain_statements(count: usize, variable: &str) -> String {
    (0..count)
        .map(|i| format!("    {variable} += {i}\n"))
        .collect()
}
