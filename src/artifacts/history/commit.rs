//! Origin commit metadata
//!
//! A [`Commit`] is produced only by the history extractor and never mutated
//! afterwards. Each commit carries the list of [`FileChange`]s reported by
//! `git log --name-status` for it.

use colored::Colorize;
use derive_new::new;
use serde::Serialize;
use std::path::PathBuf;

/// Length of an abbreviated commit id in reports
pub const SHORT_ID_LENGTH: usize = 8;

/// Author identity as recorded in the origin history
#[derive(Debug, Clone, Eq, PartialEq, Serialize, new)]
pub struct Author {
    name: String,
    email: String,
}

impl Author {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format author name and email for display
    ///
    /// # Returns
    ///
    /// String in format "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Commit {
    id: String,
    author: Author,
    date: Option<chrono::DateTime<chrono::FixedOffset>>,
    subject: String,
    body: String,
    files: Vec<FileChange>,
}

impl Commit {
    pub fn new(
        id: String,
        author: Author,
        date: chrono::DateTime<chrono::FixedOffset>,
        subject: String,
        body: String,
        files: Vec<FileChange>,
    ) -> Self {
        Commit {
            id,
            author,
            date: Some(date),
            subject,
            body,
            files,
        }
    }

    /// Placeholder for a requested commit the history could not produce
    /// (unknown hash, empty answer). It has no metadata and no files.
    pub fn unresolved(id: &str) -> Self {
        Commit {
            id: id.to_string(),
            author: Author::new(String::new(), String::new()),
            date: None,
            subject: String::new(),
            body: String::new(),
            files: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(SHORT_ID_LENGTH)
            .map(|(idx, _)| idx)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn date(&self) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        self.date
    }

    /// String like "Mon Jan 1 12:34:56 2024 +0000", empty for unresolved commits
    pub fn readable_date(&self) -> String {
        self.date
            .map(|date| date.format("%a %b %-d %H:%M:%S %Y %z").to_string())
            .unwrap_or_default()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn files(&self) -> &[FileChange] {
        &self.files
    }

    pub fn is_resolved(&self) -> bool {
        self.date.is_some()
    }

    pub fn touches(&self, path: &std::path::Path) -> bool {
        self.files.iter().any(|file| file.path == path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl FileStatus {
    /// Parse the status column of `--name-status` output (`A`, `M`, `D`, `R086`, ...)
    ///
    /// Type changes count as modifications and copies as additions.
    pub fn try_parse(column: &str) -> Option<Self> {
        match column.chars().next()? {
            'A' | 'C' => Some(FileStatus::Added),
            'M' | 'T' => Some(FileStatus::Modified),
            'D' => Some(FileStatus::Deleted),
            'R' => Some(FileStatus::Renamed),
            _ => None,
        }
    }

    pub fn status_char(&self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Modified => 'M',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = self.status_char().to_string();
        let colored_label = match self {
            FileStatus::Added => label.green(),
            FileStatus::Modified => label.yellow(),
            FileStatus::Deleted => label.red(),
            FileStatus::Renamed => label.cyan(),
        };
        write!(f, "{}", colored_label)
    }
}

/// One file touched by a commit, path relative to the origin root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
pub struct FileChange {
    pub path: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_path: Option<PathBuf>,
}

impl FileChange {
    /// Parse one `--name-status` line: `M\tpath` or `R100\told\tnew`
    pub fn try_parse(line: &str) -> Option<Self> {
        let mut columns = line.split('\t');
        let status = FileStatus::try_parse(columns.next()?)?;
        let first = columns.next().filter(|path| !path.is_empty())?;

        match (status, columns.next()) {
            (FileStatus::Renamed, Some(new_path)) | (FileStatus::Added, Some(new_path)) => {
                Some(FileChange::new(
                    PathBuf::from(new_path),
                    status,
                    Some(PathBuf::from(first)),
                ))
            }
            _ => Some(FileChange::new(PathBuf::from(first), status, None)),
        }
    }
}
