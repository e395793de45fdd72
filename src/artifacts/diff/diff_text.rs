use derive_new::new;
use serde::Serialize;

const HUNK_HEADER_PREFIX: &str = "@@";
const FILE_HEADER_PREFIX: &str = "diff --git ";

/// Added and removed lines of one file's unified diff
///
/// Each set keeps diff order, which is not necessarily source order. Lines are
/// stored without their `+`/`-` prefix and without surrounding whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, new)]
pub struct DiffText {
    added: Vec<String>,
    removed: Vec<String>,
}

impl DiffText {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `git show`/`git diff` output for a single file
    ///
    /// Only lines inside hunks count. A diff that carries `+`/`-` lines but no hunk
    /// header at all is read leniently, skipping the `+++`/`---` file headers.
    pub fn parse_unified(diff: &str) -> Self {
        if !diff.lines().any(|line| line.starts_with(HUNK_HEADER_PREFIX)) {
            return Self::parse_lenient(diff);
        }

        let mut text = DiffText::empty();
        let mut in_hunk = false;

        for line in diff.lines() {
            if line.starts_with(FILE_HEADER_PREFIX) {
                in_hunk = false;
                continue;
            }
            if line.starts_with(HUNK_HEADER_PREFIX) {
                in_hunk = true;
                continue;
            }
            if in_hunk {
                text.push_line(line);
            }
        }

        text
    }

    fn parse_lenient(diff: &str) -> Self {
        let mut text = DiffText::empty();
        for line in diff
            .lines()
            .filter(|line| !line.starts_with("+++") && !line.starts_with("---"))
        {
            text.push_line(line);
        }
        text
    }

    fn push_line(&mut self, line: &str) {
        if let Some(added) = line.strip_prefix('+') {
            self.added.push(added.trim().to_string());
        } else if let Some(removed) = line.strip_prefix('-') {
            self.removed.push(removed.trim().to_string());
        }
    }

    pub fn added(&self) -> &[String] {
        &self.added
    }

    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// All changed lines, added first, joined by newlines
    pub fn changed_text(&self) -> String {
        self.added
            .iter()
            .chain(self.removed.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
