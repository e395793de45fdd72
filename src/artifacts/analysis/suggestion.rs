use crate::artifacts::analysis::commit_analysis::{CommitAnalysis, FileAnalysis};
use crate::artifacts::history::commit::FileStatus;
use crate::artifacts::rules::defaults::DESTINATION_LANGUAGE;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const MAX_RELATED_COMMITS: usize = 3;

const HIGH_COMPLEXITY_LINES: usize = 500;
const MEDIUM_COMPLEXITY_LINES: usize = 200;

/// Area of the SDK a file belongs to, judged from its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PortCategory {
    Backend,
    #[serde(rename = "UX/UI")]
    UxUi,
    Configuration,
    Models,
    Localization,
    #[serde(rename = "API")]
    Api,
    Cache,
    Other,
}

impl PortCategory {
    pub fn categorize(path: &Path) -> Self {
        let path = path.to_string_lossy();
        let mentions = |words: &[&str]| words.iter().any(|word| path.contains(word));

        if mentions(&["Manager"]) {
            PortCategory::Backend
        } else if mentions(&["Component", "View", "UI"]) {
            PortCategory::UxUi
        } else if mentions(&["Configuration", "Config"]) {
            PortCategory::Configuration
        } else if mentions(&["Model", "DTO"]) {
            PortCategory::Models
        } else if mentions(&["Localization", "Translation"]) {
            PortCategory::Localization
        } else if mentions(&["Network", "API"]) {
            PortCategory::Api
        } else if mentions(&["Cache", "Storage"]) {
            PortCategory::Cache
        } else {
            PortCategory::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PortCategory::Backend => "Backend",
            PortCategory::UxUi => "UX/UI",
            PortCategory::Configuration => "Configuration",
            PortCategory::Models => "Models",
            PortCategory::Localization => "Localization",
            PortCategory::Api => "API",
            PortCategory::Cache => "Cache",
            PortCategory::Other => "Other",
        }
    }

    /// Board tag for the category; configuration, models and the rest go untagged
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            PortCategory::Backend
            | PortCategory::UxUi
            | PortCategory::Localization
            | PortCategory::Api
            | PortCategory::Cache => Some(self.label()),
            PortCategory::Configuration | PortCategory::Models | PortCategory::Other => None,
        }
    }
}

impl std::fmt::Display for PortCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn from_line_count(lines: usize) -> Self {
        if lines > HIGH_COMPLEXITY_LINES {
            Complexity::High
        } else if lines > MEDIUM_COMPLEXITY_LINES {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }

    pub fn estimate(&self) -> &'static str {
        match self {
            Complexity::High => "5-8 h",
            Complexity::Medium => "3-5 h",
            Complexity::Low => "2-3 h",
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Complexity::Low => write!(f, "low"),
            Complexity::Medium => write!(f, "medium"),
            Complexity::High => write!(f, "high"),
        }
    }
}

/// A porting task proposal; nothing is created from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSuggestion {
    pub title: String,
    pub path: PathBuf,
    pub status: FileStatus,
    pub category: PortCategory,
    pub complexity: Complexity,
    pub estimate: String,
    pub tags: Vec<String>,
    pub related_commits: Vec<String>,
}

impl TaskSuggestion {
    fn from_file(file: &FileAnalysis, related_commits: Vec<String>) -> Self {
        let name = file
            .change
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| file.change.path.display().to_string());

        let title = match file.change.status {
            FileStatus::Added => format!("Port {name} to {DESTINATION_LANGUAGE}"),
            FileStatus::Modified => {
                format!("Update {name} implementation in {DESTINATION_LANGUAGE}")
            }
            FileStatus::Deleted | FileStatus::Renamed => format!("Review changes in {name}"),
        };

        let complexity = file.complexity.unwrap_or(Complexity::Low);
        let mut tags = vec![DESTINATION_LANGUAGE.to_string()];
        tags.extend(file.category.tag().map(str::to_string));
        if complexity == Complexity::High {
            tags.push("Priority".to_string());
        }

        TaskSuggestion {
            title,
            path: file.change.path.clone(),
            status: file.change.status,
            category: file.category,
            complexity,
            estimate: complexity.estimate().to_string(),
            tags,
            related_commits,
        }
    }
}

/// One suggestion per file still needing a port, across all analysed commits
///
/// Analyses are expected newest first, so the first occurrence of a path carries
/// its newest status.
pub fn suggest(analyses: &[CommitAnalysis]) -> Vec<TaskSuggestion> {
    let mut seen: HashSet<&Path> = HashSet::new();
    let mut suggestions = Vec::new();

    for analysis in analyses {
        for file in &analysis.files {
            if !seen.insert(file.change.path.as_path()) || !file.needs_porting() {
                continue;
            }

            let related = analyses
                .iter()
                .filter(|other| other.commit.touches(&file.change.path))
                .take(MAX_RELATED_COMMITS)
                .map(|other| other.commit.short_id().to_string())
                .collect();
            suggestions.push(TaskSuggestion::from_file(file, related));
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Sources/ReachuCore/Cart/CartManager.swift", PortCategory::Backend)]
    #[case("Sources/ReachuUI/Components/ProductCard.swift", PortCategory::UxUi)]
    #[case("Sources/ReachuCore/Configuration/Theme.swift", PortCategory::Configuration)]
    #[case("Sources/ReachuCore/Models/Product.swift", PortCategory::Models)]
    #[case("Sources/ReachuCore/Translations/Strings.swift", PortCategory::Localization)]
    #[case("Sources/ReachuCore/Network/Client.swift", PortCategory::Api)]
    #[case("Sources/ReachuCore/Storage/Disk.swift", PortCategory::Cache)]
    #[case("Sources/ReachuCore/Utils/Math.swift", PortCategory::Other)]
    fn categories_by_path(#[case] path: &str, #[case] expected: PortCategory) {
        assert_eq!(PortCategory::categorize(Path::new(path)), expected);
    }

    #[test]
    fn manager_wins_over_later_categories() {
        let category = PortCategory::categorize(Path::new("Sources/UI/CacheManager.swift"));

        assert_eq!(category, PortCategory::Backend);
    }

    #[rstest]
    #[case(0, Complexity::Low)]
    #[case(200, Complexity::Low)]
    #[case(201, Complexity::Medium)]
    #[case(500, Complexity::Medium)]
    #[case(501, Complexity::High)]
    fn complexity_thresholds(#[case] lines: usize, #[case] expected: Complexity) {
        assert_eq!(Complexity::from_line_count(lines), expected);
    }

    #[test]
    fn untagged_categories() {
        assert_eq!(PortCategory::Models.tag(), None);
        assert_eq!(PortCategory::UxUi.tag(), Some("UX/UI"));
    }
}
