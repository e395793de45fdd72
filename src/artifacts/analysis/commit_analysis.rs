use crate::artifacts::analysis::suggestion::{Complexity, PortCategory};
use crate::artifacts::classify::classifier::RelevanceVerdict;
use crate::artifacts::classify::recommendation::PortRecommendation;
use crate::artifacts::history::commit::{Commit, FileChange};
use crate::artifacts::implementation::checker::ImplementationStatus;
use crate::artifacts::mapping::path_mapper::DestinationMapping;
use crate::artifacts::symbols::symbol::SymbolDelta;
use serde::Serialize;

/// Everything known about one changed file of one commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAnalysis {
    #[serde(flatten)]
    pub change: FileChange,
    pub verdict: RelevanceVerdict,
    pub symbols: Vec<SymbolDelta>,
    pub mapping: DestinationMapping,
    pub implementation: ImplementationStatus,
    pub recommendation: PortRecommendation,
    pub category: PortCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
}

impl FileAnalysis {
    /// Relevant to the destination and not yet fully implemented there
    pub fn needs_porting(&self) -> bool {
        self.verdict.relevant && self.implementation.needs_implementation
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitAnalysis {
    pub commit: Commit,
    pub files: Vec<FileAnalysis>,
    pub relevant: bool,
    pub reason: String,
    pub errors: Vec<String>,
}

impl CommitAnalysis {
    pub fn new(commit: Commit, files: Vec<FileAnalysis>, errors: Vec<String>) -> Self {
        let relevant = files.iter().any(FileAnalysis::needs_porting);
        let reason = Self::reason(&commit, &files);

        CommitAnalysis {
            commit,
            files,
            relevant,
            reason,
            errors,
        }
    }

    /// A commit whose analysis could not run at all
    pub fn failed(commit: Commit, error: &anyhow::Error) -> Self {
        let mut analysis = Self::new(commit, Vec::new(), vec![format!("{error:#}")]);
        analysis.reason = "analysis failed".to_string();
        analysis
    }

    fn reason(commit: &Commit, files: &[FileAnalysis]) -> String {
        if !commit.is_resolved() {
            return "commit not found or without changes".to_string();
        }
        if files.is_empty() {
            return "no changed files selected".to_string();
        }

        let porting: Vec<_> = files
            .iter()
            .filter(|file| file.needs_porting())
            .map(|file| file.change.path.display().to_string())
            .collect();
        if !porting.is_empty() {
            return format!(
                "{} file(s) need porting: {}",
                porting.len(),
                porting.join(", ")
            );
        }

        let details = files
            .iter()
            .map(|file| {
                let why = if file.verdict.relevant {
                    "no missing symbols in destination"
                } else {
                    file.verdict.reason.as_str()
                };
                format!("{}: {why}", file.change.path.display())
            })
            .collect::<Vec<_>>()
            .join("; ");
        format!("no file needs porting ({details})")
    }
}
