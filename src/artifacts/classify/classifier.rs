use crate::artifacts::classify::keywords::KeywordSet;
use crate::artifacts::diff::diff_text::DiffText;
use crate::artifacts::filter::path_filter::PathDecision;
use crate::artifacts::rules::Rules;
use crate::artifacts::symbols::delta::DeltaReport;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    ApiChange,
    FunctionalityAdded,
    ModelAdded,
    Refactor,
    FeatureAdded,
    Modification,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::ApiChange => "api_change",
            ChangeType::FunctionalityAdded => "functionality_added",
            ChangeType::ModelAdded => "model_added",
            ChangeType::Refactor => "refactor",
            ChangeType::FeatureAdded => "feature_added",
            ChangeType::Modification => "modification",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Relevance decision for one changed file
///
/// `change_type` is only set for files whose diff was inspected; files rejected by
/// path or extension are never diffed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelevanceVerdict {
    pub relevant: bool,
    pub path_relevant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_type: Option<ChangeType>,
    pub relevant_keywords: Vec<String>,
    pub irrelevant_keywords: Vec<String>,
    pub added_lines: usize,
    pub removed_lines: usize,
    pub reason: String,
}

impl RelevanceVerdict {
    pub fn rejected_by_path(decision: &PathDecision) -> Self {
        Self::without_diff(decision.is_relevant(), decision.reason())
    }

    pub fn foreign_extension(extension: Option<&str>, origin_extension: &str) -> Self {
        let found = match extension {
            Some(extension) => format!("extension '{extension}'"),
            None => "no extension".to_string(),
        };
        Self::without_diff(
            true,
            format!("not a .{origin_extension} source file ({found})"),
        )
    }

    fn without_diff(path_relevant: bool, reason: String) -> Self {
        RelevanceVerdict {
            relevant: false,
            path_relevant,
            change_type: None,
            relevant_keywords: Vec::new(),
            irrelevant_keywords: Vec::new(),
            added_lines: 0,
            removed_lines: 0,
            reason,
        }
    }

    pub fn changed_lines(&self) -> usize {
        self.added_lines + self.removed_lines
    }
}

#[derive(Debug, Clone)]
pub struct ChangeClassifier {
    origin_extension: String,
    portable: KeywordSet,
    presentation: KeywordSet,
    exported: KeywordSet,
    function: KeywordSet,
    types: KeywordSet,
}

impl ChangeClassifier {
    pub fn new(rules: &Rules) -> anyhow::Result<Self> {
        Ok(Self {
            origin_extension: rules.origin_extension.trim_start_matches('.').to_string(),
            portable: KeywordSet::new(&rules.keywords.portable)?,
            presentation: KeywordSet::new(&rules.keywords.presentation)?,
            exported: KeywordSet::new(&rules.markers.exported)?,
            function: KeywordSet::new(&rules.markers.function)?,
            types: KeywordSet::new(&rules.markers.types)?,
        })
    }

    pub fn origin_extension(&self) -> &str {
        &self.origin_extension
    }

    pub fn is_origin_source(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension == self.origin_extension)
    }

    /// First matching rule wins: exported marker, function marker, type marker,
    /// then the added/removed line ratio
    pub fn change_type(&self, diff: &DiffText) -> ChangeType {
        let added = diff.added();
        let removed = diff.removed();

        if self.exported.any_match(added.iter()) {
            ChangeType::ApiChange
        } else if self.function.any_match(added.iter()) {
            ChangeType::FunctionalityAdded
        } else if self.types.any_match(added.iter()) {
            ChangeType::ModelAdded
        } else if removed.len() > added.len() * 2 {
            ChangeType::Refactor
        } else if added.len() > removed.len() * 2 {
            ChangeType::FeatureAdded
        } else {
            ChangeType::Modification
        }
    }

    /// Verdict for a path-relevant origin source file whose diff was read
    pub fn classify(&self, diff: &DiffText, delta: &DeltaReport) -> RelevanceVerdict {
        let changed_text = diff.changed_text();
        let relevant_keywords = self.portable.matches(&changed_text);
        let irrelevant_keywords = self.presentation.matches(&changed_text);
        let relevant = relevant_keywords.len() > irrelevant_keywords.len();

        let comparison = if relevant { "outnumber" } else { "do not outnumber" };
        let reason = format!(
            "portable keywords [{}] {comparison} presentation keywords [{}]; {}",
            relevant_keywords.join(", "),
            irrelevant_keywords.join(", "),
            delta.summary
        );

        RelevanceVerdict {
            relevant,
            path_relevant: true,
            change_type: Some(self.change_type(diff)),
            relevant_keywords,
            irrelevant_keywords,
            added_lines: diff.added().len(),
            removed_lines: diff.removed().len(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::symbols::delta::DeltaAnalyzer;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn classifier() -> ChangeClassifier {
        ChangeClassifier::new(&Rules::default()).unwrap()
    }

    fn diff(added: &[&str], removed: &[&str]) -> DiffText {
        DiffText::new(
            added.iter().map(|line| line.to_string()).collect(),
            removed.iter().map(|line| line.to_string()).collect(),
        )
    }

    fn lines(count: usize, text: &str) -> Vec<String> {
        (0..count).map(|i| format!("{text} {i}")).collect()
    }

    fn classify(classifier: &ChangeClassifier, diff: &DiffText) -> RelevanceVerdict {
        let delta = DeltaAnalyzer::new().unwrap().analyze(diff);
        classifier.classify(diff, &delta)
    }

    // ========== Change Type Tests ==========

    #[rstest]
    #[case(&["public var total: Double"], &[], ChangeType::ApiChange)]
    #[case(&["func total() -> Double {"], &[], ChangeType::FunctionalityAdded)]
    #[case(&["struct Line {"], &[], ChangeType::ModelAdded)]
    #[case(&["let a = 1"], &["let a = 0", "let b = 0", "let c = 0"], ChangeType::Refactor)]
    #[case(&["let a = 1", "let b = 2", "let c = 3"], &["let a = 0"], ChangeType::FeatureAdded)]
    #[case(&["let a = 1", "let b = 2"], &["let a = 0"], ChangeType::Modification)]
    #[case(&[], &[], ChangeType::Modification)]
    fn precedence(
        classifier: ChangeClassifier,
        #[case] added: &[&str],
        #[case] removed: &[&str],
        #[case] expected: ChangeType,
    ) {
        assert_eq!(classifier.change_type(&diff(added, removed)), expected);
    }

    #[rstest]
    fn markers_only_count_on_added_lines(classifier: ChangeClassifier) {
        let diff = diff(&["x = 1"], &["public func old() {"]);

        assert_eq!(classifier.change_type(&diff), ChangeType::Modification);
    }

    #[rstest]
    fn exported_marker_beats_type_marker(classifier: ChangeClassifier) {
        let diff = diff(&["public struct Widget {"], &[]);

        assert_eq!(classifier.change_type(&diff), ChangeType::ApiChange);
    }

    // ========== Relevance Tests ==========

    #[rstest]
    fn portable_keywords_must_outnumber_presentation_keywords(classifier: ChangeClassifier) {
        let verdict = classify(
            &classifier,
            &diff(&["public final class CartManager {", "import SwiftUI"], &[]),
        );

        assert!(verdict.relevant);
        assert_eq!(verdict.relevant_keywords, vec!["public", "class"]);
        assert_eq!(verdict.irrelevant_keywords, vec!["import SwiftUI"]);
        assert_eq!(verdict.change_type, Some(ChangeType::ApiChange));
    }

    #[rstest]
    fn tie_is_not_relevant(classifier: ChangeClassifier) {
        let verdict = classify(&classifier, &diff(&["struct Preview: View {"], &[]));

        assert_eq!(verdict.relevant_keywords, vec!["struct"]);
        assert_eq!(verdict.irrelevant_keywords, vec!["View"]);
        assert!(!verdict.relevant);
        assert!(verdict.reason.contains("do not outnumber"));
    }

    #[rstest]
    fn large_removal_without_keywords_is_an_irrelevant_refactor(classifier: ChangeClassifier) {
        let diff = DiffText::new(lines(10, "value +="), lines(80, "total -="));
        let verdict = classify(&classifier, &diff);

        assert_eq!(verdict.change_type, Some(ChangeType::Refactor));
        assert!(!verdict.relevant);
        assert_eq!((verdict.added_lines, verdict.removed_lines), (10, 80));
    }

    #[rstest]
    fn reason_carries_the_delta_summary(classifier: ChangeClassifier) {
        let verdict = classify(&classifier, &diff(&["public func pay() {"], &[]));

        assert!(verdict.reason.ends_with("+1 -0 added function pay"));
    }

    // ========== Extension Tests ==========

    #[rstest]
    #[case("Sources/Core/Cart.swift", true)]
    #[case("Sources/Core/cart.SWIFT", false)]
    #[case("Sources/Core/logo.png", false)]
    #[case("Sources/Core/Makefile", false)]
    fn origin_source_by_extension(
        classifier: ChangeClassifier,
        #[case] path: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(classifier.is_origin_source(Path::new(path)), expected);
    }

    #[test]
    fn foreign_extension_verdict_names_the_extension() {
        let verdict = RelevanceVerdict::foreign_extension(Some("png"), "swift");

        assert!(verdict.path_relevant);
        assert!(!verdict.relevant);
        assert_eq!(verdict.reason, "not a .swift source file (extension 'png')");
    }
}
