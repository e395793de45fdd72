use crate::areas::destination::Destination;
use crate::areas::history::History;
use crate::artifacts::analysis::commit_analysis::{CommitAnalysis, FileAnalysis};
use crate::artifacts::analysis::suggestion::{Complexity, PortCategory};
use crate::artifacts::classify::classifier::{ChangeClassifier, RelevanceVerdict};
use crate::artifacts::classify::recommendation::PortRecommendation;
use crate::artifacts::filter::path_filter::{PathDecision, PathFilter};
use crate::artifacts::history::commit::{Commit, FileChange, FileStatus};
use crate::artifacts::history::since::SinceExpr;
use crate::artifacts::history::status_filter::StatusFilter;
use crate::artifacts::implementation::checker::{
    ImplementationChecker, ImplementationStatus, NO_DESTINATION_FILE_NOTE,
};
use crate::artifacts::mapping::path_mapper::{DestinationMapping, PathMapper};
use crate::artifacts::rules::Rules;
use crate::artifacts::symbols::delta::DeltaAnalyzer;
use crate::artifacts::symbols::symbol::SymbolDelta;
use futures::StreamExt;
use std::path::Path;

pub const DEFAULT_JOBS: usize = 4;
pub const NO_DESTINATION_NOTE: &str = "no destination codebase configured";

/// What to analyse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Commits(Vec<String>),
    Since { since: SinceExpr, all_refs: bool },
}

/// Runs the whole pipeline for commits of the origin history
///
/// Every stage except history and destination reads is a pure function of its
/// input, so commits and files are analysed concurrently. Output order always
/// follows input order.
pub struct Analyzer<H: History> {
    history: H,
    destination: Option<Destination>,
    filter: PathFilter,
    deltas: DeltaAnalyzer,
    classifier: ChangeClassifier,
    mapper: PathMapper,
    statuses: StatusFilter,
    jobs: usize,
}

impl<H: History> Analyzer<H> {
    pub fn new(history: H, destination: Option<Destination>, rules: &Rules) -> anyhow::Result<Self> {
        Ok(Analyzer {
            history,
            destination,
            filter: PathFilter::new(&rules.filter)?,
            deltas: DeltaAnalyzer::new()?,
            classifier: ChangeClassifier::new(rules)?,
            mapper: PathMapper::new(&rules.mapping),
            statuses: StatusFilter::default(),
            jobs: DEFAULT_JOBS,
        })
    }

    pub fn with_status_filter(mut self, statuses: StatusFilter) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn is_path_relevant(&self, path: &Path) -> bool {
        self.filter.is_path_relevant(path)
    }

    pub fn decide(&self, path: &Path) -> PathDecision {
        self.filter.decide(path)
    }

    pub fn mapping(&self, path: &Path) -> DestinationMapping {
        match &self.destination {
            Some(destination) => self.mapper.map(path, destination),
            None => DestinationMapping::not_evaluated(path),
        }
    }

    /// Only a failing history listing is an error; per-commit failures are
    /// recorded on the commit's analysis
    pub async fn analyze(&self, selection: &Selection) -> anyhow::Result<Vec<CommitAnalysis>> {
        match selection {
            Selection::Commits(hashes) => Ok(futures::stream::iter(hashes)
                .map(|hash| self.analyze_hash(hash))
                .buffered(self.jobs)
                .collect()
                .await),
            Selection::Since { since, all_refs } => {
                let commits = self.history.commits_since(since, *all_refs).await?;
                tracing::info!("{} commit(s) since {since}", commits.len());

                Ok(futures::stream::iter(commits)
                    .map(|commit| self.analyze_commit(commit))
                    .buffered(self.jobs)
                    .collect()
                    .await)
            }
        }
    }

    pub async fn analyze_hash(&self, hash: &str) -> CommitAnalysis {
        match self.history.commit(hash).await {
            Ok(commit) => self.analyze_commit(commit).await,
            Err(err) => {
                tracing::warn!("unable to read commit {hash}: {err:#}");
                CommitAnalysis::failed(Commit::unresolved(hash), &err)
            }
        }
    }

    pub async fn analyze_commit(&self, commit: Commit) -> CommitAnalysis {
        let selected = commit
            .files()
            .iter()
            .filter(|change| self.statuses.admits(change.status))
            .collect::<Vec<_>>();
        tracing::debug!(
            "analysing {} of {} file(s) in {}",
            selected.len(),
            commit.files().len(),
            commit.short_id()
        );

        let results: Vec<(FileAnalysis, Vec<String>)> = futures::stream::iter(selected)
            .map(|change| self.analyze_file(&commit, change))
            .buffered(self.jobs)
            .collect()
            .await;

        let (files, errors): (Vec<_>, Vec<_>) = results.into_iter().unzip();
        let errors = errors.into_iter().flatten().collect();

        CommitAnalysis::new(commit, files, errors)
    }

    async fn analyze_file(&self, commit: &Commit, change: &FileChange) -> (FileAnalysis, Vec<String>) {
        let path = change.path.as_path();
        let category = PortCategory::categorize(path);
        let decision = self.filter.decide(path);

        if !decision.is_relevant() {
            let verdict = RelevanceVerdict::rejected_by_path(&decision);
            return (Self::undiffed(change, verdict, category), Vec::new());
        }
        if !self.classifier.is_origin_source(path) {
            let extension = path.extension().and_then(|extension| extension.to_str());
            let verdict =
                RelevanceVerdict::foreign_extension(extension, self.classifier.origin_extension());
            return (Self::undiffed(change, verdict, category), Vec::new());
        }

        let mut errors = Vec::new();
        let diff = match self.history.diff(commit.id(), path).await {
            Ok(diff) => diff,
            Err(err) => {
                tracing::warn!("no diff for {} in {}: {err:#}", path.display(), commit.short_id());
                errors.push(format!("{}: {err:#}", path.display()));
                Default::default()
            }
        };

        let report = self.deltas.analyze(&diff);
        let verdict = self.classifier.classify(&diff, &report);
        let mapping = self.mapping(path);
        let implementation = self.implementation(&mapping, &report.deltas, &mut errors);
        let complexity = if verdict.relevant {
            self.complexity(commit, change, &mut errors).await
        } else {
            None
        };

        let analysis = FileAnalysis {
            change: change.clone(),
            recommendation: PortRecommendation::recommend(&verdict),
            verdict,
            symbols: report.deltas,
            mapping,
            implementation,
            category,
            complexity,
        };
        (analysis, errors)
    }

    fn undiffed(change: &FileChange, verdict: RelevanceVerdict, category: PortCategory) -> FileAnalysis {
        FileAnalysis {
            change: change.clone(),
            recommendation: PortRecommendation::recommend(&verdict),
            verdict,
            symbols: Vec::new(),
            mapping: DestinationMapping::not_evaluated(&change.path),
            implementation: ImplementationStatus::not_checked(),
            category,
            complexity: None,
        }
    }

    fn implementation(
        &self,
        mapping: &DestinationMapping,
        deltas: &[SymbolDelta],
        errors: &mut Vec<String>,
    ) -> ImplementationStatus {
        let Some(destination) = &self.destination else {
            return ImplementationStatus::absent(deltas, NO_DESTINATION_NOTE);
        };
        let Some(target) = &mapping.destination else {
            return ImplementationStatus::absent(deltas, NO_DESTINATION_FILE_NOTE);
        };

        let text = destination.read_text(target).unwrap_or_else(|err| {
            tracing::warn!("{err:#}");
            errors.push(format!("{err:#}"));
            String::new()
        });

        match ImplementationChecker::check(&text, deltas) {
            Ok(status) => status,
            Err(err) => {
                errors.push(format!("{}: {err:#}", target.display()));
                ImplementationStatus::absent(deltas, "destination check failed")
            }
        }
    }

    async fn complexity(
        &self,
        commit: &Commit,
        change: &FileChange,
        errors: &mut Vec<String>,
    ) -> Option<Complexity> {
        if !matches!(change.status, FileStatus::Added | FileStatus::Modified) {
            return None;
        }

        match self.history.file_at(commit.id(), &change.path).await {
            Ok(content) => content.map(|content| Complexity::from_line_count(content.lines().count())),
            Err(err) => {
                errors.push(format!("{}: {err:#}", change.path.display()));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::history::memory::MemoryHistory;
    use crate::artifacts::analysis::suggestion::suggest;
    use crate::artifacts::classify::classifier::ChangeType;
    use crate::artifacts::history::commit::Author;
    use crate::artifacts::symbols::symbol::SymbolKind;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::path::PathBuf;

    const WIDGET_PATH: &str = "Sources/ReachuCore/Widget.swift";
    const WIDGET_DIFF: &str = "\
diff --git a/Sources/ReachuCore/Widget.swift b/Sources/ReachuCore/Widget.swift
new file mode 100644
--- /dev/null
+++ b/Sources/ReachuCore/Widget.swift
@@ -0,0 +1,5 @@
+struct Widget {
+    let id: String
+    var title: String
+    var count: Int
+}
";

    fn commit(id: &str, files: &[(&str, FileStatus)]) -> Commit {
        let date = chrono::DateTime::parse_from_rfc3339("2024-05-15T10:00:00+02:00").unwrap();
        Commit::new(
            id.to_string(),
            Author::new("Ada".into(), "ada@example.com".into()),
            date,
            format!("change {id}"),
            String::new(),
            files
                .iter()
                .map(|(path, status)| FileChange::new(PathBuf::from(path), *status, None))
                .collect(),
        )
    }

    fn refactor_diff() -> String {
        let mut diff = String::from("@@ -1,80 +1,10 @@\n");
        for i in 0..80 {
            diff.push_str(&format!("-    total -= {i}\n"));
        }
        for i in 0..10 {
            diff.push_str(&format!("+    value += {i}\n"));
        }
        diff
    }

    #[fixture]
    fn destination_dir() -> assert_fs::TempDir {
        assert_fs::TempDir::new().unwrap()
    }

    fn analyzer(history: MemoryHistory, destination: &assert_fs::TempDir) -> Analyzer<MemoryHistory> {
        Analyzer::new(
            history,
            Some(Destination::new(destination.path().into())),
            &Rules::default(),
        )
        .unwrap()
    }

    fn widget_history() -> MemoryHistory {
        MemoryHistory::default()
            .with_commit(commit("aaaa1111", &[(WIDGET_PATH, FileStatus::Added)]))
            .with_diff("aaaa1111", WIDGET_PATH, WIDGET_DIFF)
    }

    // ========== Scenario Tests ==========

    #[rstest]
    #[tokio::test]
    async fn excluded_test_files_make_an_irrelevant_commit(destination_dir: assert_fs::TempDir) {
        let history = MemoryHistory::default().with_commit(commit(
            "bbbb2222",
            &[("Tests/ReachuCoreTests/CartTests.swift", FileStatus::Modified)],
        ));

        let analysis = analyzer(history, &destination_dir)
            .analyze_hash("bbbb2222")
            .await;

        assert!(!analysis.relevant);
        assert!(!analysis.files[0].verdict.path_relevant);
        assert!(analysis.reason.contains("(^|/)Tests/"), "{}", analysis.reason);
    }

    #[rstest]
    #[tokio::test]
    async fn new_type_without_destination_file_needs_implementation(
        destination_dir: assert_fs::TempDir,
    ) {
        let analysis = analyzer(widget_history(), &destination_dir)
            .analyze_hash("aaaa1111")
            .await;
        let file = &analysis.files[0];

        assert_eq!(file.verdict.change_type, Some(ChangeType::ModelAdded));
        assert!(file.implementation.needs_implementation);
        assert_eq!(
            file.implementation
                .missing
                .iter()
                .map(|delta| (delta.kind(), delta.name()))
                .collect::<Vec<_>>(),
            vec![
                (SymbolKind::Type, "Widget"),
                (SymbolKind::Property, "id"),
                (SymbolKind::Property, "title"),
                (SymbolKind::Property, "count"),
            ]
        );
        assert_eq!(file.implementation.note.as_deref(), Some(NO_DESTINATION_FILE_NOTE));
        assert!(analysis.relevant);
    }

    #[rstest]
    #[tokio::test]
    async fn existing_destination_members_are_not_missing(destination_dir: assert_fs::TempDir) {
        destination_dir
            .child("library/io/reachu/ReachuCore/Widget.kt")
            .write_str("data class Widget(\n    val id: String,\n    var title: String,\n    var count: Int,\n)\n")
            .unwrap();

        let analysis = analyzer(widget_history(), &destination_dir)
            .analyze_hash("aaaa1111")
            .await;
        let file = &analysis.files[0];

        assert!(file.verdict.path_relevant);
        assert!(file.verdict.relevant);
        assert!(file.implementation.missing.is_empty());
        assert!(!file.implementation.needs_implementation);
        assert!(!analysis.relevant);
    }

    #[rstest]
    #[tokio::test]
    async fn large_removal_is_an_irrelevant_refactor(destination_dir: assert_fs::TempDir) {
        let path = "Sources/ReachuCore/Cart/Totals.swift";
        let history = MemoryHistory::default()
            .with_commit(commit("cccc3333", &[(path, FileStatus::Modified)]))
            .with_diff("cccc3333", path, &refactor_diff());

        let analysis = analyzer(history, &destination_dir)
            .analyze_hash("cccc3333")
            .await;
        let verdict = &analysis.files[0].verdict;

        assert_eq!(verdict.change_type, Some(ChangeType::Refactor));
        assert!(!verdict.relevant);
        assert!(!analysis.relevant);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_commit_is_an_empty_result(destination_dir: assert_fs::TempDir) {
        let analysis = analyzer(widget_history(), &destination_dir)
            .analyze_hash("ffff0000")
            .await;

        assert!(!analysis.commit.is_resolved());
        assert!(analysis.files.is_empty());
        assert!(analysis.errors.is_empty());
        assert!(!analysis.relevant);
    }

    // ========== Aggregation Tests ==========

    #[rstest]
    #[tokio::test]
    async fn analysis_is_deterministic(destination_dir: assert_fs::TempDir) {
        let analyzer = analyzer(widget_history(), &destination_dir);
        let selection = Selection::Commits(vec!["aaaa1111".into(), "nothing".into()]);

        let first = serde_json::to_string(&analyzer.analyze(&selection).await.unwrap()).unwrap();
        let second = serde_json::to_string(&analyzer.analyze(&selection).await.unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn results_keep_input_order(destination_dir: assert_fs::TempDir) {
        let history = widget_history()
            .with_commit(commit("dddd4444", &[("README.md", FileStatus::Modified)]))
            .with_commit(commit("eeee5555", &[("Package.resolved", FileStatus::Modified)]));

        let analyses = analyzer(history, &destination_dir)
            .with_jobs(3)
            .analyze(&Selection::Since {
                since: SinceExpr::PassThrough("a while".into()),
                all_refs: false,
            })
            .await
            .unwrap();

        let ids: Vec<_> = analyses.iter().map(|a| a.commit.id()).collect();
        assert_eq!(ids, vec!["aaaa1111", "dddd4444", "eeee5555"]);
    }

    #[rstest]
    #[tokio::test]
    async fn commit_relevance_requires_a_relevant_file_needing_implementation(
        destination_dir: assert_fs::TempDir,
    ) {
        let history = widget_history()
            .with_commit(commit(
                "ffff6666",
                &[(WIDGET_PATH, FileStatus::Modified), ("Demo/App.swift", FileStatus::Added)],
            ))
            .with_diff("ffff6666", WIDGET_PATH, WIDGET_DIFF);
        let analyzer = analyzer(history, &destination_dir);

        let analyses = analyzer
            .analyze(&Selection::Commits(vec!["aaaa1111".into(), "ffff6666".into()]))
            .await
            .unwrap();

        for analysis in &analyses {
            let expected = analysis
                .files
                .iter()
                .any(|file| file.verdict.relevant && file.implementation.needs_implementation);
            assert_eq!(analysis.relevant, expected);
        }
    }

    #[rstest]
    #[tokio::test]
    async fn status_filter_skips_files(destination_dir: assert_fs::TempDir) {
        let analysis = analyzer(widget_history(), &destination_dir)
            .with_status_filter(StatusFilter::MODIFIED)
            .analyze_hash("aaaa1111")
            .await;

        assert!(analysis.files.is_empty());
        assert!(!analysis.relevant);
    }

    #[rstest]
    #[tokio::test]
    async fn non_origin_extension_is_flagged_not_dropped(destination_dir: assert_fs::TempDir) {
        let history = MemoryHistory::default().with_commit(commit(
            "abab7777",
            &[("Sources/ReachuUI/Resources/logo.png", FileStatus::Added)],
        ));

        let analysis = analyzer(history, &destination_dir)
            .analyze_hash("abab7777")
            .await;

        assert_eq!(analysis.files.len(), 1);
        assert!(analysis.files[0].verdict.path_relevant);
        assert!(analysis.files[0].verdict.reason.contains("extension 'png'"));
    }

    #[rstest]
    #[tokio::test]
    async fn diff_failure_is_recorded_and_degrades_to_empty(destination_dir: assert_fs::TempDir) {
        let history = widget_history().with_broken_diffs("aaaa1111");

        let analysis = analyzer(history, &destination_dir)
            .analyze_hash("aaaa1111")
            .await;

        assert_eq!(analysis.errors.len(), 1);
        assert!(analysis.errors[0].contains("diff backend unavailable"));
        assert!(analysis.files[0].symbols.is_empty());
        assert!(!analysis.relevant);
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_commit_does_not_stop_the_batch(destination_dir: assert_fs::TempDir) {
        let history = widget_history()
            .with_commit(commit("cccc3333", &[(WIDGET_PATH, FileStatus::Modified)]))
            .with_diff("cccc3333", WIDGET_PATH, WIDGET_DIFF)
            .with_unreachable_commit("bbbb2222");

        let analyses = analyzer(history, &destination_dir)
            .analyze(&Selection::Commits(vec![
                "aaaa1111".into(),
                "bbbb2222".into(),
                "cccc3333".into(),
            ]))
            .await
            .unwrap();

        assert_eq!(analyses.len(), 3);
        assert_eq!(analyses[1].commit.id(), "bbbb2222");
        assert_eq!(analyses[1].reason, "analysis failed");
        assert!(analyses[1].errors[0].contains("timed out"));
        assert!(!analyses[1].relevant);
        for index in [0, 2] {
            assert!(analyses[index].errors.is_empty());
            assert!(analyses[index].relevant);
        }
    }

    #[rstest]
    #[case("Sources/ReachuCore/Widget.swift", true)]
    #[case("Sources/ReachuCore/Tests/WidgetTests.swift", false)]
    #[case("Package.swift", false)]
    fn path_relevance_without_history(
        destination_dir: assert_fs::TempDir,
        #[case] path: &str,
        #[case] expected: bool,
    ) {
        let analyzer = analyzer(MemoryHistory::default(), &destination_dir);

        assert_eq!(analyzer.is_path_relevant(Path::new(path)), expected);
    }

    #[tokio::test]
    async fn missing_destination_codebase_marks_symbols_missing() {
        let analyzer = Analyzer::new(widget_history(), None, &Rules::default()).unwrap();

        let analysis = analyzer.analyze_hash("aaaa1111").await;
        let file = &analysis.files[0];

        assert_eq!(file.mapping.rule, crate::artifacts::mapping::path_mapper::MappingRule::NotEvaluated);
        assert_eq!(file.implementation.note.as_deref(), Some(NO_DESTINATION_NOTE));
        assert!(analysis.relevant);
    }

    // ========== Suggestion Tests ==========

    #[rstest]
    #[tokio::test]
    async fn suggestions_dedupe_files_across_commits(destination_dir: assert_fs::TempDir) {
        let history = MemoryHistory::default()
            .with_commit(commit("1111aaaa", &[(WIDGET_PATH, FileStatus::Modified)]))
            .with_commit(commit("2222bbbb", &[(WIDGET_PATH, FileStatus::Added)]))
            .with_diff("1111aaaa", WIDGET_PATH, WIDGET_DIFF)
            .with_diff("2222bbbb", WIDGET_PATH, WIDGET_DIFF)
            .with_file("1111aaaa", WIDGET_PATH, &"let x = 1\n".repeat(600));

        let analyses = analyzer(history, &destination_dir)
            .analyze(&Selection::Since {
                since: SinceExpr::PassThrough("whenever".into()),
                all_refs: true,
            })
            .await
            .unwrap();
        let suggestions = suggest(&analyses);

        assert_eq!(suggestions.len(), 1);
        let suggestion = &suggestions[0];
        assert_eq!(suggestion.title, "Update Widget implementation in Kotlin");
        assert_eq!(suggestion.complexity, Complexity::High);
        assert_eq!(suggestion.estimate, "5-8 h");
        assert_eq!(suggestion.tags, vec!["Kotlin", "Priority"]);
        assert_eq!(suggestion.related_commits, vec!["1111aaaa", "2222bbbb"]);
    }
}
