use crate::areas::history::History;
use crate::areas::session::Session;
use crate::artifacts::analysis::commit_analysis::{CommitAnalysis, FileAnalysis};
use crate::artifacts::analysis::suggestion::TaskSuggestion;
use crate::artifacts::mapping::path_mapper::{DestinationMapping, MappingRule};
use crate::artifacts::symbols::symbol::SymbolDelta;
use colored::Colorize;

impl<H: History> Session<H> {
    /// `git log` medium-style block per commit, followed by its files
    pub fn show_analyses(&self, analyses: &[CommitAnalysis]) -> anyhow::Result<()> {
        for (index, analysis) in analyses.iter().enumerate() {
            if index > 0 {
                writeln!(self.writer())?;
            }
            self.show_analysis(analysis)?;
        }

        Ok(())
    }

    fn show_analysis(&self, analysis: &CommitAnalysis) -> anyhow::Result<()> {
        let commit = &analysis.commit;
        let verdict = if analysis.relevant {
            "needs porting".green().bold()
        } else {
            "nothing to port".dimmed()
        };

        if !commit.is_resolved() {
            writeln!(
                self.writer(),
                "{} {} {}",
                "commit".yellow(),
                commit.id().yellow(),
                "(not found)".red()
            )?;
        } else {
            writeln!(
                self.writer(),
                "{} ({verdict})",
                format!("commit {}", commit.id()).yellow()
            )?;
            writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
            writeln!(self.writer(), "Date:   {}", commit.readable_date())?;
            writeln!(self.writer())?;
            for line in commit.subject().lines().chain(commit.body().trim_end().lines()) {
                writeln!(self.writer(), "    {line}")?;
            }
            writeln!(self.writer())?;
        }

        for file in &analysis.files {
            self.show_file(file)?;
        }
        for error in &analysis.errors {
            writeln!(self.writer(), "{} {error}", "error:".red().bold())?;
        }
        writeln!(self.writer(), "Verdict: {}", analysis.reason)?;

        Ok(())
    }

    fn show_file(&self, file: &FileAnalysis) -> anyhow::Result<()> {
        let change_type = file
            .verdict
            .change_type
            .map(|change_type| change_type.to_string())
            .unwrap_or_else(|| "-".to_string());
        let marker = if file.needs_porting() {
            "port".green().bold()
        } else if file.verdict.relevant {
            "done".cyan()
        } else {
            "skip".dimmed()
        };

        writeln!(
            self.writer(),
            "  {} {} [{change_type}] {marker}",
            file.change.status,
            file.change.path.display()
        )?;
        writeln!(self.writer(), "      {}", file.verdict.reason.dimmed())?;

        if file.verdict.relevant {
            writeln!(self.writer(), "      {}", Self::describe_mapping(&file.mapping))?;
            writeln!(
                self.writer(),
                "      {}: {}, {} ({} {})",
                "recommendation".bold(),
                if file.recommendation.create_task {
                    "create task"
                } else {
                    "no task"
                },
                file.recommendation.reason,
                file.category,
                file.complexity
                    .map(|complexity| complexity.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            )?;
        }
        if let Some(note) = &file.implementation.note {
            writeln!(self.writer(), "      {}", note.yellow())?;
        }
        for delta in &file.implementation.missing {
            self.show_symbol(delta, false)?;
        }
        for delta in &file.implementation.implemented {
            self.show_symbol(delta, true)?;
        }

        Ok(())
    }

    fn show_symbol(&self, delta: &SymbolDelta, implemented: bool) -> anyhow::Result<()> {
        let state = if implemented {
            "implemented".green()
        } else {
            "missing".red()
        };
        writeln!(self.writer(), "        {state} {delta}")?;
        Ok(())
    }

    pub(crate) fn describe_mapping(mapping: &DestinationMapping) -> String {
        let target = mapping
            .destination
            .as_ref()
            .map(|path| path.display().to_string());

        match (&mapping.rule, target) {
            (MappingRule::Direct { prefix }, Some(target)) => format!("-> {target} (via {prefix})"),
            (MappingRule::Fallback { prefix }, Some(target)) => {
                format!("-> {target} (searched under the {prefix} mapping)")
            }
            (MappingRule::NotFound { prefix }, _) => {
                format!("-> no destination file (via {prefix})")
            }
            (MappingRule::NoRule, _) => "-> no mapping rule".to_string(),
            (MappingRule::NotEvaluated, _) => "-> destination not checked".to_string(),
            (MappingRule::Direct { .. } | MappingRule::Fallback { .. }, None) => {
                "-> no destination file".to_string()
            }
        }
    }

    pub fn show_suggestions(&self, suggestions: &[TaskSuggestion]) -> anyhow::Result<()> {
        writeln!(self.writer())?;
        writeln!(
            self.writer(),
            "{}",
            format!("Suggested tasks ({})", suggestions.len()).bold()
        )?;

        for suggestion in suggestions {
            writeln!(
                self.writer(),
                "  {} {} [{}] {} ({})",
                "*".green(),
                suggestion.title,
                suggestion.category,
                suggestion.estimate,
                suggestion.tags.join(", ")
            )?;
            writeln!(
                self.writer(),
                "      {} {}",
                suggestion.path.display(),
                suggestion.related_commits.join(" ").dimmed()
            )?;
        }

        Ok(())
    }
}
