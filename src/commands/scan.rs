use crate::OutputFormat;
use crate::areas::analyzer::Selection;
use crate::areas::history::History;
use crate::areas::session::Session;
use crate::artifacts::analysis::commit_analysis::CommitAnalysis;
use crate::artifacts::analysis::suggestion::{TaskSuggestion, suggest};
use crate::artifacts::history::since::SinceExpr;
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub since: SinceExpr,
    pub all_refs: bool,
    pub relevant_only: bool,
}

#[derive(Debug, Serialize)]
struct ScanReport<'a> {
    since: &'a SinceExpr,
    commits: Vec<CommitAnalysis>,
    suggestions: Vec<TaskSuggestion>,
    errors: Vec<String>,
}

impl<H: History> Session<H> {
    pub async fn scan(&self, options: &ScanOptions) -> anyhow::Result<()> {
        let selection = Selection::Since {
            since: options.since.clone(),
            all_refs: options.all_refs,
        };

        let mut errors = Vec::new();
        let mut commits = match self.analyzer().analyze(&selection).await {
            Ok(commits) => commits,
            Err(err) => {
                tracing::error!("history scan failed: {err:#}");
                errors.push(format!("{err:#}"));
                Vec::new()
            }
        };
        let suggestions = suggest(&commits);
        if options.relevant_only {
            commits.retain(|analysis| analysis.relevant);
        }

        match self.format() {
            OutputFormat::Json => self.write_json(&ScanReport {
                since: &options.since,
                commits,
                suggestions,
                errors,
            }),
            OutputFormat::Text => {
                for error in &errors {
                    writeln!(self.writer(), "{} {error}", "error:".red().bold())?;
                }
                if commits.is_empty() {
                    writeln!(self.writer(), "No commits to report since {}", options.since)?;
                } else {
                    self.show_analyses(&commits)?;
                }
                self.show_suggestions(&suggestions)
            }
        }
    }
}
