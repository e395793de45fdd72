use crate::OutputFormat;
use crate::areas::history::History;
use crate::areas::session::Session;
use crate::artifacts::filter::path_filter::PathDecision;
use crate::artifacts::mapping::path_mapper::DestinationMapping;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct PathReport {
    path: PathBuf,
    relevant: bool,
    #[serde(flatten)]
    decision: PathDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    mapping: Option<DestinationMapping>,
}

impl<H: History> Session<H> {
    /// Filter decision and destination mapping for origin paths, no history needed
    pub fn check_paths(&self, paths: &[PathBuf]) -> anyhow::Result<()> {
        let reports = paths
            .iter()
            .map(|path| {
                let decision = self.analyzer().decide(path);
                let relevant = decision.is_relevant();
                PathReport {
                    path: path.clone(),
                    relevant,
                    mapping: relevant.then(|| self.analyzer().mapping(path)),
                    decision,
                }
            })
            .collect::<Vec<_>>();

        if self.format() == OutputFormat::Json {
            return self.write_json(&reports);
        }

        for report in &reports {
            let label = if report.relevant {
                "relevant".green()
            } else {
                "irrelevant".red()
            };
            writeln!(
                self.writer(),
                "{label} {} ({})",
                report.path.display(),
                report.decision.reason()
            )?;
            if let Some(mapping) = &report.mapping {
                writeln!(self.writer(), "    {}", Self::describe_mapping(mapping))?;
            }
        }

        Ok(())
    }
}
