use crate::OutputFormat;
use crate::areas::analyzer::Selection;
use crate::areas::history::History;
use crate::areas::session::Session;

impl<H: History> Session<H> {
    pub async fn analyze(&self, commits: &[String]) -> anyhow::Result<()> {
        let analyses = self
            .analyzer()
            .analyze(&Selection::Commits(commits.to_vec()))
            .await?;

        match self.format() {
            OutputFormat::Json => self.write_json(&analyses),
            OutputFormat::Text => self.show_analyses(&analyses),
        }
    }
}
