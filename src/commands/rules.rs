use crate::areas::history::History;
use crate::areas::session::Session;

impl<H: History> Session<H> {
    /// Print the effective rule tables in the rules-file format
    pub fn rules_table(&self) -> anyhow::Result<()> {
        let yaml = self.rules().to_yaml()?;
        write!(self.writer(), "{yaml}")?;
        Ok(())
    }
}
