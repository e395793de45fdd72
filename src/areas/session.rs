use crate::OutputFormat;
use crate::areas::analyzer::Analyzer;
use crate::areas::history::History;
use crate::artifacts::rules::Rules;
use std::cell::{RefCell, RefMut};

/// One CLI invocation: the configured pipeline plus where its report goes
pub struct Session<H: History> {
    analyzer: Analyzer<H>,
    rules: Rules,
    format: OutputFormat,
    writer: RefCell<Box<dyn std::io::Write>>,
}

impl<H: History> Session<H> {
    pub fn new(
        analyzer: Analyzer<H>,
        rules: Rules,
        format: OutputFormat,
        writer: Box<dyn std::io::Write>,
    ) -> Self {
        Session {
            analyzer,
            rules,
            format,
            writer: RefCell::new(writer),
        }
    }

    pub fn analyzer(&self) -> &Analyzer<H> {
        &self.analyzer
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn write_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(self.writer(), "{json}")?;
        Ok(())
    }
}
