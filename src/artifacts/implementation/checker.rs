use crate::artifacts::symbols::symbol::{SymbolDelta, SymbolKind};
use anyhow::Context;
use regex::Regex;
use serde::Serialize;

pub const NO_DESTINATION_FILE_NOTE: &str = "no destination file: full implementation required";

/// Which symbol deltas the destination already declares
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImplementationStatus {
    pub implemented: Vec<SymbolDelta>,
    pub missing: Vec<SymbolDelta>,
    pub needs_implementation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ImplementationStatus {
    /// Every symbol is missing when there is nothing to compare against
    pub fn absent(deltas: &[SymbolDelta], note: impl Into<String>) -> Self {
        ImplementationStatus {
            implemented: Vec::new(),
            missing: deltas.to_vec(),
            needs_implementation: !deltas.is_empty(),
            note: Some(note.into()),
        }
    }

    pub fn not_checked() -> Self {
        ImplementationStatus {
            implemented: Vec::new(),
            missing: Vec::new(),
            needs_implementation: false,
            note: None,
        }
    }
}

/// Destination-language declaration patterns for a symbol, all case-insensitive
pub fn destination_patterns(kind: SymbolKind, name: &str) -> Vec<String> {
    let name = regex::escape(name);
    match kind {
        SymbolKind::Property => vec![format!(r"(?i)\b(?:var|val)\s+{name}\b")],
        SymbolKind::Function => vec![format!(
            r"(?i)\bfun\s+(?:<[^>]*>\s*)?(?:[\w.]+\.)?{name}\s*\("
        )],
        SymbolKind::Type => vec![type_pattern(&name)],
        // a nested type `Outer.Inner` is declared in Kotlin as `class Inner` inside `Outer`
        SymbolKind::Extension => vec![
            format!(r"(?i)\bfun\s+(?:<[^>]*>\s*)?{name}\."),
            type_pattern(&name),
            type_pattern(&innermost(&name)),
        ],
        SymbolKind::Initializer => vec![
            r"(?i)\bconstructor\s*\(".to_string(),
            r"(?i)\binit\s*\{".to_string(),
            r"(?i)\bclass\s+\w+\s*(?:<[^>]*>)?\s*\(".to_string(),
        ],
    }
}

fn innermost(escaped_name: &str) -> String {
    escaped_name
        .rsplit(r"\.")
        .next()
        .unwrap_or(escaped_name)
        .to_string()
}

fn type_pattern(escaped_name: &str) -> String {
    format!(r"(?i)\b(?:class|interface|object|typealias)\s+{escaped_name}\b")
}

pub struct ImplementationChecker;

impl ImplementationChecker {
    pub fn check(destination_text: &str, deltas: &[SymbolDelta]) -> anyhow::Result<ImplementationStatus> {
        let mut implemented = Vec::new();
        let mut missing = Vec::new();

        for delta in deltas {
            if Self::is_declared(destination_text, delta)? {
                implemented.push(delta.clone());
            } else {
                missing.push(delta.clone());
            }
        }

        Ok(ImplementationStatus {
            needs_implementation: !missing.is_empty(),
            implemented,
            missing,
            note: None,
        })
    }

    fn is_declared(text: &str, delta: &SymbolDelta) -> anyhow::Result<bool> {
        for pattern in destination_patterns(delta.kind(), delta.name()) {
            let regex = Regex::new(&pattern)
                .with_context(|| format!("invalid destination pattern for {}", delta.symbol))?;
            if regex.is_match(text) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
