use crate::artifacts::diff::diff_text::DiffText;
use crate::artifacts::symbols::symbol::{Mutation, Symbol, SymbolDelta, SymbolDetail, SymbolKind};
use crate::artifacts::symbols::{
    EXTENSION_REGEX, FUNCTION_REGEX, INITIALIZER_REGEX, MAX_DEFAULT_LITERAL_LENGTH,
    MAX_SIGNATURE_CONTINUATION_LINES, PROPERTY_REGEX, SELF_ASSIGNMENT_REGEX, TYPE_REGEX,
    contains_word,
};
use anyhow::Context;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeltaReport {
    pub deltas: Vec<SymbolDelta>,
    pub summary: String,
}

impl DeltaReport {
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DeltaAnalyzer {
    function: Regex,
    property: Regex,
    type_declaration: Regex,
    extension: Regex,
    initializer: Regex,
    self_assignment: Regex,
}

impl DeltaAnalyzer {
    pub fn new() -> anyhow::Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).with_context(|| format!("invalid declaration pattern: {pattern}"))
        };

        Ok(Self {
            function: compile(FUNCTION_REGEX)?,
            property: compile(PROPERTY_REGEX)?,
            type_declaration: compile(TYPE_REGEX)?,
            extension: compile(EXTENSION_REGEX)?,
            initializer: compile(INITIALIZER_REGEX)?,
            self_assignment: compile(SELF_ASSIGNMENT_REGEX)?,
        })
    }

    pub fn analyze(&self, diff: &DiffText) -> DeltaReport {
        let added = diff.added();
        let removed = diff.removed();
        let mut deltas: Vec<SymbolDelta> = Vec::new();

        for (index, line) in added.iter().enumerate() {
            let Some(symbol) = self.declaration(line, &added[index + 1..]) else {
                continue;
            };
            if deltas
                .iter()
                .any(|delta| delta.kind() == symbol.kind && delta.name() == symbol.name)
            {
                continue;
            }

            let mutation = Self::mutation_of(&symbol, removed);
            deltas.push(SymbolDelta::new(symbol, mutation));
        }

        for line in added {
            let Some(captures) = self.self_assignment.captures(line) else {
                continue;
            };
            let name = &captures[1];
            if deltas.iter().any(|delta| delta.name() == name) {
                continue;
            }

            deltas.push(SymbolDelta::new(
                Symbol::new(SymbolKind::Property, name.to_string(), SymbolDetail::Plain),
                Mutation::Modified,
            ));
        }

        let summary = Self::summarize(diff, &deltas);
        DeltaReport { deltas, summary }
    }

    /// First declaration pattern matching `line`, in priority order
    fn declaration(&self, line: &str, following: &[String]) -> Option<Symbol> {
        if let Some(captures) = self.function.captures(line) {
            let (params, return_type) = parse_signature(&captures[2], following);
            return Some(Symbol::new(
                SymbolKind::Function,
                captures[1].to_string(),
                SymbolDetail::Signature {
                    params,
                    return_type,
                },
            ));
        }

        if let Some(captures) = self.property.captures(line) {
            let (declared_type, default_value) = parse_property(&captures[2]);
            return Some(Symbol::new(
                SymbolKind::Property,
                captures[1].to_string(),
                SymbolDetail::Property {
                    declared_type,
                    default_value,
                },
            ));
        }

        if let Some(captures) = self.type_declaration.captures(line) {
            return Some(Symbol::new(
                SymbolKind::Type,
                captures[1].to_string(),
                SymbolDetail::Plain,
            ));
        }

        if let Some(captures) = self.extension.captures(line) {
            return Some(Symbol::new(
                SymbolKind::Extension,
                captures[1].to_string(),
                SymbolDetail::Plain,
            ));
        }

        if let Some(captures) = self.initializer.captures(line) {
            let (params, _) = parse_signature(&captures[1], following);
            return Some(Symbol::new(
                SymbolKind::Initializer,
                "init".to_string(),
                SymbolDetail::Signature {
                    params,
                    return_type: None,
                },
            ));
        }

        None
    }

    fn mutation_of(symbol: &Symbol, removed: &[String]) -> Mutation {
        let tokens = symbol.kind.declaration_tokens();
        let redeclared = removed.iter().any(|line| {
            contains_word(line, &symbol.name) && tokens.iter().any(|token| contains_word(line, token))
        });

        if redeclared {
            Mutation::Modified
        } else {
            Mutation::Added
        }
    }

    fn summarize(diff: &DiffText, deltas: &[SymbolDelta]) -> String {
        let counts = format!("+{} -{}", diff.added().len(), diff.removed().len());
        if deltas.is_empty() {
            return format!("{counts} modification");
        }

        let entries = deltas
            .iter()
            .map(|delta| format!("{} {} {}", delta.mutation, delta.kind(), delta.name()))
            .collect::<Vec<_>>()
            .join("; ");
        format!("{counts} {entries}")
    }
}

/// Parameter names and return type from the text following an opening `(`
fn parse_signature(rest: &str, following: &[String]) -> (Vec<String>, Option<String>) {
    let mut text = rest.to_string();
    let mut close = closing_paren(&text);

    for line in following.iter().take(MAX_SIGNATURE_CONTINUATION_LINES) {
        if close.is_some() {
            break;
        }
        text.push(' ');
        text.push_str(line);
        close = closing_paren(&text);
    }

    let (params_text, after) = match close {
        Some(index) => (&text[..index], Some(&text[index + 1..])),
        None => (text.as_str(), None),
    };

    let params = split_top_level(params_text)
        .into_iter()
        .filter_map(parameter_name)
        .collect();
    let return_type = after.and_then(return_type);

    (params, return_type)
}

/// Index of the `)` closing an already opened parameter list
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (index, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested in brackets, parentheses or generics
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut previous = '\0';

    for (index, c) in text.char_indices() {
        match c {
            '(' | '[' | '<' => depth += 1,
            ')' | ']' => depth -= 1,
            '>' if previous != '-' => depth -= 1,
            ',' if depth <= 0 => {
                parts.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
        previous = c;
    }
    parts.push(&text[start..]);

    parts
}

fn parameter_name(parameter: &str) -> Option<String> {
    let (labels, _) = parameter.split_once(':')?;
    let name = labels.split_whitespace().last()?;
    (name != "_").then(|| name.to_string())
}

fn return_type(after: &str) -> Option<String> {
    let (_, declared) = after.split_once("->")?;
    let declared = declared.split('{').next().unwrap_or_default();
    let declared = declared.split(" where ").next().unwrap_or_default().trim();

    (!declared.is_empty()).then(|| declared.to_string())
}

/// Declared type and short default literal from the text after a property name
fn parse_property(rest: &str) -> (Option<String>, Option<String>) {
    let rest = rest.split("//").next().unwrap_or_default().trim();

    let declared_type = rest.strip_prefix(':').and_then(|typed| {
        let end = typed.find(['=', '{']).unwrap_or(typed.len());
        let declared = typed[..end].trim();
        (!declared.is_empty()).then(|| declared.to_string())
    });

    let default_value = match (rest.find('='), rest.find('{')) {
        (Some(assign), Some(brace)) if brace < assign => None,
        (Some(assign), _) => {
            let literal = rest[assign + 1..].trim();
            (!literal.is_empty() && literal.chars().count() <= MAX_DEFAULT_LITERAL_LENGTH)
                .then(|| literal.to_string())
        }
        (None, _) => None,
    };

    (declared_type, default_value)
}
