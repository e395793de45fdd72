use anyhow::Context;
use regex::Regex;

/// Case-insensitive set of whole-token keywords
///
/// Entries equal ignoring case collapse into the first one. A keyword may contain
/// non-word characters (`@State`, `import SwiftUI`); it still has to stand alone,
/// so `@State` does not match inside `@StateObject`.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<(String, Regex)>,
}

impl KeywordSet {
    pub fn new(keywords: &[String]) -> anyhow::Result<Self> {
        let mut compiled: Vec<(String, Regex)> = Vec::new();

        for keyword in keywords {
            let keyword = keyword.trim();
            if keyword.is_empty()
                || compiled
                    .iter()
                    .any(|(existing, _)| existing.eq_ignore_ascii_case(keyword))
            {
                continue;
            }

            let pattern = format!(r"(?i)(?:^|[^\w]){}(?:[^\w]|$)", regex::escape(keyword));
            let regex = Regex::new(&pattern)
                .with_context(|| format!("invalid keyword: {keyword}"))?;
            compiled.push((keyword.to_string(), regex));
        }

        Ok(Self { keywords: compiled })
    }

    /// Keywords found in `text`, in configuration order
    pub fn matches(&self, text: &str) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(keyword, _)| keyword.clone())
            .collect()
    }

    pub fn any_match<'a>(&self, mut lines: impl Iterator<Item = &'a String>) -> bool {
        lines.any(|line| self.keywords.iter().any(|(_, regex)| regex.is_match(line)))
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
