use crate::artifacts::rules::FilterRules;
use anyhow::Context;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;

/// Outcome of the path-level relevance decision, with the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum PathDecision {
    Excluded { pattern: String },
    OutsideSurface,
    Included { prefix: String },
}

impl PathDecision {
    pub fn is_relevant(&self) -> bool {
        matches!(self, PathDecision::Included { .. })
    }

    pub fn reason(&self) -> String {
        match self {
            PathDecision::Excluded { pattern } => format!("excluded by pattern '{pattern}'"),
            PathDecision::OutsideSurface => "outside the portable surface".to_string(),
            PathDecision::Included { prefix } => format!("inside portable surface '{prefix}'"),
        }
    }
}

/// Closed-world filter over origin paths
///
/// Exclusions are checked first and win over everything else. A path that is not
/// excluded is relevant only when it lies under one of the configured surface
/// directories.
#[derive(Debug, Clone)]
pub struct PathFilter {
    exclusions: Vec<(String, Regex)>,
    surface: Trie<String>,
}

impl PathFilter {
    pub fn new(rules: &FilterRules) -> anyhow::Result<Self> {
        let exclusions = rules
            .exclude
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("invalid exclusion pattern: {pattern}"))
                    .map(|regex| (pattern.clone(), regex))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut surface = Trie::new();
        for prefix in &rules.include {
            surface.insert(&Self::components(prefix));
        }

        Ok(Self {
            exclusions,
            surface,
        })
    }

    pub fn is_path_relevant(&self, path: &Path) -> bool {
        self.decide(path).is_relevant()
    }

    pub fn decide(&self, path: &Path) -> PathDecision {
        let normalized = Self::normalize(path);

        if let Some((pattern, _)) = self
            .exclusions
            .iter()
            .find(|(_, regex)| regex.is_match(&normalized))
        {
            return PathDecision::Excluded {
                pattern: pattern.clone(),
            };
        }

        let components = Self::components(&normalized);
        match self.surface.matching_depth(&components) {
            Some(depth) => PathDecision::Included {
                prefix: format!("{}/", components[..depth].join("/")),
            },
            None => PathDecision::OutsideSurface,
        }
    }

    fn normalize(path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }

    fn components(path: &str) -> Vec<String> {
        path.split('/')
            .filter(|part| !part.is_empty() && *part != ".")
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trie<T: Hash + Eq + Clone> {
    is_matching: bool,
    children: HashMap<T, Trie<T>>,
}

impl<T: Hash + Eq + Clone> Trie<T> {
    pub fn new() -> Self {
        Trie {
            is_matching: false,
            children: HashMap::new(),
        }
    }

    pub fn insert(&mut self, path: &[T]) {
        let mut node = self;
        for part in path {
            node = node.children.entry(part.clone()).or_insert_with(Trie::new);
        }
        node.is_matching = true;
    }

    /// Depth of the shortest inserted prefix that `path` lies strictly below
    ///
    /// The prefix must be a proper ancestor: a path equal to an inserted prefix
    /// names the directory itself, not a file inside it.
    pub fn matching_depth(&self, path: &[T]) -> Option<usize> {
        let mut node = self;
        for (depth, part) in path.iter().enumerate() {
            if node.is_matching && depth > 0 {
                return Some(depth);
            }
            node = node.children.get(part)?;
        }
        None
    }
}

impl<T: Hash + Eq + Clone> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}
