//! Rule tables shared by every stage of the analysis
//!
//! The tables are plain data: built from the defaults in [`defaults`] or read from
//! a YAML file, then handed to each component's constructor. Sections missing
//! from a file fall back to the defaults.
//!
//! ```yaml
//! origin_extension: swift
//! filter:
//!   include: ["Sources/ReachuCore/", "Sources/ReachuUI/"]
//! mapping:
//!   prefixes:
//!     - origin: Sources/
//!       destination: library/io/reachu/
//!   extensions:
//!     swift: kt
//! ```

pub mod defaults;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub origin_extension: String,
    pub filter: FilterRules,
    pub keywords: KeywordRules,
    pub markers: ChangeMarkers,
    pub mapping: MappingRules,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            origin_extension: defaults::ORIGIN_EXTENSION.to_string(),
            filter: FilterRules::default(),
            keywords: KeywordRules::default(),
            markers: ChangeMarkers::default(),
            mapping: MappingRules::default(),
        }
    }
}

impl Rules {
    /// Load rules from a YAML file, or the defaults when no file is given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Rules::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rules file {}", path.display()))?;
        let rules = Self::from_yaml(&content)
            .with_context(|| format!("invalid rules file {}", path.display()))?;

        tracing::info!("loaded rules from {}", path.display());
        Ok(rules)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let rules: Rules = serde_yaml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.origin_extension.trim().is_empty() {
            anyhow::bail!("origin_extension must not be empty");
        }
        if let Some(prefix) = self.filter.include.iter().find(|prefix| {
            prefix
                .trim()
                .split('/')
                .all(|part| part.is_empty() || part == ".")
        }) {
            anyhow::bail!("filter.include entry '{prefix}' names no directory");
        }
        if self
            .mapping
            .prefixes
            .iter()
            .any(|rule| rule.origin.trim().is_empty())
        {
            anyhow::bail!("mapping.prefixes entries need a non-empty origin prefix");
        }

        Ok(())
    }
}

/// Path-level relevance: exclusions are regexes searched anywhere in the path,
/// inclusions are component-wise path prefixes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRules {
    pub exclude: Vec<String>,
    pub include: Vec<String>,
}

impl Default for FilterRules {
    fn default() -> Self {
        FilterRules {
            exclude: owned(&defaults::EXCLUDE_PATTERNS),
            include: owned(&defaults::INCLUDE_PREFIXES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRules {
    pub portable: Vec<String>,
    pub presentation: Vec<String>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        KeywordRules {
            portable: owned(&defaults::PORTABLE_KEYWORDS),
            presentation: owned(&defaults::PRESENTATION_KEYWORDS),
        }
    }
}

/// Tokens that drive the change-type precedence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeMarkers {
    pub exported: Vec<String>,
    pub function: Vec<String>,
    pub types: Vec<String>,
}

impl Default for ChangeMarkers {
    fn default() -> Self {
        ChangeMarkers {
            exported: owned(&defaults::EXPORTED_MARKERS),
            function: owned(&defaults::FUNCTION_MARKERS),
            types: owned(&defaults::TYPE_MARKERS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingRules {
    pub prefixes: Vec<PrefixRule>,
    pub extensions: BTreeMap<String, String>,
    pub search_depth: usize,
}

impl Default for MappingRules {
    fn default() -> Self {
        MappingRules {
            prefixes: defaults::MAPPING_PREFIXES
                .iter()
                .map(|(origin, destination)| PrefixRule {
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                })
                .collect(),
            extensions: defaults::EXTENSION_MAP
                .entries()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            search_depth: defaults::SEARCH_DEPTH,
        }
    }
}
