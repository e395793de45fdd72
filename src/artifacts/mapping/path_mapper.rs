use crate::areas::destination::Destination;
use crate::artifacts::rules::{MappingRules, PrefixRule};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The rule that produced (or failed to produce) a destination candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum MappingRule {
    /// The translated path exists as is
    Direct { prefix: String },
    /// Found by searching the destination prefix directory for the same file name
    Fallback { prefix: String },
    /// A prefix rule applied but no destination file exists
    NotFound { prefix: String },
    /// No prefix rule covers the origin path
    NoRule,
    /// No destination codebase was given
    NotEvaluated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationMapping {
    pub origin: PathBuf,
    pub destination: Option<PathBuf>,
    #[serde(flatten)]
    pub rule: MappingRule,
}

impl DestinationMapping {
    pub fn not_evaluated(origin: &Path) -> Self {
        DestinationMapping {
            origin: origin.to_path_buf(),
            destination: None,
            rule: MappingRule::NotEvaluated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathMapper {
    prefixes: Vec<PrefixRule>,
    extensions: BTreeMap<String, String>,
    search_depth: usize,
}

impl PathMapper {
    pub fn new(rules: &MappingRules) -> Self {
        PathMapper {
            prefixes: rules.prefixes.clone(),
            extensions: rules.extensions.clone(),
            search_depth: rules.search_depth,
        }
    }

    /// Translated destination path from the first matching prefix rule
    ///
    /// Pure path arithmetic, the filesystem is not consulted.
    pub fn candidate(&self, origin: &Path) -> Option<(&PrefixRule, PathBuf)> {
        self.prefixes.iter().find_map(|rule| {
            let rest = origin.strip_prefix(Path::new(&rule.origin)).ok()?;
            if rest.as_os_str().is_empty() {
                return None;
            }

            let mut candidate = Path::new(&rule.destination).join(rest);
            let translated = candidate
                .extension()
                .and_then(|extension| extension.to_str())
                .and_then(|extension| self.extensions.get(extension))
                .cloned();
            if let Some(translated) = translated {
                candidate.set_extension(translated);
            }

            Some((rule, candidate))
        })
    }

    pub fn map(&self, origin: &Path, destination: &Destination) -> DestinationMapping {
        let mapping = |candidate: Option<PathBuf>, rule: MappingRule| DestinationMapping {
            origin: origin.to_path_buf(),
            destination: candidate,
            rule,
        };

        let Some((rule, candidate)) = self.candidate(origin) else {
            tracing::debug!("no mapping rule for {}", origin.display());
            return mapping(None, MappingRule::NoRule);
        };
        let prefix = rule.origin.clone();

        if destination.exists(&candidate) {
            return mapping(Some(candidate), MappingRule::Direct { prefix });
        }

        let Some(file_name) = candidate.file_name().and_then(|name| name.to_str()) else {
            return mapping(None, MappingRule::NotFound { prefix });
        };

        match destination.find_file(Path::new(&rule.destination), file_name, self.search_depth) {
            Some(found) => {
                tracing::debug!(
                    "{} not found, using {} instead",
                    candidate.display(),
                    found.display()
                );
                mapping(Some(found), MappingRule::Fallback { prefix })
            }
            None => mapping(None, MappingRule::NotFound { prefix }),
        }
    }
}
