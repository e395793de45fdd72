use derive_new::new;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Property,
    Type,
    Extension,
    Initializer,
}

impl SymbolKind {
    /// Origin-language tokens that mark a line as declaring this kind
    pub fn declaration_tokens(&self) -> &'static [&'static str] {
        match self {
            SymbolKind::Function => &["func"],
            SymbolKind::Property => &["var", "let"],
            SymbolKind::Type => &["class", "struct", "enum"],
            SymbolKind::Extension => &["extension"],
            SymbolKind::Initializer => &["init"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Property => "property",
            SymbolKind::Type => "type",
            SymbolKind::Extension => "extension",
            SymbolKind::Initializer => "initializer",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SymbolDetail {
    Plain,
    Signature {
        params: Vec<String>,
        return_type: Option<String>,
    },
    Property {
        declared_type: Option<String>,
        default_value: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: String,
    pub detail: SymbolDetail,
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)?;
        match &self.detail {
            SymbolDetail::Plain => Ok(()),
            SymbolDetail::Signature {
                params,
                return_type,
            } => {
                write!(f, "({})", params.join(", "))?;
                match return_type {
                    Some(return_type) => write!(f, " -> {return_type}"),
                    None => Ok(()),
                }
            }
            SymbolDetail::Property {
                declared_type,
                default_value,
            } => {
                if let Some(declared_type) = declared_type {
                    write!(f, ": {declared_type}")?;
                }
                match default_value {
                    Some(default_value) => write!(f, " = {default_value}"),
                    None => Ok(()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    Added,
    Modified,
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mutation::Added => write!(f, "added"),
            Mutation::Modified => write!(f, "modified"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, new)]
pub struct SymbolDelta {
    #[serde(flatten)]
    pub symbol: Symbol,
    pub mutation: Mutation,
}

impl SymbolDelta {
    pub fn kind(&self) -> SymbolKind {
        self.symbol.kind
    }

    pub fn name(&self) -> &str {
        &self.symbol.name
    }
}

impl std::fmt::Display for SymbolDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.mutation, self.symbol)
    }
}
