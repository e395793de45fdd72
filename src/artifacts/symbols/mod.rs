//! Structural delta analysis over diff text
//!
//! Added lines are matched against origin-language declaration patterns, one
//! kind per line, in this order:
//! - function declarations
//! - property declarations (stored, computed and access-restricted)
//! - type declarations (class, struct, enum)
//! - extensions
//! - initializers
//!
//! A symbol is `modified` when a removed line mentions the same name next to a
//! declaration token of its kind, otherwise it is `added`.

pub mod delta;
pub mod symbol;

/// Attributes and modifiers that may precede any declaration
macro_rules! declaration_modifiers {
    () => {
        r"^(?:(?:@[A-Za-z_]\w*(?:\([^)]*\))?|public|private|fileprivate|internal|open|package|static|class|final|lazy|weak|unowned|override|mutating|nonmutating|nonisolated|dynamic|optional|required|convenience|indirect)(?:\((?:set|get)\))?\s+)*"
    };
}

pub const FUNCTION_REGEX: &str = concat!(
    declaration_modifiers!(),
    r"func\s+([A-Za-z_]\w*)\s*(?:<[^>]*>)?\s*\((.*)$"
);
pub const PROPERTY_REGEX: &str = concat!(
    declaration_modifiers!(),
    r"(?:var|let)\s+([A-Za-z_]\w*)(.*)$"
);
pub const TYPE_REGEX: &str = concat!(
    declaration_modifiers!(),
    r"(?:class|struct|enum)\s+([A-Za-z_]\w*)"
);
pub const EXTENSION_REGEX: &str = concat!(
    declaration_modifiers!(),
    r"extension\s+([A-Za-z_][\w.]*)"
);
pub const INITIALIZER_REGEX: &str = concat!(
    declaration_modifiers!(),
    r"init[?!]?\s*(?:<[^>]*>)?\s*\((.*)$"
);
pub const SELF_ASSIGNMENT_REGEX: &str = r"^self\.([A-Za-z_]\w*)\s*=(?:[^=]|$)";

/// Default literals longer than this are left out of the property detail
pub const MAX_DEFAULT_LITERAL_LENGTH: usize = 32;
/// Lines after the declaration line a parameter list may continue on
pub const MAX_SIGNATURE_CONTINUATION_LINES: usize = 3;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `word` occurs in `line` delimited by non-identifier characters
pub fn contains_word(line: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }

    line.match_indices(word).any(|(start, _)| {
        let before = line[..start].chars().next_back();
        let after = line[start + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}
