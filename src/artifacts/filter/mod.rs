//! Path relevance filtering
//!
//! Decides from the path alone whether a changed origin file belongs to the
//! portable public surface. Exclusion patterns (tests, demos, project metadata,
//! lock files, docs) always win; otherwise only paths below a configured surface
//! directory are relevant. Surface prefixes are stored in a trie keyed by path
//! components.

pub mod path_filter;
