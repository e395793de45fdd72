//! Data structures and algorithms of the change analysis
//!
//! - `analysis`: per-commit results and porting suggestions
//! - `classify`: change-type precedence and keyword relevance
//! - `diff`: added/removed lines of one file's diff
//! - `filter`: path relevance decisions
//! - `history`: commits, file changes, log parsing, time expressions
//! - `implementation`: destination declaration checks
//! - `mapping`: origin to destination path mapping
//! - `rules`: rule tables injected into every stage
//! - `symbols`: structural deltas extracted from diff text

pub mod analysis;
pub mod classify;
pub mod diff;
pub mod filter;
pub mod history;
pub mod implementation;
pub mod mapping;
pub mod rules;
pub mod symbols;
