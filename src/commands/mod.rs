//! User-facing operations, each an `impl Session` block writing to the session's writer
//!
//! - `analyze`: full analysis of named commits
//! - `scan`: analysis of every commit since a time expression, plus task suggestions
//! - `check_path`: filter decision and destination mapping for bare paths
//! - `rules`: the effective rule tables
//! - `report`: text rendering shared by the above

pub mod analyze;
pub mod check_path;
pub mod report;
pub mod rules;
pub mod scan;
