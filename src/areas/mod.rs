//! I/O-facing components
//!
//! - `history`: read access to the origin's version-control history
//! - `destination`: read-only view of the destination codebase
//! - `analyzer`: the per-commit pipeline tying every stage together
//! - `session`: one CLI invocation and its output writer

pub mod analyzer;
pub mod destination;
pub mod history;
pub mod session;
